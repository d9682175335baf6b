//! Result of flipping an item's star flag.

use serde::Serialize;

/// The updated record plus a human-readable outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarToggle<T> {
    /// `"<Kind> successfully starred"` or `"... unstarred"`.
    pub message: String,
    /// The record after the update.
    pub item: T,
}

impl<T> StarToggle<T> {
    pub(crate) fn new(kind: &str, starred: bool, item: T) -> Self {
        let verb = if starred { "starred" } else { "unstarred" };
        Self {
            message: format!("{kind} successfully {verb}"),
            item,
        }
    }
}
