//! Convenience result type alias for DriveHub.

use crate::error::AppError;

/// A specialized `Result` type for DriveHub operations.
///
/// Every layer returns this so that storage faults propagate with `?`
/// while "not found" and "precondition failed" stay ordinary values the
/// caller matches on.
pub type AppResult<T> = Result<T, AppError>;
