//! Unified listings over folders and files, and permanent deletion.

pub mod service;
pub mod view;

pub use service::ItemService;
pub use view::{ItemQueryOptions, merge_page};
