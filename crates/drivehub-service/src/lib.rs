//! # drivehub-service
//!
//! Business logic service layer for DriveHub. Services enforce ownership
//! and delete-state rules on top of the repositories and report expected
//! outcomes (`NotFound`, `PreconditionFailed`) as error values the caller
//! must branch on.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod file;
pub mod folder;
pub mod item;
pub mod star;

pub use context::RequestContext;
pub use file::FileService;
pub use folder::{FolderService, TreeService};
pub use item::{ItemQueryOptions, ItemService};
pub use star::StarToggle;
