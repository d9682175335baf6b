//! Request and response bodies.

pub mod request;
pub mod response;

pub use request::{CreateFolderRequest, PermanentDeleteRequest, RenameRequest};
pub use response::{ApiResponse, HealthResponse};
