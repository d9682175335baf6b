//! File services.

pub mod service;

pub use service::FileService;
