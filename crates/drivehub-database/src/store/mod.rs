//! [`DocumentStore`](drivehub_core::traits::DocumentStore) implementations.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Collection holding folder documents.
pub const FOLDERS: &str = "folders";
/// Collection holding file documents.
pub const FILES: &str = "files";
