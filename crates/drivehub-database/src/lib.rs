//! # drivehub-database
//!
//! Document store handles (in-memory and PostgreSQL), migrations, and the
//! folder/file repositories built on top of them.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::Database;
pub use repositories::{FileRepository, FolderRepository, ItemCriteria, ItemScope, ListOptions};
pub use store::{MemoryStore, PostgresStore};
