//! Core traits defined in `drivehub-core` and implemented by other crates.

pub mod store;

pub use store::DocumentStore;
