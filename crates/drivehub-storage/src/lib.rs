//! # drivehub-storage
//!
//! Persists uploaded bytes and describes where they can be fetched from.
//! The rest of DriveHub only ever sees the resulting [`StoredUpload`].

pub mod local;

pub use local::{LocalUploadStore, StoredUpload};
