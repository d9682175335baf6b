//! # drivehub-api
//!
//! HTTP API layer for DriveHub built on Axum.
//!
//! Provides the REST endpoints for folders, files and unified item
//! listings, the bearer-token extractor, request DTOs with validation,
//! middleware (CORS, request logging) and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use state::AppState;
