//! Typed helpers for ids that arrive as plain text.

use uuid::Uuid;

use drivehub_core::error::AppError;

/// Parses a UUID from a path segment or form field.
pub fn parse_uuid(field: &str, s: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(s.trim()).map_err(|_| AppError::validation(format!("Invalid {field}: {s}")))
}

/// Parses an optional UUID; blank input means "none".
pub fn parse_optional_uuid(field: &str, s: &str) -> Result<Option<Uuid>, AppError> {
    if s.trim().is_empty() {
        Ok(None)
    } else {
        parse_uuid(field, s).map(Some)
    }
}
