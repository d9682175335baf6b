//! # drivehub-auth
//!
//! Credential verification for DriveHub. A request carries a bearer JWT
//! whose subject is the caller's user id; [`JwtDecoder`] turns it into
//! that id. [`JwtEncoder`] mints tokens for tooling and tests. There is
//! no user registry here.

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
