//! Request and response bodies for the HTTP surface.

pub mod auth;
pub mod error;

pub use auth::{LoginRequest, MeResponse, TokenResponse};
pub use error::ErrorResponse;
