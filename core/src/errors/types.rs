//! Domain-specific error types for authentication and token operations
//!
//! Error messages here are internal; the presentation layer decides what is
//! shown to callers. Compromise-path variants are all collapsed to a generic
//! unauthorized response at the HTTP boundary.

use thiserror::Error;

/// Authentication and session-security errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid phone format: {phone}")]
    InvalidPhoneFormat { phone: String },

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: i64 },

    #[error("Missing device identifier")]
    MissingDeviceId,

    #[error("Device fingerprint mismatch")]
    DeviceMismatch,

    #[error("Token version mismatch")]
    VersionMismatch,

    #[error("Session not found")]
    SessionNotFound,

    #[error("User blocked")]
    UserBlocked,
}

/// Token verification errors.
///
/// Expiry is a distinct variant because refresh-retry logic branches on it.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Unsupported token type")]
    TokenUnsupported,
}
