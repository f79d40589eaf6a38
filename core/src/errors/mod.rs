//! Domain-specific error types and error handling.

mod types;

// Re-export all error types
pub use types::{AuthError, TokenError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// True for refresh-path failures that indicate possible credential
    /// compromise and therefore require family revocation plus transport
    /// clearing before the response leaves the service.
    pub fn is_compromise(&self) -> bool {
        matches!(
            self,
            DomainError::Auth(AuthError::VersionMismatch)
                | DomainError::Auth(AuthError::DeviceMismatch)
                | DomainError::Auth(AuthError::SessionNotFound)
                | DomainError::Token(TokenError::TokenExpired)
        )
    }
}
