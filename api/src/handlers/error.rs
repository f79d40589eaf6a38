//! Domain-error to HTTP translation.
//!
//! One mapping serves both exits: handlers call [`handle_domain_error`] at
//! their error arm, and middleware wraps the same mapping in [`ApiError`] so
//! requests rejected before a handler runs produce an identical body.

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use uuid::Uuid;
use validator::ValidationErrors;

use hg_core::errors::{AuthError, DomainError, TokenError};

use crate::dto::ErrorResponse;

/// Convert a domain error into the response the error contract promises.
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let (status, body) = map_domain_error(error);
    body.to_response(status)
}

fn map_domain_error(error: &DomainError) -> (StatusCode, ErrorResponse) {
    match error {
        DomainError::Auth(AuthError::InvalidPhoneFormat { .. }) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("invalid_phone_format", "Phone number format is invalid"),
        ),
        // A blocked account answers exactly like a wrong password so the
        // response does not reveal account state.
        DomainError::Auth(AuthError::AuthenticationFailed)
        | DomainError::Auth(AuthError::UserBlocked) => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new("invalid_credentials", "Invalid phone number or password"),
        ),
        DomainError::Auth(AuthError::RateLimited {
            retry_after_seconds,
        }) => (
            StatusCode::TOO_MANY_REQUESTS,
            ErrorResponse::new("rate_limited", "Too many failed attempts, try again later")
                .with_retry_after(*retry_after_seconds),
        ),
        DomainError::Auth(AuthError::MissingDeviceId) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("missing_device_id", "X-Device-Id header is required"),
        ),
        // The compromise group collapses into one generic 401; which check
        // tripped is not for the caller to know.
        DomainError::Auth(AuthError::DeviceMismatch)
        | DomainError::Auth(AuthError::VersionMismatch)
        | DomainError::Auth(AuthError::SessionNotFound) => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new("unauthorized", "Authentication required"),
        ),
        DomainError::Token(TokenError::TokenExpired) => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new("token_expired", "Token has expired"),
        ),
        DomainError::Token(TokenError::TokenInvalid)
        | DomainError::Token(TokenError::TokenUnsupported) => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new("token_invalid", "Token is invalid"),
        ),
        DomainError::Validation { message } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("validation_error", message.clone()),
        ),
        DomainError::NotFound { resource } => (
            StatusCode::NOT_FOUND,
            ErrorResponse::new("not_found", format!("{} not found", resource)),
        ),
        DomainError::Internal { message } => {
            let reference = Uuid::new_v4();
            error!("Internal error [{}]: {}", reference, message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(
                    "internal_error",
                    format!("An internal error occurred (ref {})", reference),
                ),
            )
        }
    }
}

/// 400 for DTO validation failures, naming the first offending field.
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let message = errors
        .field_errors()
        .keys()
        .next()
        .map(|field| format!("Invalid value for field '{}'", field))
        .unwrap_or_else(|| "Invalid request body".to_string());
    ErrorResponse::new("validation_error", message).to_response(StatusCode::BAD_REQUEST)
}

/// Domain failure carried through actix's error path.
///
/// Middleware cannot hand back an [`HttpResponse`] when it rejects a request
/// before the handler runs; it returns this instead and actix renders it
/// through [`ResponseError`].
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body: ErrorResponse::new("unauthorized", "Authentication required"),
        }
    }

    pub fn forbidden() -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            body: ErrorResponse::new("forbidden", "Insufficient privileges"),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        let (status, body) = map_domain_error(&error);
        Self { status, body }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.body.error, self.body.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        self.body.to_response(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_user_reads_like_wrong_password() {
        let blocked = map_domain_error(&DomainError::Auth(AuthError::UserBlocked));
        let failed = map_domain_error(&DomainError::Auth(AuthError::AuthenticationFailed));
        assert_eq!(blocked.0, StatusCode::UNAUTHORIZED);
        assert_eq!(blocked.1, failed.1);
    }

    #[test]
    fn test_compromise_group_is_indistinguishable() {
        let device = map_domain_error(&DomainError::Auth(AuthError::DeviceMismatch));
        let version = map_domain_error(&DomainError::Auth(AuthError::VersionMismatch));
        let session = map_domain_error(&DomainError::Auth(AuthError::SessionNotFound));
        assert_eq!(device.1, version.1);
        assert_eq!(version.1, session.1);
        assert_eq!(device.0, StatusCode::UNAUTHORIZED);
        assert_eq!(device.1.error, "unauthorized");
    }

    #[test]
    fn test_rate_limited_carries_retry_after() {
        let (status, body) = map_domain_error(&DomainError::Auth(AuthError::RateLimited {
            retry_after_seconds: 900,
        }));
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body.retry_after, Some(900));

        let response = body.to_response(status);
        let header = response
            .headers()
            .get("Retry-After")
            .expect("Retry-After header missing");
        assert_eq!(header.to_str().unwrap(), "900");
    }

    #[test]
    fn test_internal_detail_stays_out_of_the_body() {
        let (status, body) = map_domain_error(&DomainError::Internal {
            message: "connection pool exhausted".to_string(),
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.message.contains("pool"));
    }
}
