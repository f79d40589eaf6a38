//! Token pair value object returned by the auth flows.

use serde::{Deserialize, Serialize};

/// Freshly issued access/refresh pair with the lifetimes the client
/// should assume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssuedTokens {
    /// Signed JWT presented on API calls
    pub access_token: String,

    /// Signed JWT exchanged for new access tokens
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub access_expires_in: i64,

    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
}

impl IssuedTokens {
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in,
            refresh_expires_in,
        }
    }
}
