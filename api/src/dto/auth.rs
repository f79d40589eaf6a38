use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Phone number in E.164 format with country code, formatting characters
    /// tolerated. Examples: "+998901234567", "+998 90 123-45-67"
    #[validate(length(min = 8, max = 20))]
    pub phone: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Access-token half of a successful login or refresh.
///
/// The refresh token never appears in a body; it travels in the
/// HttpOnly cookie set on the same response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub token_type: String,
}

impl TokenResponse {
    pub fn new(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            expires_in,
            token_type: "Bearer".to_string(),
        }
    }
}

/// Claims snapshot behind `GET /auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub user_id: i64,
    pub phone: String,
    pub roles: Vec<String>,
}
