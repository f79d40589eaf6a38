//! JWT and refresh-cookie configuration

use serde::{Deserialize, Serialize};

/// JWT signing configuration.
///
/// The signing key is held base64-encoded and decoded once at codec
/// construction; access and refresh lifetimes are configured in the units
/// operators think in (minutes and days).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Base64-encoded HMAC signing key
    pub secret_base64: String,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,

    /// Access token lifetime in minutes
    pub access_token_minutes: i64,

    /// Refresh token lifetime in days
    pub refresh_token_days: i64,

    /// Clock-skew tolerance applied during verification, in seconds
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            // "change-me-in-production" base64-encoded
            secret_base64: String::from("Y2hhbmdlLW1lLWluLXByb2R1Y3Rpb24="),
            issuer: String::from("hailgo"),
            audience: String::from("hailgo-api"),
            access_token_minutes: 15,
            refresh_token_days: 7,
            leeway_seconds: default_leeway(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with a base64-encoded secret
    pub fn new(secret_base64: impl Into<String>) -> Self {
        Self {
            secret_base64: secret_base64.into(),
            ..Default::default()
        }
    }

    /// Access token lifetime in seconds
    pub fn access_token_seconds(&self) -> i64 {
        self.access_token_minutes * 60
    }

    /// Refresh token lifetime in seconds
    pub fn refresh_token_seconds(&self) -> i64 {
        self.refresh_token_days * 86_400
    }

    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret_base64: std::env::var("JWT_SECRET_BASE64").unwrap_or(defaults.secret_base64),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or(defaults.audience),
            access_token_minutes: env_i64("JWT_ACCESS_MINUTES", defaults.access_token_minutes),
            refresh_token_days: env_i64("JWT_REFRESH_DAYS", defaults.refresh_token_days),
            leeway_seconds: env_i64("JWT_LEEWAY_SECONDS", default_leeway() as i64) as u64,
        }
    }
}

/// Refresh-token cookie configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CookieConfig {
    /// Cookie name carrying the refresh token
    pub refresh_name: String,

    /// SameSite attribute ("Strict", "Lax" or "None")
    pub same_site: String,

    /// Secure flag (HTTPS only)
    #[serde(default = "default_secure")]
    pub secure: bool,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            refresh_name: String::from("refresh_token"),
            same_site: String::from("Strict"),
            secure: default_secure(),
        }
    }
}

impl CookieConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            refresh_name: std::env::var("REFRESH_COOKIE_NAME").unwrap_or(defaults.refresh_name),
            same_site: std::env::var("REFRESH_COOKIE_SAMESITE").unwrap_or(defaults.same_site),
            secure: std::env::var("REFRESH_COOKIE_SECURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.secure),
        }
    }
}

fn default_leeway() -> u64 {
    2
}

fn default_secure() -> bool {
    true
}

fn env_i64(key: &str, fallback: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lifetimes_convert_to_seconds() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_seconds(), 900);
        assert_eq!(config.refresh_token_seconds(), 604_800);
    }

    #[test]
    fn default_cookie_is_strict_and_secure() {
        let cookie = CookieConfig::default();
        assert_eq!(cookie.refresh_name, "refresh_token");
        assert_eq!(cookie.same_site, "Strict");
        assert!(cookie.secure);
    }
}
