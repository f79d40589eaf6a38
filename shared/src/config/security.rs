//! Device binding, session cap, and failed-login lockout configuration

use serde::{Deserialize, Serialize};

/// Session-security configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecurityConfig {
    /// Server-held secret keying the device fingerprint HMAC
    pub device_secret: String,

    /// Maximum concurrent refresh sessions (devices) per user
    pub max_sessions: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            device_secret: String::from("device-secret-change-in-production"),
            max_sessions: 5,
        }
    }
}

impl SecurityConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            device_secret: std::env::var("DEVICE_HMAC_SECRET").unwrap_or(defaults.device_secret),
            max_sessions: std::env::var("MAX_SESSIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_sessions),
        }
    }
}

/// Failed-authentication lockout tuning.
///
/// Counter rows persist their own tunables; these values seed rows created
/// lazily on a first failure.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LockoutConfig {
    /// Strikes within one window before a lockout is applied
    pub threshold: i32,

    /// Sliding window length in seconds
    pub window_seconds: i64,

    /// First-tier lockout duration in seconds
    pub base_lock_seconds: i64,

    /// Repeat-offender lockout duration in seconds
    pub extended_lock_seconds: i64,
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            threshold: 7,
            window_seconds: 600,          // 10m
            base_lock_seconds: 900,       // 15m
            extended_lock_seconds: 86400, // 24h
        }
    }
}

impl LockoutConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            threshold: env_parse("LOCKOUT_THRESHOLD", defaults.threshold),
            window_seconds: env_parse("LOCKOUT_WINDOW_SECONDS", defaults.window_seconds),
            base_lock_seconds: env_parse("LOCKOUT_BASE_SECONDS", defaults.base_lock_seconds),
            extended_lock_seconds: env_parse(
                "LOCKOUT_EXTENDED_SECONDS",
                defaults.extended_lock_seconds,
            ),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}
