//! Keyed device fingerprinting for session binding.
//!
//! A fingerprint is an HMAC-SHA256 over the client-chosen device id, the
//! user id, and the lowercased user agent, keyed with a server-held secret
//! and rendered as lowercase hex. The same inputs always map to the same
//! fingerprint, so a session row can be matched to the device presenting it.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use hg_shared::config::SecurityConfig;

use crate::domain::value_objects::DeviceContext;
use crate::errors::{AuthError, DomainError, DomainResult};

type HmacSha256 = Hmac<Sha256>;

/// Stand-in for an absent user agent so the MAC input shape is fixed
const ABSENT_AGENT: &str = "NA";

/// Computes and compares keyed device fingerprints.
pub struct DeviceBinder {
    secret: String,
}

impl DeviceBinder {
    pub fn new(config: &SecurityConfig) -> Self {
        Self {
            secret: config.device_secret.clone(),
        }
    }

    /// Fingerprint the calling device for one user.
    ///
    /// Fails with `MissingDeviceId` when the context carries no device id;
    /// login and refresh both refuse to proceed without one.
    pub fn fingerprint(&self, device: &DeviceContext, user_id: i64) -> DomainResult<String> {
        let device_id = device
            .device_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(AuthError::MissingDeviceId)?;

        let agent = device
            .user_agent
            .as_deref()
            .map(|ua| ua.to_lowercase())
            .unwrap_or_else(|| ABSENT_AGENT.to_string());

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes()).map_err(|e| {
            DomainError::Internal {
                message: format!("Failed to key fingerprint MAC: {}", e),
            }
        })?;
        mac.update(format!("{}:{}:{}", device_id, user_id, agent).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Constant-time comparison of a stored fingerprint against a
    /// recomputed one
    pub fn matches(&self, stored: &str, presented: &str) -> bool {
        constant_time_eq::constant_time_eq(stored.as_bytes(), presented.as_bytes())
    }
}
