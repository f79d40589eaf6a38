//! Client device context extracted from the transport layer.

use serde::{Deserialize, Serialize};

/// What the transport layer knows about the calling device.
///
/// `device_id` is the client-chosen installation identifier; login and
/// refresh refuse to proceed without it. The user agent and IP are
/// best-effort and only feed fingerprinting and audit columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DeviceContext {
    pub device_id: Option<String>,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

impl DeviceContext {
    pub fn new(device_id: Option<String>, user_agent: Option<String>, ip: Option<String>) -> Self {
        Self {
            device_id,
            user_agent,
            ip,
        }
    }
}
