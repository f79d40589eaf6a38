//! Authentication route handlers.
//!
//! Each handler is a thin translation layer: headers, cookies and JSON in,
//! one domain call, envelope and Set-Cookie out. All session and lockout
//! decisions stay in `hg_core`.

pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;
pub mod revoke;

use actix_web::http::header;
use actix_web::HttpRequest;

use hg_core::domain::value_objects::DeviceContext;

/// Assemble the device context the domain flows key on.
///
/// `X-Device-Id` is the client-chosen installation identifier; its absence
/// is rejected inside the service, not here. User agent and peer address
/// only feed fingerprinting and audit columns.
pub(crate) fn device_context(req: &HttpRequest) -> DeviceContext {
    let device_id = req
        .headers()
        .get("x-device-id")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());
    let connection = req.connection_info();
    let ip = connection.realip_remote_addr().map(|addr| addr.to_string());

    DeviceContext::new(device_id, user_agent, ip)
}
