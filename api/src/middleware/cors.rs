//! CORS configuration for the auth endpoints.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use std::env;

/// Build the CORS layer for the current environment.
///
/// Development allows any origin so local clients and emulators can reach
/// the service; production only admits the origins listed in
/// `ALLOWED_ORIGINS`. Credentials stay enabled in both modes because the
/// refresh token rides a cookie.
pub fn create_cors() -> Cors {
    let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
    let max_age = env::var("CORS_MAX_AGE")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(3600);

    let cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::USER_AGENT,
            header::HeaderName::from_static("x-device-id"),
        ])
        .max_age(max_age)
        .supports_credentials();

    if environment == "production" {
        let mut cors = cors;
        if let Ok(allowed_origins) = env::var("ALLOWED_ORIGINS") {
            for origin in allowed_origins.split(',').map(|s| s.trim()) {
                if !origin.is_empty() {
                    log::info!("Allowing origin: {}", origin);
                    cors = cors.allowed_origin(origin);
                }
            }
        }
        cors
    } else {
        log::info!("Configuring permissive CORS for development");
        cors.allow_any_origin()
    }
}
