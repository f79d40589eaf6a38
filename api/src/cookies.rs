//! Refresh-token cookie construction.
//!
//! The refresh token travels exclusively in an HttpOnly cookie; request and
//! response bodies never carry it. Both builders honor the configured
//! SameSite policy and Secure flag so the pair always agree.

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};

use hg_shared::config::CookieConfig;

/// Cookie carrying a freshly issued refresh token.
pub fn refresh_cookie(config: &CookieConfig, token: &str, max_age_seconds: i64) -> Cookie<'static> {
    Cookie::build(config.refresh_name.clone(), token.to_string())
        .http_only(true)
        .secure(config.secure)
        .path("/")
        .same_site(parse_same_site(&config.same_site))
        .max_age(Duration::seconds(max_age_seconds))
        .finish()
}

/// Expired empty cookie that clears the refresh token client-side.
pub fn clear_refresh_cookie(config: &CookieConfig) -> Cookie<'static> {
    Cookie::build(config.refresh_name.clone(), String::new())
        .http_only(true)
        .secure(config.secure)
        .path("/")
        .same_site(parse_same_site(&config.same_site))
        .max_age(Duration::ZERO)
        .finish()
}

fn parse_same_site(value: &str) -> SameSite {
    match value.to_ascii_lowercase().as_str() {
        "lax" => SameSite::Lax,
        "none" => SameSite::None,
        _ => SameSite::Strict,
    }
}
