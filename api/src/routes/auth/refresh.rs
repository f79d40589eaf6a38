//! `POST /api/v1/auth/refresh`

use actix_web::{web, HttpRequest, HttpResponse};

use hg_core::errors::{AuthError, DomainError};
use hg_core::repositories::{
    CredentialVerifier, IdentityRepository, LockoutRepository, SessionRepository,
};
use hg_shared::config::CookieConfig;

use crate::app::AppState;
use crate::cookies::{clear_refresh_cookie, refresh_cookie};
use crate::dto::TokenResponse;
use crate::handlers::error::handle_domain_error;

use super::device_context;

/// Exchange the refresh cookie for a fresh access token.
///
/// The cookie is rewritten on success. Failures that imply compromise have
/// already revoked the session family in the service; they answer with a
/// cleared cookie so the client stops replaying a dead token.
pub async fn refresh<S, L, I, C>(
    state: web::Data<AppState<S, L, I, C>>,
    req: HttpRequest,
) -> HttpResponse
where
    S: SessionRepository + 'static,
    L: LockoutRepository + 'static,
    I: IdentityRepository + 'static,
    C: CredentialVerifier + 'static,
{
    let device = device_context(&req);
    let raw = req
        .cookie(&state.cookies.refresh_name)
        .map(|cookie| cookie.value().to_string());

    let Some(raw) = raw else {
        let mut response = handle_domain_error(&DomainError::Auth(AuthError::SessionNotFound));
        attach_cleared_cookie(&mut response, &state.cookies);
        return response;
    };

    match state.auth.refresh(&raw, &device).await {
        Ok(tokens) => {
            let cookie = refresh_cookie(
                &state.cookies,
                &tokens.refresh_token,
                tokens.refresh_expires_in,
            );
            HttpResponse::Ok()
                .cookie(cookie)
                .json(TokenResponse::new(tokens.access_token, tokens.access_expires_in))
        }
        Err(error) => {
            let mut response = handle_domain_error(&error);
            if error.is_compromise() {
                attach_cleared_cookie(&mut response, &state.cookies);
            }
            response
        }
    }
}

fn attach_cleared_cookie(response: &mut HttpResponse, config: &CookieConfig) {
    if let Err(error) = response.add_cookie(&clear_refresh_cookie(config)) {
        log::warn!("Failed to attach cleared refresh cookie: {}", error);
    }
}
