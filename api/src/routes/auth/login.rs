//! `POST /api/v1/auth/login`

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use hg_core::repositories::{
    CredentialVerifier, IdentityRepository, LockoutRepository, SessionRepository,
};

use crate::app::AppState;
use crate::cookies::refresh_cookie;
use crate::dto::{LoginRequest, TokenResponse};
use crate::handlers::error::{handle_domain_error, validation_error_response};

use super::device_context;

/// Authenticate with phone and password.
///
/// 200 carries the access token in the body and the refresh token in the
/// HttpOnly cookie. Wrong password, unknown phone and blocked account all
/// answer with the same 401.
pub async fn login<S, L, I, C>(
    state: web::Data<AppState<S, L, I, C>>,
    req: HttpRequest,
    body: web::Json<LoginRequest>,
) -> HttpResponse
where
    S: SessionRepository + 'static,
    L: LockoutRepository + 'static,
    I: IdentityRepository + 'static,
    C: CredentialVerifier + 'static,
{
    if let Err(errors) = body.validate() {
        return validation_error_response(&errors);
    }

    let device = device_context(&req);
    match state.auth.login(&body.phone, &body.password, &device).await {
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
        Err(error) => handle_domain_error(&error),
    }
}
