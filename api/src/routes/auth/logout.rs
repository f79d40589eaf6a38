//! `POST /api/v1/auth/logout`

use actix_web::{web, HttpRequest, HttpResponse};

use hg_core::repositories::{
    CredentialVerifier, IdentityRepository, LockoutRepository, SessionRepository,
};

use crate::app::AppState;
use crate::cookies::clear_refresh_cookie;

/// Best-effort logout.
///
/// Always 204 with a cleared cookie. Whether the presented token was live,
/// expired or absent is not observable from the response.
pub async fn logout<S, L, I, C>(
    state: web::Data<AppState<S, L, I, C>>,
    req: HttpRequest,
) -> HttpResponse
where
    S: SessionRepository + 'static,
    L: LockoutRepository + 'static,
    I: IdentityRepository + 'static,
    C: CredentialVerifier + 'static,
{
    let raw = req
        .cookie(&state.cookies.refresh_name)
        .map(|cookie| cookie.value().to_string());

    if let Err(error) = state.auth.logout(raw.as_deref()).await {
        log::warn!("Logout cleanup failed: {}", error);
    }

    HttpResponse::NoContent()
        .cookie(clear_refresh_cookie(&state.cookies))
        .finish()
}
