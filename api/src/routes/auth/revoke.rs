//! Global token invalidation endpoints.
//!
//! Both lean on the version-bump mechanism: every outstanding access and
//! refresh token embeds the old version and fails its next `ver` check.

use actix_web::{web, HttpResponse};

use hg_core::repositories::{
    CredentialVerifier, IdentityRepository, LockoutRepository, SessionRepository,
};

use crate::app::AppState;
use crate::cookies::clear_refresh_cookie;
use crate::handlers::error::handle_domain_error;
use crate::middleware::AuthContext;

/// Log the caller out of every device.
pub async fn logout_all<S, L, I, C>(
    state: web::Data<AppState<S, L, I, C>>,
    context: AuthContext,
) -> HttpResponse
where
    S: SessionRepository + 'static,
    L: LockoutRepository + 'static,
    I: IdentityRepository + 'static,
    C: CredentialVerifier + 'static,
{
    match state.revocation.revoke_all_for_user(context.user_id).await {
        Ok(version) => {
            log::info!(
                "User {} logged out of all devices (token version {})",
                context.user_id,
                version
            );
            HttpResponse::NoContent()
                .cookie(clear_refresh_cookie(&state.cookies))
                .finish()
        }
        Err(error) => handle_domain_error(&error),
    }
}

/// Revoke another user's sessions for incident response.
///
/// Invalidates every token of the target user. Guarded by the operator
/// role in the route table.
pub async fn revoke_user_sessions<S, L, I, C>(
    state: web::Data<AppState<S, L, I, C>>,
    path: web::Path<i64>,
    context: AuthContext,
) -> HttpResponse
where
    S: SessionRepository + 'static,
    L: LockoutRepository + 'static,
    I: IdentityRepository + 'static,
    C: CredentialVerifier + 'static,
{
    let target = path.into_inner();
    match state.revocation.revoke_all_for_user(target).await {
        Ok(_) => {
            log::info!(
                "Operator {} revoked all sessions of user {}",
                context.user_id,
                target
            );
            HttpResponse::NoContent().finish()
        }
        Err(error) => handle_domain_error(&error),
    }
}
