//! `GET /api/v1/auth/me`

use actix_web::HttpResponse;

use crate::dto::MeResponse;
use crate::middleware::AuthContext;

/// Claims snapshot for the authenticated caller.
///
/// Served straight from the verified access token, no store round-trip.
pub async fn me(context: AuthContext) -> HttpResponse {
    let roles = context
        .roles
        .iter()
        .map(|role| role.as_str().to_string())
        .collect();

    HttpResponse::Ok().json(MeResponse {
        user_id: context.user_id,
        phone: context.phone,
        roles,
    })
}
