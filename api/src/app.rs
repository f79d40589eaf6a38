//! Application state and factory.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{web, App, Error, HttpResponse};

use hg_core::domain::entities::subject::Role;
use hg_core::repositories::{
    CredentialVerifier, IdentityRepository, LockoutRepository, SessionRepository,
};
use hg_core::services::{AuthService, RevocationService, TokenCodec};
use hg_shared::config::CookieConfig;

use crate::dto::ErrorResponse;
use crate::middleware::{create_cors, JwtAuth, SecurityHeaders};
use crate::routes::auth;

/// Shared state handed to every handler.
pub struct AppState<S, L, I, C>
where
    S: SessionRepository,
    L: LockoutRepository,
    I: IdentityRepository,
    C: CredentialVerifier,
{
    pub auth: Arc<AuthService<S, L, I, C>>,
    pub revocation: Arc<RevocationService<S, I>>,
    pub tokens: Arc<TokenCodec>,
    pub cookies: CookieConfig,
}

/// Build the actix application around a prepared state.
///
/// Generic over the repository implementations so the integration tests can
/// run the full HTTP surface against the in-memory mocks.
pub fn create_app<S, L, I, C>(
    app_state: web::Data<AppState<S, L, I, C>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    S: SessionRepository + 'static,
    L: LockoutRepository + 'static,
    I: IdentityRepository + 'static,
    C: CredentialVerifier + 'static,
{
    let cors = create_cors();
    let security = SecurityHeaders::new();
    let me_guard = JwtAuth::new(app_state.tokens.clone());
    let logout_all_guard = JwtAuth::new(app_state.tokens.clone());
    let operator_guard = JwtAuth::require(app_state.tokens.clone(), Role::Operator);

    App::new()
        .app_data(app_state)
        .wrap(Logger::default())
        .wrap(cors)
        .wrap(security)
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/login", web::post().to(auth::login::login::<S, L, I, C>))
                    .route("/refresh", web::post().to(auth::refresh::refresh::<S, L, I, C>))
                    .route("/logout", web::post().to(auth::logout::logout::<S, L, I, C>))
                    .route("/me", web::get().to(auth::me::me).wrap(me_guard))
                    .route(
                        "/logout-all",
                        web::post()
                            .to(auth::revoke::logout_all::<S, L, I, C>)
                            .wrap(logout_all_guard),
                    )
                    .route(
                        "/users/{user_id}/revoke",
                        web::post()
                            .to(auth::revoke::revoke_user_sessions::<S, L, I, C>)
                            .wrap(operator_guard),
                    ),
            ),
        )
        .default_service(web::route().to(not_found))
}

/// Liveness endpoint for load balancers and monitors
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "hailgo-auth",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> HttpResponse {
    ErrorResponse::new("not_found", "The requested resource was not found")
        .to_response(actix_web::http::StatusCode::NOT_FOUND)
}
