//! Shared harness wiring the full HTTP surface to the in-memory mocks.
#![allow(dead_code)]

use std::sync::Arc;

use actix_web::cookie::time::Duration;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::{test, web};

use hg_api::app::AppState;
use hg_core::domain::entities::subject::{AuthSubject, Role};
use hg_core::repositories::{
    MockCredentialVerifier, MockIdentityRepository, MockLockoutRepository, MockSessionRepository,
};
use hg_core::services::{AuthConfig, AuthService, DeviceBinder, RevocationService, TokenCodec};
use hg_shared::config::{CookieConfig, JwtConfig, LockoutConfig, SecurityConfig};

pub type TestState = AppState<
    MockSessionRepository,
    MockLockoutRepository,
    MockIdentityRepository,
    MockCredentialVerifier,
>;

pub const PHONE: &str = "+998901234567";
pub const PASSWORD: &str = "correct-horse";

pub struct Harness {
    pub state: web::Data<TestState>,
    pub sessions: Arc<MockSessionRepository>,
    pub lockouts: Arc<MockLockoutRepository>,
    pub identities: Arc<MockIdentityRepository>,
    pub credentials: Arc<MockCredentialVerifier>,
    pub tokens: Arc<TokenCodec>,
}

pub async fn harness() -> Harness {
    harness_with(AuthConfig::default()).await
}

pub async fn harness_with(config: AuthConfig) -> Harness {
    let sessions = Arc::new(MockSessionRepository::new());
    let lockouts = Arc::new(MockLockoutRepository::new(LockoutConfig::default()));
    let identities = Arc::new(MockIdentityRepository::new());
    let credentials = Arc::new(MockCredentialVerifier::new());

    let tokens = Arc::new(TokenCodec::new(JwtConfig::default()).unwrap());
    let devices = DeviceBinder::new(&SecurityConfig::default());
    let auth = Arc::new(AuthService::new(
        sessions.clone(),
        lockouts.clone(),
        identities.clone(),
        credentials.clone(),
        tokens.clone(),
        devices,
        config,
    ));
    let revocation = Arc::new(RevocationService::new(sessions.clone(), identities.clone()));

    let state = web::Data::new(AppState {
        auth,
        revocation,
        tokens: tokens.clone(),
        cookies: CookieConfig::default(),
    });

    Harness {
        state,
        sessions,
        lockouts,
        identities,
        credentials,
        tokens,
    }
}

pub fn subject(user_id: i64, phone: &str, roles: Vec<Role>) -> AuthSubject {
    AuthSubject {
        user_id,
        phone: phone.to_string(),
        roles,
        token_version: 1,
        is_active: true,
        is_blocked: false,
    }
}

/// Seed the default client account (user 1) with its password.
pub async fn seed_client(harness: &Harness) {
    harness
        .identities
        .insert(subject(1, PHONE, vec![Role::Client]))
        .await;
    harness.credentials.set_password(1, PASSWORD).await;
}

pub fn login_request(device_id: &str, phone: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .insert_header(("X-Device-Id", device_id))
        .insert_header(("User-Agent", "hailgo-test/1.0"))
        .set_json(serde_json::json!({ "phone": phone, "password": password }))
}

pub fn refresh_request(device_id: &str, cookie: Option<Cookie<'static>>) -> test::TestRequest {
    let request = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .insert_header(("X-Device-Id", device_id));
    match cookie {
        Some(cookie) => request.cookie(cookie),
        None => request,
    }
}

/// The refresh cookie set on a response, if any.
pub fn refresh_cookie_from<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == "refresh_token")
        .map(|cookie| cookie.into_owned())
}

/// Assert the response carries the clearing form of the refresh cookie.
pub fn assert_cookie_cleared<B>(resp: &ServiceResponse<B>) {
    let cookie = refresh_cookie_from(resp).expect("expected a refresh cookie");
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
}
