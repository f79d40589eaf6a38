//! Integration tests for the Bearer-guarded endpoints and the JWT middleware.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;

use common::{
    assert_cookie_cleared, harness, login_request, refresh_cookie_from, refresh_request,
    seed_client, subject, PASSWORD, PHONE,
};
use hg_api::app::create_app;
use hg_core::domain::entities::session::SessionStatus;
use hg_core::domain::entities::subject::Role;
use hg_core::repositories::IdentityRepository;

fn bearer_get(uri: &str, token: &str) -> test::TestRequest {
    test::TestRequest::get()
        .uri(uri)
        .insert_header(("Authorization", format!("Bearer {}", token)))
}

fn bearer_post(uri: &str, token: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header(("Authorization", format!("Bearer {}", token)))
}

#[actix_web::test]
async fn test_me_requires_a_bearer_token() {
    let harness = harness().await;
    seed_client(&harness).await;
    let app = test::init_service(create_app(harness.state.clone())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/auth/me").to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "unauthorized");
}

#[actix_web::test]
async fn test_me_rejects_a_garbage_token() {
    let harness = harness().await;
    seed_client(&harness).await;
    let app = test::init_service(create_app(harness.state.clone())).await;

    let resp = test::call_service(&app, bearer_get("/api/v1/auth/me", "not-a-jwt").to_request()).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "token_invalid");
}

#[actix_web::test]
async fn test_me_rejects_a_refresh_token_as_bearer() {
    let harness = harness().await;
    seed_client(&harness).await;
    let app = test::init_service(create_app(harness.state.clone())).await;

    let login = test::call_service(&app, login_request("device-1", PHONE, PASSWORD).to_request()).await;
    let refresh = refresh_cookie_from(&login).expect("refresh cookie missing");

    let resp = test::call_service(&app, bearer_get("/api/v1/auth/me", refresh.value()).to_request()).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "token_invalid");
}

#[actix_web::test]
async fn test_me_returns_the_claims_snapshot() {
    let harness = harness().await;
    seed_client(&harness).await;
    let app = test::init_service(create_app(harness.state.clone())).await;

    let login = test::call_service(&app, login_request("device-1", PHONE, PASSWORD).to_request()).await;
    let body: serde_json::Value = test::read_body_json(login).await;
    let access = body["access_token"].as_str().expect("no access token");

    let resp = test::call_service(&app, bearer_get("/api/v1/auth/me", access).to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user_id"], 1);
    assert_eq!(body["phone"], PHONE);
    assert_eq!(body["roles"], serde_json::json!(["CLIENT"]));
}

#[actix_web::test]
async fn test_logout_all_invalidates_every_device() {
    let harness = harness().await;
    seed_client(&harness).await;
    let app = test::init_service(create_app(harness.state.clone())).await;

    let first = test::call_service(&app, login_request("device-1", PHONE, PASSWORD).to_request()).await;
    let first_cookie = refresh_cookie_from(&first).expect("refresh cookie missing");
    let body: serde_json::Value = test::read_body_json(first).await;
    let access = body["access_token"].as_str().expect("no access token").to_string();

    let second = test::call_service(&app, login_request("device-2", PHONE, PASSWORD).to_request()).await;
    let second_cookie = refresh_cookie_from(&second).expect("refresh cookie missing");

    let resp = test::call_service(
        &app,
        bearer_post("/api/v1/auth/logout-all", &access).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_cookie_cleared(&resp);

    // every row is revoked and both refresh tokens are dead
    for row in harness.sessions.all().await {
        assert_eq!(row.status, SessionStatus::Revoked);
    }
    let one = test::call_service(&app, refresh_request("device-1", Some(first_cookie)).to_request()).await;
    assert_eq!(one.status(), StatusCode::UNAUTHORIZED);
    let two = test::call_service(&app, refresh_request("device-2", Some(second_cookie)).to_request()).await;
    assert_eq!(two.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_operator_revoke_requires_the_operator_role() {
    let harness = harness().await;
    seed_client(&harness).await;
    let app = test::init_service(create_app(harness.state.clone())).await;

    let login = test::call_service(&app, login_request("device-1", PHONE, PASSWORD).to_request()).await;
    let body: serde_json::Value = test::read_body_json(login).await;
    let client_access = body["access_token"].as_str().expect("no access token");

    let resp = test::call_service(
        &app,
        bearer_post("/api/v1/auth/users/1/revoke", client_access).to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "forbidden");
}

#[actix_web::test]
async fn test_operator_revoke_invalidates_the_target_user() {
    let harness = harness().await;
    seed_client(&harness).await;
    harness
        .identities
        .insert(subject(2, "+998907654321", vec![Role::Operator]))
        .await;
    let app = test::init_service(create_app(harness.state.clone())).await;

    let login = test::call_service(&app, login_request("device-1", PHONE, PASSWORD).to_request()).await;
    let cookie = refresh_cookie_from(&login).expect("refresh cookie missing");

    let operator = harness
        .identities
        .load_by_id(2)
        .await
        .unwrap()
        .expect("operator seeded");
    let operator_access = harness.tokens.issue_access(&operator).unwrap();

    let resp = test::call_service(
        &app,
        bearer_post("/api/v1/auth/users/1/revoke", &operator_access).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // the target's refresh token now trips the version check
    let replay = test::call_service(&app, refresh_request("device-1", Some(cookie)).to_request()).await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
    for row in harness.sessions.all().await {
        assert_eq!(row.status, SessionStatus::Revoked);
    }
}

#[actix_web::test]
async fn test_health_is_open_and_reports_status() {
    let harness = harness().await;
    let app = test::init_service(create_app(harness.state.clone())).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "hailgo-auth");
}

#[actix_web::test]
async fn test_every_response_carries_no_store() {
    let harness = harness().await;
    let app = test::init_service(create_app(harness.state.clone())).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;

    let cache_control = resp
        .headers()
        .get("cache-control")
        .and_then(|value| value.to_str().ok());
    assert_eq!(cache_control, Some("no-store"));
    assert_eq!(
        resp.headers().get("x-content-type-options").and_then(|v| v.to_str().ok()),
        Some("nosniff")
    );
}
