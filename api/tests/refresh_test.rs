//! Integration tests for the refresh endpoint.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;

use common::{
    assert_cookie_cleared, harness, harness_with, login_request, refresh_cookie_from,
    refresh_request, seed_client, PASSWORD, PHONE,
};
use hg_api::app::create_app;
use hg_core::domain::entities::session::SessionStatus;
use hg_core::repositories::IdentityRepository;
use hg_core::services::AuthConfig;

#[actix_web::test]
async fn test_refresh_reissues_access_and_keeps_the_same_session() {
    let harness = harness().await;
    seed_client(&harness).await;
    let app = test::init_service(create_app(harness.state.clone())).await;

    let login = test::call_service(&app, login_request("device-1", PHONE, PASSWORD).to_request()).await;
    let login_cookie = refresh_cookie_from(&login).expect("refresh cookie missing");

    let resp = test::call_service(
        &app,
        refresh_request("device-1", Some(login_cookie.clone())).to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let new_cookie = refresh_cookie_from(&resp).expect("refresh cookie missing");
    // Non-rotating policy: the same refresh token is sent back.
    assert_eq!(new_cookie.value(), login_cookie.value());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 900);
    assert_eq!(
        body["access_token"].as_str().expect("no access token").split('.').count(),
        3
    );

    let rows = harness.sessions.all().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, SessionStatus::Active);
}

#[actix_web::test]
async fn test_refresh_without_a_cookie_is_unauthorized() {
    let harness = harness().await;
    seed_client(&harness).await;
    let app = test::init_service(create_app(harness.state.clone())).await;

    let resp = test::call_service(&app, refresh_request("device-1", None).to_request()).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_cookie_cleared(&resp);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "unauthorized");
}

#[actix_web::test]
async fn test_refresh_with_a_garbage_cookie_is_rejected() {
    let harness = harness().await;
    seed_client(&harness).await;
    let app = test::init_service(create_app(harness.state.clone())).await;

    let cookie = actix_web::cookie::Cookie::new("refresh_token", "not-a-jwt");
    let resp = test::call_service(&app, refresh_request("device-1", Some(cookie)).to_request()).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "token_invalid");
}

#[actix_web::test]
async fn test_refresh_refuses_an_access_token_in_the_cookie() {
    let harness = harness().await;
    seed_client(&harness).await;
    let app = test::init_service(create_app(harness.state.clone())).await;

    let login = test::call_service(&app, login_request("device-1", PHONE, PASSWORD).to_request()).await;
    let body: serde_json::Value = test::read_body_json(login).await;
    let access = body["access_token"].as_str().expect("no access token").to_string();

    let cookie = actix_web::cookie::Cookie::new("refresh_token", access);
    let resp = test::call_service(&app, refresh_request("device-1", Some(cookie)).to_request()).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "token_invalid");
}

#[actix_web::test]
async fn test_refresh_after_a_version_bump_revokes_and_clears() {
    let harness = harness().await;
    seed_client(&harness).await;
    let app = test::init_service(create_app(harness.state.clone())).await;

    let login = test::call_service(&app, login_request("device-1", PHONE, PASSWORD).to_request()).await;
    let cookie = refresh_cookie_from(&login).expect("refresh cookie missing");

    harness.identities.bump_token_version(1).await.unwrap();

    let resp = test::call_service(&app, refresh_request("device-1", Some(cookie)).to_request()).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_cookie_cleared(&resp);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "unauthorized");

    let rows = harness.sessions.all().await;
    assert_eq!(rows[0].status, SessionStatus::Revoked);
}

#[actix_web::test]
async fn test_refresh_from_the_wrong_device_kills_the_family() {
    let harness = harness().await;
    seed_client(&harness).await;
    let app = test::init_service(create_app(harness.state.clone())).await;

    let login = test::call_service(&app, login_request("device-1", PHONE, PASSWORD).to_request()).await;
    let cookie = refresh_cookie_from(&login).expect("refresh cookie missing");

    let stolen = test::call_service(
        &app,
        refresh_request("device-2", Some(cookie.clone())).to_request(),
    )
    .await;
    assert_eq!(stolen.status(), StatusCode::UNAUTHORIZED);
    assert_cookie_cleared(&stolen);

    // The legitimate device is locked out too; its family is gone.
    let replay = test::call_service(&app, refresh_request("device-1", Some(cookie)).to_request()).await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);

    let rows = harness.sessions.all().await;
    assert_eq!(rows[0].status, SessionStatus::Revoked);
}

#[actix_web::test]
async fn test_rotation_swaps_the_session_row_when_enabled() {
    let harness = harness_with(AuthConfig {
        max_sessions: 5,
        rotate_refresh_sessions: true,
    })
    .await;
    seed_client(&harness).await;
    let app = test::init_service(create_app(harness.state.clone())).await;

    let login = test::call_service(&app, login_request("device-1", PHONE, PASSWORD).to_request()).await;
    let login_cookie = refresh_cookie_from(&login).expect("refresh cookie missing");

    let resp = test::call_service(
        &app,
        refresh_request("device-1", Some(login_cookie.clone())).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let rotated_cookie = refresh_cookie_from(&resp).expect("refresh cookie missing");
    assert_ne!(rotated_cookie.value(), login_cookie.value());

    let rows = harness.sessions.all().await;
    assert_eq!(rows.len(), 2);
    let used = rows.iter().filter(|row| row.status == SessionStatus::Used).count();
    let active = rows.iter().filter(|row| row.status == SessionStatus::Active).count();
    assert_eq!((used, active), (1, 1));

    // The rotated token keeps working.
    let again = test::call_service(
        &app,
        refresh_request("device-1", Some(rotated_cookie)).to_request(),
    )
    .await;
    assert_eq!(again.status(), StatusCode::OK);
}
