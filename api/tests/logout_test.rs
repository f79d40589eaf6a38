//! Integration tests for the logout endpoint.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;

use common::{
    assert_cookie_cleared, harness, login_request, refresh_cookie_from, refresh_request,
    seed_client, PASSWORD, PHONE,
};
use hg_api::app::create_app;
use hg_core::domain::entities::session::SessionStatus;

fn logout_request(cookie: Option<actix_web::cookie::Cookie<'static>>) -> test::TestRequest {
    let request = test::TestRequest::post().uri("/api/v1/auth/logout");
    match cookie {
        Some(cookie) => request.cookie(cookie),
        None => request,
    }
}

#[actix_web::test]
async fn test_logout_revokes_the_family_and_clears_the_cookie() {
    let harness = harness().await;
    seed_client(&harness).await;
    let app = test::init_service(create_app(harness.state.clone())).await;

    let login = test::call_service(&app, login_request("device-1", PHONE, PASSWORD).to_request()).await;
    let cookie = refresh_cookie_from(&login).expect("refresh cookie missing");

    let resp = test::call_service(&app, logout_request(Some(cookie.clone())).to_request()).await;

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_cookie_cleared(&resp);
    let rows = harness.sessions.all().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, SessionStatus::Revoked);

    // the revoked token no longer refreshes
    let replay = test::call_service(&app, refresh_request("device-1", Some(cookie)).to_request()).await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_logout_without_a_cookie_still_succeeds() {
    let harness = harness().await;
    seed_client(&harness).await;
    let app = test::init_service(create_app(harness.state.clone())).await;

    let resp = test::call_service(&app, logout_request(None).to_request()).await;

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_cookie_cleared(&resp);
}

#[actix_web::test]
async fn test_logout_with_a_garbage_cookie_still_succeeds() {
    let harness = harness().await;
    seed_client(&harness).await;
    let app = test::init_service(create_app(harness.state.clone())).await;

    let cookie = actix_web::cookie::Cookie::new("refresh_token", "not-a-jwt");
    let resp = test::call_service(&app, logout_request(Some(cookie)).to_request()).await;

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_cookie_cleared(&resp);
}

#[actix_web::test]
async fn test_repeated_logout_is_idempotent() {
    let harness = harness().await;
    seed_client(&harness).await;
    let app = test::init_service(create_app(harness.state.clone())).await;

    let login = test::call_service(&app, login_request("device-1", PHONE, PASSWORD).to_request()).await;
    let cookie = refresh_cookie_from(&login).expect("refresh cookie missing");

    let first = test::call_service(&app, logout_request(Some(cookie.clone())).to_request()).await;
    assert_eq!(first.status(), StatusCode::NO_CONTENT);
    let second = test::call_service(&app, logout_request(Some(cookie)).to_request()).await;
    assert_eq!(second.status(), StatusCode::NO_CONTENT);

    let rows = harness.sessions.all().await;
    assert_eq!(rows[0].status, SessionStatus::Revoked);
}
