//! Integration tests for the HTTP side of the demo application.
//!
//! These tests verify:
//! - URL authorization answers 401 / 403 / 200
//! - the CSRF token endpoint
//! - the WebSocket upgrade behind URL security and the handshake interceptors

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde::Deserialize;

use actix_messaging_security_test::chat::ChatSecurity;

use common::{create_test_app, upgrade_request, SAME_ORIGIN};

#[derive(Deserialize)]
struct CsrfTokenBody {
    token: String,
    header_name: String,
}

// =============================================================================
// URL Authorization
// =============================================================================

#[actix_web::test]
async fn test_admin_dashboard_access() {
    let app = create_test_app(ChatSecurity::default()).await;

    let req = test::TestRequest::get().uri("/admin/dashboard").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/admin/dashboard")
        .insert_header(("x-user", "user"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/admin/dashboard")
        .insert_header(("x-user", "admin"))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "Welcome to the admin dashboard, admin!");
}

// =============================================================================
// CSRF Token Endpoint
// =============================================================================

#[actix_web::test]
async fn test_csrf_endpoint_returns_session_token() {
    let app = create_test_app(ChatSecurity::default()).await;

    let req = test::TestRequest::get().uri("/csrf").to_request();
    let body: CsrfTokenBody = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.header_name, "X-CSRF-TOKEN");
    assert_eq!(body.token.len(), 64);
}

// =============================================================================
// WebSocket Upgrade
// =============================================================================

#[actix_web::test]
async fn test_upgrade_requires_authentication() {
    let app = create_test_app(ChatSecurity::default()).await;

    let req = upgrade_request("/ws").insert_header(("origin", SAME_ORIGIN)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_upgrade_from_same_origin() {
    let app = create_test_app(ChatSecurity::default()).await;

    let req = upgrade_request("/ws")
        .insert_header(("origin", SAME_ORIGIN))
        .insert_header(("x-user", "user"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::SWITCHING_PROTOCOLS
    );
}

#[actix_web::test]
async fn test_upgrade_from_foreign_origin_is_forbidden() {
    let app = create_test_app(ChatSecurity::default()).await;

    let req = upgrade_request("/sockjs/websocket")
        .insert_header(("origin", "https://evil.com"))
        .insert_header(("x-user", "user"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}
