//! Integration tests for the WebSocket handshake.
//!
//! These tests verify:
//! - the CSRF token of the HTTP session reaches the CONNECT check
//! - SockJS endpoints get the same treatment
//! - origin validation (CSWSH prevention)
//! - disabling same-origin enforcement

mod common;

use std::sync::Arc;

use actix_web::test::TestRequest;
use actix_web::{HttpMessage, HttpRequest};

use actix_messaging_security_core::http::security::csrf::CSRF_TOKEN_ATTRIBUTE;
use actix_messaging_security_core::http::security::messaging::{
    MessageSecurityError, SessionAttributes,
};
use actix_messaging_security_core::http::security::websocket::WebSocketSecurityError;
use actix_messaging_security_core::http::security::CsrfToken;
use actix_messaging_security_test::chat::{ChatSecurity, ChatState};

use common::{chat_state, connect_frame, send, user, HOST, SAME_ORIGIN};

fn handshake_request(path: &str, origin: &str, token: Option<&str>) -> HttpRequest {
    let req = TestRequest::get()
        .uri(path)
        .insert_header(("host", HOST))
        .insert_header(("origin", origin))
        .to_http_request();
    if let Some(t) = token {
        req.extensions_mut().insert(CsrfToken::new(t));
    }
    req
}

fn handshake(
    state: &ChatState,
    path: &str,
    origin: &str,
    token: Option<&str>,
) -> Result<SessionAttributes, WebSocketSecurityError> {
    let handler = state.endpoints.get_handler(path).unwrap();
    handler.handshake(&handshake_request(path, origin, token))
}

// =============================================================================
// CSRF Token Propagation
// =============================================================================

#[test]
fn test_connect_requires_session_token() {
    let state = chat_state(ChatSecurity::default());
    let attributes = Arc::new(handshake(&state, "/ws", SAME_ORIGIN, Some("s3cret")).unwrap());

    let stored = attributes.get::<CsrfToken>(CSRF_TOKEN_ATTRIBUTE).unwrap().unwrap();
    assert_eq!(stored.value(), "s3cret");

    let accepted = send(&state.channel, connect_frame(attributes.clone(), Some("s3cret"), user("user")));
    assert_eq!(accepted.unwrap().as_deref(), Some("user"));

    assert!(matches!(
        send(&state.channel, connect_frame(attributes.clone(), Some("forged"), user("user"))),
        Err(MessageSecurityError::InvalidCsrfToken { header }) if header == "X-CSRF-TOKEN"
    ));
    assert!(matches!(
        send(&state.channel, connect_frame(attributes, None, user("user"))),
        Err(MessageSecurityError::InvalidCsrfToken { .. })
    ));
}

#[test]
fn test_connect_without_session_token_is_rejected() {
    let state = chat_state(ChatSecurity::default());
    let attributes = Arc::new(handshake(&state, "/ws", SAME_ORIGIN, None).unwrap());
    assert!(!attributes.contains_key(CSRF_TOKEN_ATTRIBUTE));

    assert_eq!(
        send(&state.channel, connect_frame(attributes, Some("anything"), user("user"))),
        Err(MessageSecurityError::MissingCsrfToken)
    );
}

#[test]
fn test_csrf_check_runs_before_authorization() {
    let state = chat_state(ChatSecurity::default());
    let attributes = Arc::new(handshake(&state, "/ws", SAME_ORIGIN, Some("s3cret")).unwrap());

    assert!(matches!(
        send(&state.channel, connect_frame(attributes.clone(), Some("forged"), None)),
        Err(MessageSecurityError::InvalidCsrfToken { .. })
    ));
    assert!(matches!(
        send(&state.channel, connect_frame(attributes, Some("s3cret"), None)),
        Err(MessageSecurityError::AccessDenied { .. })
    ));
}

#[test]
fn test_sockjs_endpoint_copies_token() {
    let state = chat_state(ChatSecurity::default());
    let attributes = handshake(&state, "/sockjs/info", SAME_ORIGIN, Some("s3cret")).unwrap();
    assert!(attributes.contains_key(CSRF_TOKEN_ATTRIBUTE));
}

// =============================================================================
// Origin Validation
// =============================================================================

#[test]
fn test_foreign_origin_is_rejected() {
    let state = chat_state(ChatSecurity::default());
    for path in ["/ws", "/sockjs/websocket"] {
        assert!(matches!(
            handshake(&state, path, "https://evil.com", Some("s3cret")),
            Err(WebSocketSecurityError::InvalidOrigin { origin }) if origin == "https://evil.com"
        ));
    }
}

#[test]
fn test_unmapped_path_has_no_handler() {
    let state = chat_state(ChatSecurity::default());
    assert!(state.endpoints.get_handler("/nope").is_none());
    assert_eq!(state.endpoints.len(), 2);
}

// =============================================================================
// Same-Origin Enforcement Disabled
// =============================================================================

#[test]
fn test_same_origin_disabled_skips_token_copy_and_check() {
    let state = chat_state(ChatSecurity {
        same_origin_disabled: true,
    });
    let attributes = Arc::new(handshake(&state, "/ws", SAME_ORIGIN, Some("s3cret")).unwrap());
    assert!(!attributes.contains_key(CSRF_TOKEN_ATTRIBUTE));

    assert!(send(&state.channel, connect_frame(attributes, None, user("user"))).is_ok());
}
