//! Integration tests for the secured client inbound channel.
//!
//! These tests verify:
//! - interceptor order installed by the broker security
//! - message authorization rules of the chat demo
//! - the ambient security context during and after a dispatch

mod common;

use actix_messaging_security_core::http::security::messaging::{
    MessagePrincipal, MessageSecurityError, MessageSecurityMetadataSourceRegistry, SimpMessageType,
};
use actix_messaging_security_core::http::security::{
    MessageBrokerSecurityConfigurer, SecurityContext, User, WebSocketMessageBrokerSecurity,
};
use actix_messaging_security_test::chat::ChatSecurity;

use common::{chat_state, message, send, user};

// =============================================================================
// Interceptor Order
// =============================================================================

#[test]
fn test_interceptor_order() {
    let state = chat_state(ChatSecurity::default());
    let names: Vec<&str> = state.channel.interceptors().iter().map(|i| i.name()).collect();
    assert_eq!(
        names,
        vec![
            "SecurityContextChannelInterceptor",
            "CsrfChannelInterceptor",
            "ChannelSecurityInterceptor",
            "FrameLogger",
        ]
    );
}

#[test]
fn test_interceptor_order_without_same_origin() {
    let state = chat_state(ChatSecurity {
        same_origin_disabled: true,
    });
    let names: Vec<&str> = state.channel.interceptors().iter().map(|i| i.name()).collect();
    assert_eq!(
        names,
        vec![
            "SecurityContextChannelInterceptor",
            "ChannelSecurityInterceptor",
            "FrameLogger",
        ]
    );
}

/// Only inbound rules; every other hook keeps its default.
struct RulesOnly {
    rules: bool,
}

impl MessageBrokerSecurityConfigurer for RulesOnly {
    fn configure_inbound(&self, messages: &mut MessageSecurityMetadataSourceRegistry) {
        if self.rules {
            messages.any_message().authenticated();
        }
    }
}

fn default_hook_names(rules: bool) -> Vec<&'static str> {
    let channel = WebSocketMessageBrokerSecurity::new(RulesOnly { rules })
        .client_inbound_channel()
        .unwrap();
    channel.interceptors().iter().map(|i| i.name()).collect()
}

#[test]
fn test_default_hooks_put_channel_security_last() {
    assert_eq!(
        default_hook_names(true),
        vec![
            "SecurityContextChannelInterceptor",
            "CsrfChannelInterceptor",
            "ChannelSecurityInterceptor",
        ]
    );
}

#[test]
fn test_default_hooks_without_rules() {
    assert_eq!(
        default_hook_names(false),
        vec!["SecurityContextChannelInterceptor", "CsrfChannelInterceptor"]
    );
}

// =============================================================================
// Authorization Rules
// =============================================================================

fn is_denied(result: Result<Option<String>, MessageSecurityError>) -> bool {
    matches!(result, Err(MessageSecurityError::AccessDenied { .. }))
}

#[test]
fn test_app_destinations_require_user_role() {
    let channel = chat_state(ChatSecurity::default()).channel.clone();

    let sent = send(&channel, message(SimpMessageType::Message, Some("/app/chat"), user("user")));
    assert_eq!(sent.unwrap().as_deref(), Some("user"));

    assert!(is_denied(send(
        &channel,
        message(SimpMessageType::Message, Some("/app/chat"), None)
    )));
    assert!(is_denied(send(
        &channel,
        message(SimpMessageType::Message, Some("/app/chat"), user("guest"))
    )));
}

#[test]
fn test_admin_destinations_require_admin_role() {
    let channel = chat_state(ChatSecurity::default()).channel.clone();

    assert!(is_denied(send(
        &channel,
        message(SimpMessageType::Message, Some("/app/admin/kick"), user("user"))
    )));
    assert!(send(
        &channel,
        message(SimpMessageType::Message, Some("/app/admin/kick"), user("admin"))
    )
    .is_ok());
}

#[test]
fn test_subscriptions() {
    let channel = chat_state(ChatSecurity::default()).channel.clone();

    assert!(send(
        &channel,
        message(SimpMessageType::Subscribe, Some("/topic/rooms"), user("user"))
    )
    .is_ok());
    assert!(send(
        &channel,
        message(SimpMessageType::Subscribe, Some("/user/queue/errors"), None)
    )
    .is_ok());
    assert!(is_denied(send(
        &channel,
        message(SimpMessageType::Subscribe, Some("/queue/other"), user("admin"))
    )));
}

#[test]
fn test_null_destination_requires_authentication() {
    let channel = chat_state(ChatSecurity::default()).channel.clone();

    assert!(send(&channel, message(SimpMessageType::Disconnect, None, user("guest"))).is_ok());
    assert!(is_denied(send(
        &channel,
        message(SimpMessageType::Disconnect, None, None)
    )));
}

#[test]
fn test_any_other_message_is_denied() {
    let channel = chat_state(ChatSecurity::default()).channel.clone();
    assert!(is_denied(send(
        &channel,
        message(SimpMessageType::Unsubscribe, Some("/topic/rooms"), user("admin"))
    )));
}

// =============================================================================
// Security Context
// =============================================================================

#[test]
fn test_context_is_restored_after_send() {
    let channel = chat_state(ChatSecurity::default()).channel.clone();

    SecurityContext::sync_scope(Some(User::new("outer")), || {
        let seen = send(&channel, message(SimpMessageType::Message, Some("/app/chat"), user("admin")));
        assert_eq!(seen.unwrap().as_deref(), Some("admin"));
        assert_eq!(SecurityContext::get_username().as_deref(), Some("outer"));
    });

    let _ = send(&channel, message(SimpMessageType::Message, Some("/app/chat"), user("user")));
    assert!(SecurityContext::get_user().is_none());
}

#[test]
fn test_denied_message_never_reaches_handler() {
    let channel = chat_state(ChatSecurity::default()).channel.clone();
    let mut reached = false;
    let result = channel.send(
        message(SimpMessageType::Message, Some("/app/admin/kick"), user("user")),
        |_| reached = true,
    );
    assert!(result.is_err());
    assert!(!reached);
}

#[test]
fn test_handler_resolves_message_principal() {
    let channel = chat_state(ChatSecurity::default()).channel.clone();

    let principal = channel
        .send(
            message(SimpMessageType::Message, Some("/app/admin/kick"), user("admin")),
            |_| MessagePrincipal::resolve().and_then(|p| p.require_role("ADMIN")),
        )
        .unwrap()
        .unwrap();
    assert_eq!(principal.get_username(), "admin");

    let anonymous = channel
        .send(
            message(SimpMessageType::Subscribe, Some("/user/queue/errors"), None),
            |_| MessagePrincipal::resolve(),
        )
        .unwrap();
    assert_eq!(anonymous, Err(MessageSecurityError::Unauthenticated));
}
