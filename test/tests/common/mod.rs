//! Common test utilities.
//!
//! - the demo application behind the full middleware stack
//! - WebSocket upgrade requests
//! - helpers for the secured inbound channel

#![allow(dead_code)]

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::body::MessageBody;
use actix_web::cookie::Key;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, App};

use actix_messaging_security_core::http::security::messaging::{
    InboundChannel, Message, MessageSecurityError, SessionAttributes, SimpMessageType,
};
use actix_messaging_security_core::http::security::{
    CsrfConfig, CsrfProtection, ExpressionUrlAuthorizer, SecurityContext, UrlSecurityTransform,
    User, WebSocketMessageBrokerSecurity,
};
use actix_messaging_security_test::chat::{ChatSecurity, ChatState};
use actix_messaging_security_test::{configure_routes, header_authenticator, url_rules};

pub const HOST: &str = "chat.example.com";
pub const SAME_ORIGIN: &str = "http://chat.example.com";

pub fn chat_state(security: ChatSecurity) -> Arc<ChatState> {
    let security = WebSocketMessageBrokerSecurity::new(security);
    Arc::new(ChatState::build(&security).unwrap())
}

/// The demo application with session, CSRF and URL security.
pub async fn create_test_app(
    security: ChatSecurity,
) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    let authorizer = ExpressionUrlAuthorizer::from_map(&url_rules()).unwrap();
    test::init_service(
        App::new()
            .wrap(
                UrlSecurityTransform::new()
                    .authenticator(header_authenticator)
                    .authorizer(authorizer),
            )
            .wrap(CsrfProtection::new(CsrfConfig::default()))
            .wrap(SessionMiddleware::new(CookieSessionStore::default(), Key::generate()))
            .configure(configure_routes(chat_state(security))),
    )
    .await
}

/// A WebSocket upgrade request for `path`.
pub fn upgrade_request(path: &str) -> test::TestRequest {
    test::TestRequest::get()
        .uri(path)
        .insert_header(("host", HOST))
        .insert_header(("upgrade", "websocket"))
        .insert_header(("connection", "Upgrade"))
        .insert_header(("sec-websocket-version", "13"))
        .insert_header(("sec-websocket-key", "dGhlIHNhbXBsZSBub25jZQ=="))
}

pub fn user(name: &str) -> Option<User> {
    actix_messaging_security_test::demo_user(name)
}

pub fn message(message_type: SimpMessageType, destination: Option<&str>, user: Option<User>) -> Message {
    let builder = Message::builder(message_type).user(user);
    match destination {
        Some(d) => builder.destination(d).build(),
        None => builder.build(),
    }
}

/// Sends `message` and returns the ambient username seen by the handler.
pub fn send(channel: &InboundChannel, message: Message) -> Result<Option<String>, MessageSecurityError> {
    channel.send(message, |_| SecurityContext::get_username())
}

pub fn connect_frame(attributes: Arc<SessionAttributes>, token: Option<&str>, user: Option<User>) -> Message {
    let builder = Message::builder(SimpMessageType::Connect)
        .session_id("1")
        .session_attributes(attributes)
        .user(user);
    match token {
        Some(t) => builder.native_header("X-CSRF-TOKEN", t).build(),
        None => builder.build(),
    }
}
