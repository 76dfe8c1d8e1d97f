//! WebSocket endpoint security for Actix Web.
//!
//! # Overview
//!
//! Security is applied twice: once on the HTTP upgrade request (the
//! handshake) and once on every frame sent over the socket (the
//! [`messaging`](crate::http::security::messaging) channel).
//!
//! ```text
//! Client                    Server
//!   |                          |
//!   |--HTTP Upgrade Request--->| 1. CsrfTokenHandshakeInterceptor copies the
//!   |                          |    session's CSRF token into the attributes
//!   |                          | 2. OriginHandshakeInterceptor (CSWSH check)
//!   |<--101 Switching----------|
//!   |                          |
//!   |--CONNECT (X-CSRF-TOKEN)->| 3. CsrfChannelInterceptor compares tokens
//!   |--SEND /app/..----------->| 4. ChannelSecurityInterceptor decides
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use actix_messaging_security_core::http::security::beans::ApplicationContext;
//! use actix_messaging_security_core::http::security::websocket::WebSocketMessageBrokerSecurity;
//!
//! let security = WebSocketMessageBrokerSecurity::new(ChatSecurity);
//! let inbound = security.client_inbound_channel()?;
//!
//! let mut context = ApplicationContext::new();
//! security.register_stomp_endpoints(&mut context);
//! security.after_singletons_instantiated(&mut context)?;
//! ```
//!
//! # Spring Security Comparison
//!
//! | Spring Security | Actix Messaging Security |
//! |-----------------|--------------------------|
//! | `AbstractSecurityWebSocketMessageBrokerConfigurer` | [`MessageBrokerSecurityConfigurer`] + [`WebSocketMessageBrokerSecurity`] |
//! | `CsrfTokenHandshakeInterceptor` | [`CsrfTokenHandshakeInterceptor`] |
//! | `OriginHandshakeInterceptor` | [`OriginHandshakeInterceptor`] |
//! | `SimpleUrlHandlerMapping` | [`SimpleUrlHandlerMapping`] |
//! | `StompEndpointRegistry` | [`StompEndpointRegistry`] |

mod configurer;
mod error;
mod handler;
mod handshake;
mod mapping;
mod origin;

pub use configurer::{
    MessageBrokerSecurityConfig, MessageBrokerSecurityConfigurer, WebSocketMessageBrokerSecurity,
};
pub use error::WebSocketSecurityError;
pub use handler::{
    HttpRequestHandler, SockJsHttpRequestHandler, SockJsService, TransportHandlingSockJsService,
    WebSocketHttpRequestHandler,
};
pub use handshake::{apply_handshake_interceptors, CsrfTokenHandshakeInterceptor, HandshakeInterceptor};
pub use mapping::{
    SimpleUrlHandlerMapping, StompEndpointRegistration, StompEndpointRegistry,
    STOMP_HANDLER_MAPPING_BEAN,
};
pub use origin::{OriginHandshakeInterceptor, OriginValidator, OriginValidatorBuilder};
