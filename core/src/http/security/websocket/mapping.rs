//! URL to handler mapping and STOMP endpoint registration.
//!
//! # Spring Equivalent
//! `SimpleUrlHandlerMapping`, `StompEndpointRegistry`,
//! `StompWebSocketEndpointRegistration`

use std::fmt;
use std::sync::Arc;

use crate::http::security::ant_matcher::AntMatcher;

use super::handler::{
    HttpRequestHandler, SockJsHttpRequestHandler, TransportHandlingSockJsService,
    WebSocketHttpRequestHandler,
};
use super::handshake::HandshakeInterceptor;
use super::origin::{OriginHandshakeInterceptor, OriginValidator};

/// Bean name of the STOMP endpoint handler mapping.
pub const STOMP_HANDLER_MAPPING_BEAN: &str = "stompWebSocketHandlerMapping";

struct MappedHandler {
    pattern: AntMatcher,
    handler: Box<dyn HttpRequestHandler>,
}

/// Ordered `path pattern -> handler` mapping.
#[derive(Default)]
pub struct SimpleUrlHandlerMapping {
    handlers: Vec<MappedHandler>,
}

impl SimpleUrlHandlerMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `pattern` (an ant pattern) to `handler`, replacing an existing
    /// mapping for the same pattern.
    pub fn register_handler<H: HttpRequestHandler>(&mut self, pattern: &str, handler: H) {
        self.register_boxed(pattern, Box::new(handler));
    }

    pub fn register_boxed(&mut self, pattern: &str, handler: Box<dyn HttpRequestHandler>) {
        match self.handlers.iter_mut().find(|m| m.pattern.pattern() == pattern) {
            Some(existing) => existing.handler = handler,
            None => self.handlers.push(MappedHandler {
                pattern: AntMatcher::new(pattern),
                handler,
            }),
        }
    }

    /// First handler whose pattern matches `path`.
    pub fn get_handler(&self, path: &str) -> Option<&dyn HttpRequestHandler> {
        self.handlers
            .iter()
            .find(|m| m.pattern.matches(path))
            .map(|m| m.handler.as_ref())
    }

    pub fn handlers(&self) -> impl Iterator<Item = (&str, &(dyn HttpRequestHandler + 'static))> {
        self.handlers
            .iter()
            .map(|m| (m.pattern.pattern(), m.handler.as_ref()))
    }

    pub fn handlers_mut(
        &mut self,
    ) -> impl Iterator<Item = (&str, &mut (dyn HttpRequestHandler + 'static))> {
        self.handlers
            .iter_mut()
            .map(|m| (m.pattern.pattern(), m.handler.as_mut()))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for SimpleUrlHandlerMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.handlers().map(|(pattern, handler)| (pattern, handler.name())))
            .finish()
    }
}

/// Registers STOMP endpoints and builds their handler mapping.
///
/// # Example
/// ```
/// use actix_messaging_security_core::http::security::websocket::StompEndpointRegistry;
///
/// let mut registry = StompEndpointRegistry::new();
/// registry.add_endpoint(&["/ws"]).set_allowed_origins(&["https://chat.example.com"]);
/// registry.add_endpoint(&["/sockjs"]).with_sock_js();
///
/// let mapping = registry.handler_mapping();
/// assert!(mapping.get_handler("/ws").is_some());
/// assert!(mapping.get_handler("/sockjs/info").is_some());
/// ```
#[derive(Default)]
pub struct StompEndpointRegistry {
    endpoints: Vec<StompEndpointRegistration>,
}

impl StompEndpointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_endpoint(&mut self, paths: &[&str]) -> &mut StompEndpointRegistration {
        self.endpoints.push(StompEndpointRegistration {
            paths: paths.iter().map(|p| p.to_string()).collect(),
            allowed_origins: Vec::new(),
            interceptors: Vec::new(),
            sock_js: false,
        });
        let last = self.endpoints.len() - 1;
        &mut self.endpoints[last]
    }

    pub fn endpoints(&self) -> &[StompEndpointRegistration] {
        &self.endpoints
    }

    /// Builds one handler per path. SockJS endpoints are mapped under
    /// `path/**` so their transport URLs resolve too.
    pub fn handler_mapping(&self) -> SimpleUrlHandlerMapping {
        let mut mapping = SimpleUrlHandlerMapping::new();
        for endpoint in &self.endpoints {
            let interceptors = endpoint.handshake_interceptors();
            for path in &endpoint.paths {
                if endpoint.sock_js {
                    let service = TransportHandlingSockJsService::new(interceptors.clone());
                    let pattern = format!("{}/**", path.trim_end_matches('/'));
                    mapping.register_handler(&pattern, SockJsHttpRequestHandler::new(service));
                } else {
                    mapping.register_handler(path, WebSocketHttpRequestHandler::new(interceptors.clone()));
                }
            }
        }
        mapping
    }
}

pub struct StompEndpointRegistration {
    paths: Vec<String>,
    allowed_origins: Vec<String>,
    interceptors: Vec<Arc<dyn HandshakeInterceptor>>,
    sock_js: bool,
}

impl StompEndpointRegistration {
    /// Origins accepted besides the server's own.
    pub fn set_allowed_origins(&mut self, origins: &[&str]) -> &mut Self {
        self.allowed_origins = origins.iter().map(|o| o.to_string()).collect();
        self
    }

    pub fn add_interceptor<I: HandshakeInterceptor + 'static>(&mut self, interceptor: I) -> &mut Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn with_sock_js(&mut self) -> &mut Self {
        self.sock_js = true;
        self
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Application interceptors followed by the origin check.
    pub fn handshake_interceptors(&self) -> Vec<Arc<dyn HandshakeInterceptor>> {
        let origins: Vec<&str> = self.allowed_origins.iter().map(String::as_str).collect();
        let mut interceptors = self.interceptors.clone();
        interceptors.push(Arc::new(OriginHandshakeInterceptor::new(OriginValidator::new(
            &origins,
        ))));
        interceptors
    }
}
