//! Endpoint handlers owning the handshake interceptor chains.
//!
//! # Spring Equivalent
//! `HttpRequestHandler`, `WebSocketHttpRequestHandler`,
//! `SockJsHttpRequestHandler`, `SockJsService`, `TransportHandlingSockJsService`

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use actix_web::HttpRequest;

use crate::http::security::messaging::SessionAttributes;

use super::error::WebSocketSecurityError;
use super::handshake::{apply_handshake_interceptors, HandshakeInterceptor};

/// A handler registered in a [`SimpleUrlHandlerMapping`](super::SimpleUrlHandlerMapping).
pub trait HttpRequestHandler: Any + Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Runs the handshake for `req` and returns the session attributes.
    fn handshake(&self, req: &HttpRequest) -> Result<SessionAttributes, WebSocketSecurityError>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Plain WebSocket endpoint.
#[derive(Clone, Default)]
pub struct WebSocketHttpRequestHandler {
    handshake_interceptors: Vec<Arc<dyn HandshakeInterceptor>>,
}

impl WebSocketHttpRequestHandler {
    pub fn new(handshake_interceptors: Vec<Arc<dyn HandshakeInterceptor>>) -> Self {
        WebSocketHttpRequestHandler {
            handshake_interceptors,
        }
    }

    pub fn handshake_interceptors(&self) -> &[Arc<dyn HandshakeInterceptor>] {
        &self.handshake_interceptors
    }

    pub fn set_handshake_interceptors(&mut self, interceptors: Vec<Arc<dyn HandshakeInterceptor>>) {
        self.handshake_interceptors = interceptors;
    }
}

impl HttpRequestHandler for WebSocketHttpRequestHandler {
    fn name(&self) -> &'static str {
        "WebSocketHttpRequestHandler"
    }

    fn handshake(&self, req: &HttpRequest) -> Result<SessionAttributes, WebSocketSecurityError> {
        apply_handshake_interceptors(&self.handshake_interceptors, req)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Debug for WebSocketHttpRequestHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebSocketHttpRequestHandler")
            .field("handshake_interceptors", &interceptor_names(&self.handshake_interceptors))
            .finish()
    }
}

/// The service behind a SockJS endpoint.
pub trait SockJsService: Any + Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn handshake(&self, req: &HttpRequest) -> Result<SessionAttributes, WebSocketSecurityError>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// SockJS service holding the handshake interceptors shared by every
/// transport.
#[derive(Clone, Default)]
pub struct TransportHandlingSockJsService {
    handshake_interceptors: Vec<Arc<dyn HandshakeInterceptor>>,
}

impl TransportHandlingSockJsService {
    pub fn new(handshake_interceptors: Vec<Arc<dyn HandshakeInterceptor>>) -> Self {
        TransportHandlingSockJsService {
            handshake_interceptors,
        }
    }

    pub fn handshake_interceptors(&self) -> &[Arc<dyn HandshakeInterceptor>] {
        &self.handshake_interceptors
    }

    pub fn set_handshake_interceptors(&mut self, interceptors: Vec<Arc<dyn HandshakeInterceptor>>) {
        self.handshake_interceptors = interceptors;
    }
}

impl SockJsService for TransportHandlingSockJsService {
    fn name(&self) -> &'static str {
        "TransportHandlingSockJsService"
    }

    fn handshake(&self, req: &HttpRequest) -> Result<SessionAttributes, WebSocketSecurityError> {
        apply_handshake_interceptors(&self.handshake_interceptors, req)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Debug for TransportHandlingSockJsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportHandlingSockJsService")
            .field("handshake_interceptors", &interceptor_names(&self.handshake_interceptors))
            .finish()
    }
}

/// SockJS endpoint delegating to a [`SockJsService`].
pub struct SockJsHttpRequestHandler {
    sock_js_service: Box<dyn SockJsService>,
}

impl SockJsHttpRequestHandler {
    pub fn new<S: SockJsService>(service: S) -> Self {
        SockJsHttpRequestHandler {
            sock_js_service: Box::new(service),
        }
    }

    pub fn sock_js_service(&self) -> &dyn SockJsService {
        self.sock_js_service.as_ref()
    }

    pub fn sock_js_service_mut(&mut self) -> &mut dyn SockJsService {
        self.sock_js_service.as_mut()
    }
}

impl HttpRequestHandler for SockJsHttpRequestHandler {
    fn name(&self) -> &'static str {
        "SockJsHttpRequestHandler"
    }

    fn handshake(&self, req: &HttpRequest) -> Result<SessionAttributes, WebSocketSecurityError> {
        self.sock_js_service.handshake(req)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Debug for SockJsHttpRequestHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SockJsHttpRequestHandler")
            .field("sock_js_service", &self.sock_js_service.name())
            .finish()
    }
}

pub(crate) fn interceptor_names(interceptors: &[Arc<dyn HandshakeInterceptor>]) -> Vec<&'static str> {
    interceptors.iter().map(|i| i.name()).collect()
}
