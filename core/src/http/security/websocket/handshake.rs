//! Handshake interceptors.
//!
//! # Spring Equivalent
//! `HandshakeInterceptor`, `HandshakeInterceptorChain`,
//! `CsrfTokenHandshakeInterceptor`

use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest};

use crate::http::security::csrf::{
    CsrfToken, CsrfTokenRepository, SessionCsrfTokenRepository, CSRF_TOKEN_ATTRIBUTE,
};
use crate::http::security::messaging::SessionAttributes;

use super::error::WebSocketSecurityError;

/// Hook run on the HTTP upgrade request before the WebSocket session exists.
pub trait HandshakeInterceptor: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns `Ok(false)` to reject the handshake. Values placed in
    /// `attributes` become the session attributes of every message.
    fn before_handshake(
        &self,
        req: &HttpRequest,
        attributes: &mut SessionAttributes,
    ) -> Result<bool, WebSocketSecurityError>;

    /// Called in reverse order for every interceptor whose
    /// `before_handshake` accepted.
    fn after_handshake(&self, _req: &HttpRequest, _error: Option<&WebSocketSecurityError>) {}
}

/// Runs `interceptors` in order and returns the collected attributes.
pub fn apply_handshake_interceptors(
    interceptors: &[Arc<dyn HandshakeInterceptor>],
    req: &HttpRequest,
) -> Result<SessionAttributes, WebSocketSecurityError> {
    let mut attributes = SessionAttributes::new();
    let mut applied = 0;
    let mut outcome = Ok(());

    for interceptor in interceptors {
        match interceptor.before_handshake(req, &mut attributes) {
            Ok(true) => applied += 1,
            Ok(false) => {
                outcome = Err(WebSocketSecurityError::HandshakeRejected {
                    interceptor: interceptor.name().to_string(),
                });
                break;
            }
            Err(e) => {
                outcome = Err(e);
                break;
            }
        }
    }

    if let Err(e) = &outcome {
        log::debug!("Handshake for {} failed: {}", req.path(), e);
    }
    for interceptor in interceptors[..applied].iter().rev() {
        interceptor.after_handshake(req, outcome.as_ref().err());
    }

    outcome.map(|_| attributes)
}

/// Copies the HTTP session's CSRF token into the WebSocket session
/// attributes so the CONNECT frame can be checked against it.
///
/// The token is taken from the request extensions (set by
/// [`CsrfProtection`](crate::http::security::csrf::CsrfProtection)), else
/// loaded from the repository. Without a token nothing is copied. Never
/// rejects a handshake.
#[derive(Clone)]
pub struct CsrfTokenHandshakeInterceptor {
    repository: Arc<dyn CsrfTokenRepository>,
}

impl Default for CsrfTokenHandshakeInterceptor {
    fn default() -> Self {
        Self::new(SessionCsrfTokenRepository::new())
    }
}

impl CsrfTokenHandshakeInterceptor {
    pub fn new<R: CsrfTokenRepository + 'static>(repository: R) -> Self {
        CsrfTokenHandshakeInterceptor {
            repository: Arc::new(repository),
        }
    }
}

impl HandshakeInterceptor for CsrfTokenHandshakeInterceptor {
    fn name(&self) -> &'static str {
        "CsrfTokenHandshakeInterceptor"
    }

    fn before_handshake(
        &self,
        req: &HttpRequest,
        attributes: &mut SessionAttributes,
    ) -> Result<bool, WebSocketSecurityError> {
        let from_request = req.extensions().get::<CsrfToken>().cloned();
        let Some(token) = from_request.or_else(|| self.repository.load_token(req)) else {
            return Ok(true);
        };

        attributes
            .insert(CSRF_TOKEN_ATTRIBUTE, &token)
            .map_err(|e| WebSocketSecurityError::AttributeStorage {
                key: CSRF_TOKEN_ATTRIBUTE.to_string(),
                message: e.to_string(),
            })?;
        Ok(true)
    }
}
