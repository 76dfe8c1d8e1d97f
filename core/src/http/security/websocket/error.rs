//! WebSocket handshake error types.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use derive_more::{Display, Error};

/// Errors raised while a handshake runs through its interceptors.
#[derive(Debug, Display, Error)]
pub enum WebSocketSecurityError {
    /// The Origin header is missing and the validator requires one.
    #[display("Forbidden: missing Origin header")]
    MissingOrigin,

    /// The Origin header value is not allowed.
    ///
    /// Guards against Cross-Site WebSocket Hijacking, where a foreign page
    /// opens a socket with the victim's cookies.
    #[display("Forbidden: origin '{origin}' is not allowed")]
    InvalidOrigin { origin: String },

    /// An interceptor returned `false` from `before_handshake`.
    #[display("Forbidden: handshake rejected by {interceptor}")]
    HandshakeRejected { interceptor: String },

    /// A value could not be stored in the session attributes.
    #[display("Failed to store handshake attribute '{key}': {message}")]
    AttributeStorage { key: String, message: String },

    /// No handler is mapped to the requested path.
    #[display("No WebSocket endpoint mapped to '{path}'")]
    NoHandler { path: String },
}

impl ResponseError for WebSocketSecurityError {
    fn status_code(&self) -> StatusCode {
        match self {
            WebSocketSecurityError::MissingOrigin
            | WebSocketSecurityError::InvalidOrigin { .. }
            | WebSocketSecurityError::HandshakeRejected { .. } => StatusCode::FORBIDDEN,
            WebSocketSecurityError::AttributeStorage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            WebSocketSecurityError::NoHandler { .. } => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}
