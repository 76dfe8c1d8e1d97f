//! Per-message security errors.

use derive_more::{Display, Error};

/// Why a message was rejected by the inbound channel.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum MessageSecurityError {
    /// The session carries no expected CSRF token.
    #[display("Missing CSRF Token")]
    MissingCsrfToken,

    /// The CONNECT frame did not carry the expected token.
    #[display("Invalid CSRF Token found in header '{header}'")]
    InvalidCsrfToken { header: String },

    #[display("Access is denied for {message_type} message to {destination}")]
    AccessDenied {
        message_type: String,
        destination: String,
    },

    /// A handler asked for the principal of an anonymous message.
    #[display("Full authentication is required to handle this message")]
    Unauthenticated,

    #[display("Missing required role: {role}")]
    MissingRole { role: String },

    #[display("Missing required authority: {authority}")]
    MissingAuthority { authority: String },

    /// Rejection raised by an application interceptor.
    #[display("Message rejected: {reason}")]
    Rejected { reason: String },
}
