//! Principal resolution for message handlers.

use crate::http::security::{SecurityContext, User};

use super::error::MessageSecurityError;
use super::message::Message;

/// The authenticated principal of the message being handled.
///
/// Handlers run inside [`InboundChannel::send`](super::InboundChannel::send),
/// after `SecurityContextChannelInterceptor` installed the message user as
/// the ambient identity, so the principal is resolved from there.
///
/// # Spring Security Equivalent
/// `@AuthenticationPrincipal` on a `@MessageMapping` method
///
/// # Example
///
/// ```
/// use actix_messaging_security_core::http::security::messaging::{
///     ChannelRegistration, Message, MessagePrincipal, SecurityContextChannelInterceptor,
///     SimpMessageType,
/// };
/// use actix_messaging_security_core::http::security::User;
///
/// let mut registration = ChannelRegistration::new();
/// registration.interceptor(SecurityContextChannelInterceptor::new());
/// let channel = registration.into_channel();
///
/// let message = Message::builder(SimpMessageType::Message)
///     .destination("/app/chat")
///     .user(Some(User::new("alice").roles(&["USER"])))
///     .build();
///
/// let greeting = channel
///     .send(message, |_| {
///         MessagePrincipal::resolve().map(|p| format!("hello {}", p.get_username()))
///     })
///     .unwrap();
/// assert_eq!(greeting.unwrap(), "hello alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePrincipal(User);

impl MessagePrincipal {
    /// Resolves the ambient principal.
    ///
    /// # Errors
    /// `Unauthenticated` when the message is anonymous or no channel
    /// dispatch is in progress.
    pub fn resolve() -> Result<Self, MessageSecurityError> {
        Self::try_resolve().ok_or(MessageSecurityError::Unauthenticated)
    }

    pub fn try_resolve() -> Option<Self> {
        SecurityContext::get_user().map(MessagePrincipal)
    }

    /// The user carried by `message` itself, ignoring the ambient context.
    pub fn from_message(message: &Message) -> Option<Self> {
        message.user().cloned().map(MessagePrincipal)
    }

    pub fn into_inner(self) -> User {
        self.0
    }

    pub fn as_user(&self) -> &User {
        &self.0
    }

    /// # Errors
    /// `MissingRole` naming `role`.
    pub fn require_role(self, role: &str) -> Result<Self, MessageSecurityError> {
        if self.0.has_role(role) {
            Ok(self)
        } else {
            Err(MessageSecurityError::MissingRole {
                role: role.to_string(),
            })
        }
    }

    pub fn require_any_role(self, roles: &[&str]) -> Result<Self, MessageSecurityError> {
        if self.0.has_any_role(roles) {
            Ok(self)
        } else {
            Err(MessageSecurityError::MissingRole {
                role: roles.join(", "),
            })
        }
    }

    /// # Errors
    /// `MissingAuthority` naming `authority`.
    pub fn require_authority(self, authority: &str) -> Result<Self, MessageSecurityError> {
        if self.0.has_authority(authority) {
            Ok(self)
        } else {
            Err(MessageSecurityError::MissingAuthority {
                authority: authority.to_string(),
            })
        }
    }
}

impl std::ops::Deref for MessagePrincipal {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<MessagePrincipal> for User {
    fn from(principal: MessagePrincipal) -> Self {
        principal.0
    }
}
