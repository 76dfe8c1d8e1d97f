//! Security interceptors for the inbound channel.
//!
//! # Spring Security Equivalent
//! `SecurityContextChannelInterceptor`, `CsrfChannelInterceptor`,
//! `ChannelSecurityInterceptor`

use std::sync::Arc;

use crate::http::security::access::AccessDecisionManager;
use crate::http::security::context::SecurityContext;
use crate::http::security::csrf::{CsrfToken, CSRF_TOKEN_ATTRIBUTE};

use super::channel::ChannelInterceptor;
use super::error::MessageSecurityError;
use super::matcher::ExpressionBasedMessageSecurityMetadataSource;
use super::message::{Message, SimpMessageType};

/// Makes the message's user the ambient identity while it is dispatched.
///
/// A message without a user dispatches anonymously. The previous identity
/// is restored in `after_send_completion`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityContextChannelInterceptor;

impl SecurityContextChannelInterceptor {
    pub fn new() -> Self {
        SecurityContextChannelInterceptor
    }
}

impl ChannelInterceptor for SecurityContextChannelInterceptor {
    fn name(&self) -> &'static str {
        "SecurityContextChannelInterceptor"
    }

    fn pre_send(&self, message: &mut Message) -> Result<(), MessageSecurityError> {
        SecurityContext::push(message.user().cloned());
        Ok(())
    }

    fn after_send_completion(&self, _message: &Message, _sent: bool) {
        SecurityContext::pop();
    }
}

/// Checks the CSRF token of CONNECT frames.
///
/// The expected token is the one the handshake stored in the session
/// attributes; the frame must repeat it in the native header named by the
/// token. Other message types pass untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsrfChannelInterceptor;

impl CsrfChannelInterceptor {
    pub fn new() -> Self {
        CsrfChannelInterceptor
    }
}

impl ChannelInterceptor for CsrfChannelInterceptor {
    fn name(&self) -> &'static str {
        "CsrfChannelInterceptor"
    }

    fn pre_send(&self, message: &mut Message) -> Result<(), MessageSecurityError> {
        if message.message_type() != SimpMessageType::Connect {
            return Ok(());
        }

        let expected = match message
            .session_attributes()
            .get::<CsrfToken>(CSRF_TOKEN_ATTRIBUTE)
        {
            Ok(Some(token)) => token,
            Ok(None) => return Err(MessageSecurityError::MissingCsrfToken),
            Err(e) => {
                log::warn!("Unreadable CSRF token in session attributes: {}", e);
                return Err(MessageSecurityError::MissingCsrfToken);
            }
        };

        let actual = message.first_native_header(expected.header_name());
        if actual.is_some_and(|value| expected.matches(value)) {
            Ok(())
        } else {
            Err(MessageSecurityError::InvalidCsrfToken {
                header: expected.header_name().to_string(),
            })
        }
    }
}

/// Authorizes messages against the inbound mappings.
///
/// The decision uses the ambient user, so this interceptor must run after
/// [`SecurityContextChannelInterceptor`]. Messages no mapping matches pass.
#[derive(Debug, Clone)]
pub struct ChannelSecurityInterceptor {
    metadata_source: Arc<ExpressionBasedMessageSecurityMetadataSource>,
    access_decision_manager: Arc<AccessDecisionManager<Message>>,
}

impl ChannelSecurityInterceptor {
    pub fn new(
        metadata_source: ExpressionBasedMessageSecurityMetadataSource,
        access_decision_manager: AccessDecisionManager<Message>,
    ) -> Self {
        ChannelSecurityInterceptor {
            metadata_source: Arc::new(metadata_source),
            access_decision_manager: Arc::new(access_decision_manager),
        }
    }

    pub fn metadata_source(&self) -> &ExpressionBasedMessageSecurityMetadataSource {
        &self.metadata_source
    }

    pub fn access_decision_manager(&self) -> &AccessDecisionManager<Message> {
        &self.access_decision_manager
    }
}

impl ChannelInterceptor for ChannelSecurityInterceptor {
    fn name(&self) -> &'static str {
        "ChannelSecurityInterceptor"
    }

    fn pre_send(&self, message: &mut Message) -> Result<(), MessageSecurityError> {
        let Some(attributes) = self.metadata_source.get_attributes(&*message) else {
            return Ok(());
        };

        let user = SecurityContext::get_user();
        self.access_decision_manager
            .decide(user.as_ref(), message, attributes)
            .map_err(|_| {
                let destination = message.destination().unwrap_or("<none>").to_string();
                log::debug!(
                    "Denied {} message to {} for {}",
                    message.message_type(),
                    destination,
                    user.as_ref()
                        .map(|u| u.get_username())
                        .unwrap_or("anonymous")
                );
                MessageSecurityError::AccessDenied {
                    message_type: message.message_type().to_string(),
                    destination,
                }
            })
    }
}
