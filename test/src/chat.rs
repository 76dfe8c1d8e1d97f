//! Message-broker security of the chat demo.
//!
//! # Spring Security Equivalent
//! ```java
//! @Configuration
//! public class WebSocketSecurityConfig extends AbstractSecurityWebSocketMessageBrokerConfigurer {
//!     protected void configureInbound(MessageSecurityMetadataSourceRegistry messages) {
//!         messages
//!             .nullDestMatcher().authenticated()
//!             .simpSubscribeDestMatchers("/user/queue/errors").permitAll()
//!             .simpDestMatchers("/app/admin/**").hasRole("ADMIN")
//!             .simpDestMatchers("/app/**").hasRole("USER")
//!             .simpSubscribeDestMatchers("/user/**", "/topic/**").hasRole("USER")
//!             .simpTypeMatchers(MESSAGE, SUBSCRIBE).denyAll()
//!             .anyMessage().denyAll();
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use actix_messaging_security_core::http::security::beans::ApplicationContext;
use actix_messaging_security_core::http::security::error::ConfigurationError;
use actix_messaging_security_core::http::security::messaging::{
    ChannelInterceptor, ChannelRegistration, InboundChannel, Message, MessagePrincipal,
    MessageSecurityError, MessageSecurityMetadataSourceRegistry, SessionAttributes, SimpMessageType,
};
use actix_messaging_security_core::http::security::websocket::{
    MessageBrokerSecurityConfigurer, SimpleUrlHandlerMapping, StompEndpointRegistry,
    WebSocketMessageBrokerSecurity,
};
use actix_messaging_security_core::http::security::{SecurityContext, User};

/// Inbound rules and endpoints of the chat.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatSecurity {
    /// Skips the CONNECT token check, e.g. for a native client.
    pub same_origin_disabled: bool,
}

impl MessageBrokerSecurityConfigurer for ChatSecurity {
    fn same_origin_enforced(&self) -> bool {
        !self.same_origin_disabled
    }

    fn configure_inbound(&self, messages: &mut MessageSecurityMetadataSourceRegistry) {
        messages
            .null_destination_matcher()
            .authenticated()
            .simp_subscribe_dest_matchers(&["/user/queue/errors"])
            .permit_all()
            .simp_dest_matchers(&["/app/admin/**"])
            .has_role("ADMIN")
            .simp_dest_matchers(&["/app/**"])
            .has_role("USER")
            .simp_subscribe_dest_matchers(&["/user/**", "/topic/**"])
            .has_role("USER")
            .simp_type_matchers(&[SimpMessageType::Message, SimpMessageType::Subscribe])
            .deny_all()
            .any_message()
            .deny_all();
    }

    fn customize_client_inbound_channel(&self, registration: &mut ChannelRegistration) {
        registration.interceptor(FrameLogger);
    }

    fn register_stomp_endpoints(&self, registry: &mut StompEndpointRegistry) {
        registry.add_endpoint(&["/ws"]);
        registry.add_endpoint(&["/sockjs"]).with_sock_js();
    }
}

/// Logs every frame that passed the security interceptors.
pub struct FrameLogger;

impl ChannelInterceptor for FrameLogger {
    fn name(&self) -> &'static str {
        "FrameLogger"
    }

    fn pre_send(&self, message: &mut Message) -> Result<(), MessageSecurityError> {
        log::info!(
            "{} {} from {}",
            message.message_type(),
            message.destination().unwrap_or("-"),
            SecurityContext::get_username().unwrap_or_else(|| "anonymous".into())
        );
        Ok(())
    }
}

/// Runtime pieces produced by the startup sequence.
pub struct ChatState {
    pub channel: InboundChannel,
    pub endpoints: SimpleUrlHandlerMapping,
}

impl ChatState {
    /// Builds the inbound channel, registers the endpoints, runs the
    /// post-startup callback and takes the patched handler mapping out of
    /// the context.
    pub fn build<C: MessageBrokerSecurityConfigurer>(
        security: &WebSocketMessageBrokerSecurity<C>,
    ) -> Result<Self, ConfigurationError> {
        let channel = security.client_inbound_channel()?;

        let mut context = ApplicationContext::new();
        security.register_stomp_endpoints(&mut context);
        security.after_singletons_instantiated(&mut context)?;
        let endpoints =
            context.remove_bean::<SimpleUrlHandlerMapping>(security.config().bean_name())?;

        log::info!("Endpoints: {:?}", endpoints);
        Ok(ChatState { channel, endpoints })
    }
}

/// JSON frame sent by the demo client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    #[serde(rename = "type")]
    pub message_type: SimpMessageType,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: String,
}

impl Frame {
    pub fn into_message(
        self,
        session_id: &str,
        attributes: Arc<SessionAttributes>,
        user: Option<User>,
    ) -> Message {
        let mut builder = Message::builder(self.message_type)
            .session_id(session_id)
            .session_attributes(attributes)
            .user(user)
            .payload(self.body);
        if let Some(destination) = self.destination {
            builder = builder.destination(destination);
        }
        for (name, value) in self.headers {
            builder = builder.native_header(name, value);
        }
        builder.build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub ok: bool,
    pub detail: String,
}

impl Reply {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

static SESSION_IDS: AtomicU64 = AtomicU64::new(1);

pub fn next_session_id() -> String {
    SESSION_IDS.fetch_add(1, Ordering::Relaxed).to_string()
}

/// Parses `text`, sends it through `channel` and renders the reply.
pub fn handle_frame(
    channel: &InboundChannel,
    text: &str,
    session_id: &str,
    attributes: &Arc<SessionAttributes>,
    user: Option<User>,
) -> String {
    let frame: Frame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            return Reply {
                ok: false,
                detail: format!("malformed frame: {}", e),
            }
            .to_json()
        }
    };

    let message = frame.into_message(session_id, Arc::clone(attributes), user);
    let reply = match channel.send(message, |m| deliver(m, MessagePrincipal::try_resolve())) {
        Ok(detail) => Reply { ok: true, detail },
        Err(e) => Reply {
            ok: false,
            detail: e.to_string(),
        },
    };
    reply.to_json()
}

/// Stands in for the broker: acknowledges the frame on behalf of the
/// resolved principal.
fn deliver(message: &Message, principal: Option<MessagePrincipal>) -> String {
    let from = principal
        .as_ref()
        .map(|p| p.get_username())
        .unwrap_or("anonymous");
    match message.message_type() {
        SimpMessageType::Connect => format!("CONNECTED {}", from),
        other => format!(
            "{} {} by {}",
            other,
            message.destination().unwrap_or("-"),
            from
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> InboundChannel {
        WebSocketMessageBrokerSecurity::new(ChatSecurity {
            same_origin_disabled: true,
        })
        .client_inbound_channel()
        .unwrap()
    }

    fn reply(text: &str, user: Option<User>) -> Reply {
        let attributes = Arc::new(SessionAttributes::new());
        let json = handle_frame(&channel(), text, "1", &attributes, user);
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_frame_is_delivered_as_the_session_user() {
        let r = reply(
            r#"{"type":"MESSAGE","destination":"/app/chat","body":"hi"}"#,
            crate::demo_user("user"),
        );
        assert_eq!(
            r,
            Reply {
                ok: true,
                detail: "MESSAGE /app/chat by user".into()
            }
        );
    }

    #[test]
    fn test_permitted_anonymous_frame_has_no_principal() {
        let r = reply(
            r#"{"type":"SUBSCRIBE","destination":"/user/queue/errors"}"#,
            None,
        );
        assert_eq!(r.detail, "SUBSCRIBE /user/queue/errors by anonymous");
    }

    #[test]
    fn test_denied_and_malformed_frames() {
        let denied = reply(
            r#"{"type":"MESSAGE","destination":"/app/admin/ban"}"#,
            crate::demo_user("user"),
        );
        assert!(!denied.ok);
        assert!(denied.detail.contains("/app/admin/ban"));

        let malformed = reply("not json", None);
        assert!(!malformed.ok);
        assert!(malformed.detail.starts_with("malformed frame"));
    }
}
