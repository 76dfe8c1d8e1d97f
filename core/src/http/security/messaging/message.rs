//! STOMP-style messages flowing through the inbound channel.
//!
//! # Spring Equivalent
//! `Message<?>` with `SimpMessageHeaderAccessor` headers

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::http::security::access::ExpressionTarget;
use crate::http::security::expression::EvaluationContext;
use crate::http::security::User;

use super::attributes::SessionAttributes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimpMessageType {
    Connect,
    ConnectAck,
    Message,
    Subscribe,
    Unsubscribe,
    Heartbeat,
    Disconnect,
    DisconnectAck,
    Other,
}

impl SimpMessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimpMessageType::Connect => "CONNECT",
            SimpMessageType::ConnectAck => "CONNECT_ACK",
            SimpMessageType::Message => "MESSAGE",
            SimpMessageType::Subscribe => "SUBSCRIBE",
            SimpMessageType::Unsubscribe => "UNSUBSCRIBE",
            SimpMessageType::Heartbeat => "HEARTBEAT",
            SimpMessageType::Disconnect => "DISCONNECT",
            SimpMessageType::DisconnectAck => "DISCONNECT_ACK",
            SimpMessageType::Other => "OTHER",
        }
    }
}

impl fmt::Display for SimpMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Unknown message type '{name}'")]
pub struct UnknownMessageType {
    pub name: String,
}

impl FromStr for SimpMessageType {
    type Err = UnknownMessageType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match s.to_ascii_uppercase().as_str() {
            "CONNECT" | "STOMP" => SimpMessageType::Connect,
            "CONNECT_ACK" | "CONNECTED" => SimpMessageType::ConnectAck,
            "MESSAGE" | "SEND" => SimpMessageType::Message,
            "SUBSCRIBE" => SimpMessageType::Subscribe,
            "UNSUBSCRIBE" => SimpMessageType::Unsubscribe,
            "HEARTBEAT" => SimpMessageType::Heartbeat,
            "DISCONNECT" => SimpMessageType::Disconnect,
            "DISCONNECT_ACK" => SimpMessageType::DisconnectAck,
            "OTHER" => SimpMessageType::Other,
            _ => {
                return Err(UnknownMessageType {
                    name: s.to_string(),
                })
            }
        };
        Ok(parsed)
    }
}

/// A message on the inbound channel.
///
/// ```
/// use actix_messaging_security_core::http::security::messaging::{Message, SimpMessageType};
///
/// let msg = Message::builder(SimpMessageType::Message)
///     .destination("/app/chat")
///     .native_header("content-type", "text/plain")
///     .payload("hello")
///     .build();
/// assert_eq!(msg.destination(), Some("/app/chat"));
/// ```
#[derive(Debug, Clone)]
pub struct Message {
    message_type: SimpMessageType,
    destination: Option<String>,
    native_headers: HashMap<String, Vec<String>>,
    session_id: Option<String>,
    session_attributes: Arc<SessionAttributes>,
    user: Option<User>,
    payload: Vec<u8>,
}

impl Message {
    pub fn builder(message_type: SimpMessageType) -> MessageBuilder {
        MessageBuilder {
            message: Message {
                message_type,
                destination: None,
                native_headers: HashMap::new(),
                session_id: None,
                session_attributes: Arc::default(),
                user: None,
                payload: Vec::new(),
            },
        }
    }

    pub fn message_type(&self) -> SimpMessageType {
        self.message_type
    }

    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    /// First value of a native (STOMP frame) header. Names are case-sensitive.
    pub fn first_native_header(&self, name: &str) -> Option<&str> {
        self.native_headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn native_header_values(&self, name: &str) -> &[String] {
        self.native_headers
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn session_attributes(&self) -> &SessionAttributes {
        &self.session_attributes
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn set_user(&mut self, user: Option<User>) {
        self.user = user;
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

impl ExpressionTarget for Message {
    fn evaluation_context<'a>(&'a self, user: Option<&'a User>) -> EvaluationContext<'a> {
        EvaluationContext::for_user(user)
            .with_message(self.message_type.as_str(), self.destination.as_deref())
    }
}

pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    pub fn destination(mut self, destination: impl Into<String>) -> Self {
        self.message.destination = Some(destination.into());
        self
    }

    /// Appends a value; repeated names keep every value.
    pub fn native_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.message
            .native_headers
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    pub fn session_id(mut self, id: impl Into<String>) -> Self {
        self.message.session_id = Some(id.into());
        self
    }

    /// Shares the attributes of the owning session.
    pub fn session_attributes(mut self, attributes: Arc<SessionAttributes>) -> Self {
        self.message.session_attributes = attributes;
        self
    }

    pub fn user(mut self, user: Option<User>) -> Self {
        self.message.user = user;
        self
    }

    pub fn payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.message.payload = payload.into();
        self
    }

    pub fn build(self) -> Message {
        self.message
    }
}
