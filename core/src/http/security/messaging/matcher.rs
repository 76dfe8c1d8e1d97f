//! Message matchers used as keys of the inbound security mapping.
//!
//! # Spring Security Equivalent
//! `SimpDestinationMessageMatcher`, `SimpMessageTypeMatcher`,
//! `MessageMatcher.ANY_MESSAGE`

use std::fmt;

use crate::http::security::access::{ExpressionBasedMetadataSource, SecuredObjectMatcher};
use crate::http::security::ant_matcher::AntMatcher;

use super::message::{Message, SimpMessageType};

/// Metadata source keyed by [`MessageMatcher`].
pub type ExpressionBasedMessageSecurityMetadataSource = ExpressionBasedMetadataSource<MessageMatcher>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageMatcher {
    /// Every message.
    Any,
    /// Messages without a destination, such as CONNECT or HEARTBEAT.
    NullDestination,
    /// Messages of one of the listed types.
    Types(Vec<SimpMessageType>),
    /// Messages whose destination matches an ant pattern, optionally
    /// restricted to a single message type.
    Destination {
        pattern: AntMatcher,
        message_type: Option<SimpMessageType>,
    },
}

impl MessageMatcher {
    pub fn destination(pattern: &str) -> Self {
        MessageMatcher::Destination {
            pattern: AntMatcher::new(pattern),
            message_type: None,
        }
    }

    /// MESSAGE frames sent to a matching destination.
    pub fn message_destination(pattern: &str) -> Self {
        MessageMatcher::Destination {
            pattern: AntMatcher::new(pattern),
            message_type: Some(SimpMessageType::Message),
        }
    }

    /// SUBSCRIBE frames to a matching destination.
    pub fn subscribe_destination(pattern: &str) -> Self {
        MessageMatcher::Destination {
            pattern: AntMatcher::new(pattern),
            message_type: Some(SimpMessageType::Subscribe),
        }
    }

    pub fn matches(&self, message: &Message) -> bool {
        match self {
            MessageMatcher::Any => true,
            MessageMatcher::NullDestination => message.destination().is_none(),
            MessageMatcher::Types(types) => types.contains(&message.message_type()),
            MessageMatcher::Destination {
                pattern,
                message_type,
            } => {
                if message_type.is_some_and(|t| t != message.message_type()) {
                    return false;
                }
                message
                    .destination()
                    .is_some_and(|destination| pattern.matches(destination))
            }
        }
    }
}

impl SecuredObjectMatcher<Message> for MessageMatcher {
    fn matches(&self, object: &Message) -> bool {
        MessageMatcher::matches(self, object)
    }
}

impl fmt::Display for MessageMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageMatcher::Any => f.write_str("AnyMessage"),
            MessageMatcher::NullDestination => f.write_str("NullDestination"),
            MessageMatcher::Types(types) => {
                let names: Vec<&str> = types.iter().map(SimpMessageType::as_str).collect();
                write!(f, "SimpMessageType [types={}]", names.join(", "))
            }
            MessageMatcher::Destination {
                pattern,
                message_type,
            } => {
                write!(f, "SimpDestination [pattern='{}'", pattern)?;
                if let Some(t) = message_type {
                    write!(f, ", type={}", t)?;
                }
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(t: SimpMessageType, destination: Option<&str>) -> Message {
        let builder = Message::builder(t);
        match destination {
            Some(d) => builder.destination(d).build(),
            None => builder.build(),
        }
    }

    #[test]
    fn test_null_destination() {
        let matcher = MessageMatcher::NullDestination;
        assert!(matcher.matches(&message(SimpMessageType::Connect, None)));
        assert!(!matcher.matches(&message(SimpMessageType::Message, Some("/app/x"))));
    }

    #[test]
    fn test_types() {
        let matcher = MessageMatcher::Types(vec![SimpMessageType::Connect, SimpMessageType::Disconnect]);
        assert!(matcher.matches(&message(SimpMessageType::Disconnect, None)));
        assert!(!matcher.matches(&message(SimpMessageType::Subscribe, Some("/topic/a"))));
        assert_eq!(matcher.to_string(), "SimpMessageType [types=CONNECT, DISCONNECT]");
    }

    #[test]
    fn test_destination_with_type() {
        let subscribe = MessageMatcher::subscribe_destination("/topic/**");
        assert!(subscribe.matches(&message(SimpMessageType::Subscribe, Some("/topic/a/b"))));
        assert!(!subscribe.matches(&message(SimpMessageType::Message, Some("/topic/a"))));
        assert!(!subscribe.matches(&message(SimpMessageType::Subscribe, None)));

        let any_type = MessageMatcher::destination("/app/*");
        assert!(any_type.matches(&message(SimpMessageType::Message, Some("/app/chat"))));
        assert!(any_type.matches(&message(SimpMessageType::Subscribe, Some("/app/chat"))));
        assert_eq!(
            subscribe.to_string(),
            "SimpDestination [pattern='/topic/**', type=SUBSCRIBE]"
        );
    }
}
