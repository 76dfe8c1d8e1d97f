//! Startup configuration errors.
//!
//! Every variant means the security wiring is incomplete. Callers are
//! expected to abort startup instead of serving traffic unprotected.

use derive_more::{Display, Error};

use crate::http::security::expression::ParseError;

#[derive(Debug, Display, Error)]
pub enum ConfigurationError {
    #[display("A non-null expression parser is required")]
    MissingExpressionParser,

    #[display("Expected a single expression attribute for {key}, got {count}")]
    AttributeCount { key: String, count: usize },

    #[display("Failed to parse expression '{expression}' for {key}: {source}")]
    ExpressionParse {
        key: String,
        expression: String,
        source: ParseError,
    },

    #[display("No bean named '{name}' is defined")]
    NoSuchBean { name: String },

    #[display("Bean named '{name}' is expected to be of type '{expected}'")]
    BeanNotOfRequiredType { name: String, expected: &'static str },

    #[display(
        "Bean {bean} is expected to contain mappings to either a SockJsHttpRequestHandler or a WebSocketHttpRequestHandler but got {handler}"
    )]
    UnexpectedHandler { bean: String, handler: String },

    #[display("sockJsService must be instance of TransportHandlingSockJsService got {service}")]
    UnexpectedSockJsService { service: String },
}
