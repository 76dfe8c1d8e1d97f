//! Fluent configuration of inbound message security.
//!
//! # Spring Security Equivalent
//! `MessageSecurityMetadataSourceRegistry`
//!
//! # Example
//! ```
//! use actix_messaging_security_core::http::security::messaging::{
//!     MessageSecurityMetadataSourceRegistry, SimpMessageType,
//! };
//!
//! let mut messages = MessageSecurityMetadataSourceRegistry::new();
//! messages
//!     .null_destination_matcher().authenticated()
//!     .simp_subscribe_dest_matchers(&["/user/queue/errors"]).permit_all()
//!     .simp_dest_matchers(&["/app/**"]).has_role("USER")
//!     .simp_type_matchers(&[SimpMessageType::Message, SimpMessageType::Subscribe]).deny_all()
//!     .any_message().deny_all();
//!
//! assert!(messages.contains_mapping());
//! let source = messages.create_metadata_source().unwrap();
//! assert_eq!(source.map().len(), 5);
//! ```

use std::sync::Arc;

use crate::http::security::access::{SecurityConfig, SecurityMetadataMap};
use crate::http::security::ant_matcher::AntMatcher;
use crate::http::security::error::ConfigurationError;
use crate::http::security::expression::{DefaultExpressionParser, ExpressionParser};

use super::matcher::{ExpressionBasedMessageSecurityMetadataSource, MessageMatcher};
use super::message::SimpMessageType;

/// Ordered `matcher -> expression` mappings for the inbound channel.
///
/// Mappings are consulted in registration order; register the most
/// specific matchers first.
pub struct MessageSecurityMetadataSourceRegistry {
    mappings: SecurityMetadataMap<MessageMatcher>,
    expression_parser: Arc<dyn ExpressionParser>,
    path_separator: char,
}

impl Default for MessageSecurityMetadataSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageSecurityMetadataSourceRegistry {
    pub fn new() -> Self {
        MessageSecurityMetadataSourceRegistry {
            mappings: SecurityMetadataMap::new(),
            expression_parser: Arc::new(DefaultExpressionParser),
            path_separator: '/',
        }
    }

    pub fn any_message(&mut self) -> Constraint<'_> {
        self.constrain(vec![MessageMatcher::Any])
    }

    pub fn null_destination_matcher(&mut self) -> Constraint<'_> {
        self.constrain(vec![MessageMatcher::NullDestination])
    }

    pub fn simp_type_matchers(&mut self, types: &[SimpMessageType]) -> Constraint<'_> {
        self.constrain(vec![MessageMatcher::Types(types.to_vec())])
    }

    /// Destination patterns regardless of the message type.
    pub fn simp_dest_matchers(&mut self, patterns: &[&str]) -> Constraint<'_> {
        self.destination_matchers(patterns, None)
    }

    pub fn simp_message_dest_matchers(&mut self, patterns: &[&str]) -> Constraint<'_> {
        self.destination_matchers(patterns, Some(SimpMessageType::Message))
    }

    pub fn simp_subscribe_dest_matchers(&mut self, patterns: &[&str]) -> Constraint<'_> {
        self.destination_matchers(patterns, Some(SimpMessageType::Subscribe))
    }

    /// Arbitrary matchers.
    pub fn matchers(&mut self, matchers: Vec<MessageMatcher>) -> Constraint<'_> {
        self.constrain(matchers)
    }

    /// Separator for destination patterns registered afterwards, e.g. `'.'`
    /// for dotted destinations.
    pub fn simp_dest_path_separator(&mut self, separator: char) -> &mut Self {
        self.path_separator = separator;
        self
    }

    pub fn expression_parser<P: ExpressionParser + 'static>(&mut self, parser: P) -> &mut Self {
        self.expression_parser = Arc::new(parser);
        self
    }

    /// `true` once at least one mapping was registered.
    pub fn contains_mapping(&self) -> bool {
        !self.mappings.is_empty()
    }

    pub fn mappings(&self) -> &SecurityMetadataMap<MessageMatcher> {
        &self.mappings
    }

    /// Parses every registered expression.
    pub fn create_metadata_source(
        &self,
    ) -> Result<ExpressionBasedMessageSecurityMetadataSource, ConfigurationError> {
        ExpressionBasedMessageSecurityMetadataSource::new(
            &self.mappings,
            Some(self.expression_parser.as_ref()),
        )
    }

    fn destination_matchers(
        &mut self,
        patterns: &[&str],
        message_type: Option<SimpMessageType>,
    ) -> Constraint<'_> {
        let separator = self.path_separator;
        let matchers = patterns
            .iter()
            .map(|p| MessageMatcher::Destination {
                pattern: AntMatcher::with_separator(p, separator),
                message_type,
            })
            .collect();
        self.constrain(matchers)
    }

    fn constrain(&mut self, matchers: Vec<MessageMatcher>) -> Constraint<'_> {
        Constraint {
            registry: self,
            matchers,
        }
    }
}

/// Pending matchers waiting for their access rule.
#[must_use = "a constraint has no effect until an access rule is chosen"]
pub struct Constraint<'a> {
    registry: &'a mut MessageSecurityMetadataSourceRegistry,
    matchers: Vec<MessageMatcher>,
}

impl<'a> Constraint<'a> {
    pub fn permit_all(self) -> &'a mut MessageSecurityMetadataSourceRegistry {
        self.access("permitAll()")
    }

    pub fn deny_all(self) -> &'a mut MessageSecurityMetadataSourceRegistry {
        self.access("denyAll()")
    }

    pub fn authenticated(self) -> &'a mut MessageSecurityMetadataSourceRegistry {
        self.access("isAuthenticated()")
    }

    pub fn fully_authenticated(self) -> &'a mut MessageSecurityMetadataSourceRegistry {
        self.access("isFullyAuthenticated()")
    }

    pub fn anonymous(self) -> &'a mut MessageSecurityMetadataSourceRegistry {
        self.access("isAnonymous()")
    }

    pub fn has_role(self, role: &str) -> &'a mut MessageSecurityMetadataSourceRegistry {
        self.access(&format!("hasRole('{}')", role))
    }

    pub fn has_any_role(self, roles: &[&str]) -> &'a mut MessageSecurityMetadataSourceRegistry {
        self.access(&format!("hasAnyRole({})", quote_all(roles)))
    }

    pub fn has_authority(self, authority: &str) -> &'a mut MessageSecurityMetadataSourceRegistry {
        self.access(&format!("hasAuthority('{}')", authority))
    }

    pub fn has_any_authority(
        self,
        authorities: &[&str],
    ) -> &'a mut MessageSecurityMetadataSourceRegistry {
        self.access(&format!("hasAnyAuthority({})", quote_all(authorities)))
    }

    /// A raw expression, parsed when the metadata source is created.
    pub fn access(self, expression: &str) -> &'a mut MessageSecurityMetadataSourceRegistry {
        for matcher in self.matchers {
            self.registry
                .mappings
                .insert(matcher, SecurityConfig::create_list(&[expression]));
        }
        self.registry
    }
}

fn quote_all(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("'{}'", v))
        .collect::<Vec<_>>()
        .join(",")
}
