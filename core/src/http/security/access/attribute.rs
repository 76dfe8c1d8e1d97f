//! Configuration attributes attached to secured objects.
//!
//! # Spring Security Equivalent
//! `ConfigAttribute`, `SecurityConfig`, `WebExpressionConfigAttribute`

use std::fmt;

use crate::http::security::expression::SecurityExpression;

/// A plain string attribute, e.g. `"hasRole('USER')"` before parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecurityConfig(String);

impl SecurityConfig {
    pub fn new(attribute: impl Into<String>) -> Self {
        SecurityConfig(attribute.into())
    }

    pub fn attribute(&self) -> &str {
        &self.0
    }

    /// One attribute per string.
    pub fn create_list(attributes: &[&str]) -> Vec<ConfigAttribute> {
        attributes
            .iter()
            .map(|a| ConfigAttribute::from(SecurityConfig::new(*a)))
            .collect()
    }
}

/// A parsed expression plus its source text for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionConfigAttribute {
    expression: SecurityExpression,
}

impl ExpressionConfigAttribute {
    pub fn new(expression: SecurityExpression) -> Self {
        ExpressionConfigAttribute { expression }
    }

    pub fn expression(&self) -> &SecurityExpression {
        &self.expression
    }

    pub fn source(&self) -> &str {
        self.expression.source()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAttribute {
    Security(SecurityConfig),
    Expression(ExpressionConfigAttribute),
}

impl ConfigAttribute {
    /// The raw string, or `None` for attributes that cannot be represented as one.
    pub fn attribute(&self) -> Option<&str> {
        match self {
            ConfigAttribute::Security(config) => Some(config.attribute()),
            ConfigAttribute::Expression(_) => None,
        }
    }

    pub fn as_expression(&self) -> Option<&ExpressionConfigAttribute> {
        match self {
            ConfigAttribute::Expression(expr) => Some(expr),
            ConfigAttribute::Security(_) => None,
        }
    }
}

impl From<SecurityConfig> for ConfigAttribute {
    fn from(config: SecurityConfig) -> Self {
        ConfigAttribute::Security(config)
    }
}

impl From<ExpressionConfigAttribute> for ConfigAttribute {
    fn from(attribute: ExpressionConfigAttribute) -> Self {
        ConfigAttribute::Expression(attribute)
    }
}

impl fmt::Display for ConfigAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigAttribute::Security(config) => f.write_str(config.attribute()),
            ConfigAttribute::Expression(expr) => f.write_str(expr.source()),
        }
    }
}
