//! Expression-based metadata sources.
//!
//! Turns an ordered `key -> "expression string"` map into an ordered
//! `key -> parsed expression` map once at startup, then answers
//! "which attributes apply to this object?" by walking the keys in order.
//!
//! # Spring Security Equivalent
//! `ExpressionBasedFilterInvocationSecurityMetadataSource`,
//! `ExpressionBasedMessageSecurityMetadataSourceFactory`

use std::fmt;

use crate::http::security::error::ConfigurationError;
use crate::http::security::expression::ExpressionParser;

use super::attribute::{ConfigAttribute, ExpressionConfigAttribute};
use super::map::SecurityMetadataMap;

/// A key of a metadata map that can decide whether it applies to a
/// secured object of type `T`.
pub trait SecuredObjectMatcher<T: ?Sized> {
    fn matches(&self, object: &T) -> bool;
}

/// Parses every entry of `request_map` into a single expression attribute.
///
/// Each entry must carry exactly one attribute. String attributes are
/// parsed with `parser`; attributes that already hold an expression are
/// kept as they are. The first bad entry aborts the whole conversion.
pub fn process_map<K>(
    request_map: &SecurityMetadataMap<K>,
    parser: Option<&dyn ExpressionParser>,
) -> Result<SecurityMetadataMap<K>, ConfigurationError>
where
    K: Clone + PartialEq + fmt::Display,
{
    let parser = parser.ok_or(ConfigurationError::MissingExpressionParser)?;
    let mut processed = SecurityMetadataMap::new();

    for (key, attributes) in request_map.iter() {
        let [attribute] = attributes else {
            return Err(ConfigurationError::AttributeCount {
                key: key.to_string(),
                count: attributes.len(),
            });
        };

        let converted = match attribute {
            ConfigAttribute::Expression(existing) => ConfigAttribute::Expression(existing.clone()),
            ConfigAttribute::Security(config) => {
                let expression = config.attribute();
                log::debug!("Adding web access control expression '{}', for {}", expression, key);
                let parsed = parser.parse_expression(expression).map_err(|source| {
                    ConfigurationError::ExpressionParse {
                        key: key.to_string(),
                        expression: expression.to_string(),
                        source,
                    }
                })?;
                ExpressionConfigAttribute::new(parsed).into()
            }
        };

        processed.insert(key.clone(), vec![converted]);
    }

    Ok(processed)
}

/// Ordered, pre-parsed attribute lookup.
#[derive(Debug, Clone)]
pub struct ExpressionBasedMetadataSource<K> {
    map: SecurityMetadataMap<K>,
}

impl<K> ExpressionBasedMetadataSource<K>
where
    K: Clone + PartialEq + fmt::Display,
{
    pub fn new(
        request_map: &SecurityMetadataMap<K>,
        parser: Option<&dyn ExpressionParser>,
    ) -> Result<Self, ConfigurationError> {
        Ok(ExpressionBasedMetadataSource {
            map: process_map(request_map, parser)?,
        })
    }
}

impl<K> ExpressionBasedMetadataSource<K> {
    /// Attributes of the first key matching `object`.
    pub fn get_attributes<T: ?Sized>(&self, object: &T) -> Option<&[ConfigAttribute]>
    where
        K: SecuredObjectMatcher<T>,
    {
        self.map.find(|key| key.matches(object))
    }

    pub fn get_all_config_attributes(&self) -> Vec<&ConfigAttribute> {
        self.map.iter().flat_map(|(_, attributes)| attributes).collect()
    }

    pub fn map(&self) -> &SecurityMetadataMap<K> {
        &self.map
    }
}
