//! Access control metadata and decisions.
//!
//! - `attribute` - configuration attributes (raw strings and parsed expressions)
//! - `map` - insertion-ordered `key -> attributes` map
//! - `expression_source` - string to expression conversion, generic metadata source
//! - `vote` - voters and decision managers
//! - `request` - HTTP request keys and the URL metadata source

pub mod attribute;
pub mod expression_source;
pub mod map;
pub mod request;
pub mod vote;

pub use attribute::{ConfigAttribute, ExpressionConfigAttribute, SecurityConfig};
pub use expression_source::{process_map, ExpressionBasedMetadataSource, SecuredObjectMatcher};
pub use map::SecurityMetadataMap;
pub use request::{ExpressionBasedRequestMetadataSource, FilterInvocation, RequestKey};
pub use vote::{
    AccessDecisionManager, AccessDecisionVoter, AccessDeniedError, DecisionRule, ExpressionTarget,
    ExpressionVoter, Vote,
};
