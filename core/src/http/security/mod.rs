//! Security for Actix Web message brokers.
//!
//! # Spring Equivalent
//! `org.springframework.security.config.annotation.web.socket` and
//! `org.springframework.security.messaging`
//!
//! # Module Structure
//!
//! - `access` - Configuration attributes, metadata sources and access decisions
//! - `ant_matcher` - Ant-style path pattern matching
//! - `authorizer` - Expression based URL authorization (ExpressionUrlAuthorizer)
//! - `beans` - Named bean registry used at startup (ApplicationContext)
//! - `config` - Core traits (Authenticator, Authorizer)
//! - `context` - Security context for accessing the current user
//! - `csrf` - CSRF tokens, repository and HTTP protection middleware
//! - `error` - Startup configuration errors
//! - `expression` - Security Expression Language (SpEL-like)
//! - `messaging` - Inbound message channel, interceptors and message rules
//! - `middleware` - URL security middleware (UrlSecurityTransform)
//! - `user` - User model
//! - `websocket` - Handshake interceptors, endpoint handlers and the broker configurer

pub use access::{
    AccessDecisionManager, ConfigAttribute, DecisionRule, ExpressionBasedRequestMetadataSource,
    ExpressionVoter, FilterInvocation, RequestKey, SecurityConfig, SecurityMetadataMap,
};
pub use ant_matcher::AntMatcher;
pub use authorizer::ExpressionUrlAuthorizer;
pub use beans::ApplicationContext;
pub use config::{Authenticator, Authorizer};
pub use context::SecurityContext;
pub use csrf::{CsrfConfig, CsrfError, CsrfProtection, CsrfToken, CsrfTokenRepository, SessionCsrfTokenRepository};
pub use error::ConfigurationError;
pub use messaging::{InboundChannel, Message, MessageSecurityMetadataSourceRegistry, SimpMessageType};
pub use middleware::UrlSecurityTransform;
pub use user::User;
pub use websocket::{MessageBrokerSecurityConfigurer, WebSocketMessageBrokerSecurity};

mod user;

pub mod access;
pub mod ant_matcher;
pub mod authorizer;
pub mod beans;
pub mod config;
pub mod context;
pub mod csrf;
pub mod error;
pub mod expression;
pub mod messaging;
pub mod middleware;
pub mod websocket;
