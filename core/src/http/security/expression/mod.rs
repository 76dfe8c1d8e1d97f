//! Access-control expression language.
//!
//! # Spring Security Equivalent
//! `org.springframework.security.access.expression`
//!
//! # Syntax
//! - functions: `hasRole('USER')`, `hasAnyAuthority('a', 'b')`, `isAuthenticated()`,
//!   `isMessageType('SUBSCRIBE')`, `destinationMatches('/topic/**')`, ...
//!   (see [`DefaultExpressionRoot`])
//! - operators: `and` / `&&`, `or` / `||`, `not` / `!`, parentheses
//! - literals: `true`, `false`
//!
//! ```ignore
//! use actix_messaging_security_core::http::security::expression::{
//!     EvaluationContext, ExpressionEvaluator, SecurityExpression,
//! };
//!
//! let expr = SecurityExpression::parse("hasRole('USER') and isMessageType('MESSAGE')")?;
//! let ctx = EvaluationContext::for_user(Some(&user)).with_message("MESSAGE", Some("/app/chat"));
//! let allowed = expr.evaluate(&ExpressionEvaluator::new(), &ctx)?;
//! ```

mod ast;
mod evaluator;
mod parser;
mod root;

pub use ast::Expression;
pub use evaluator::{EvaluationError, ExpressionEvaluator};
pub use parser::{DefaultExpressionParser, ExpressionParser, ParseError, SecurityExpression};
pub use root::{DefaultExpressionRoot, EvaluationContext, ExpressionRoot};
