//! Expression roots: the functions an expression may call.
//!
//! # Spring Security Equivalent
//! `SecurityExpressionRoot`, `MessageSecurityExpressionRoot`,
//! `WebSecurityExpressionRoot`

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::http::security::ant_matcher::AntMatcher;
use crate::http::security::User;

/// What an expression is evaluated against.
///
/// Message interceptors fill in the message fields, the HTTP authorizer
/// fills in the request fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluationContext<'a> {
    pub user: Option<&'a User>,
    pub message_type: Option<&'a str>,
    pub destination: Option<&'a str>,
    pub request_path: Option<&'a str>,
    pub request_method: Option<&'a str>,
}

impl<'a> EvaluationContext<'a> {
    pub fn for_user(user: Option<&'a User>) -> Self {
        EvaluationContext {
            user,
            ..Default::default()
        }
    }

    pub fn with_message(mut self, message_type: &'a str, destination: Option<&'a str>) -> Self {
        self.message_type = Some(message_type);
        self.destination = destination;
        self
    }

    pub fn with_request(mut self, path: &'a str, method: &'a str) -> Self {
        self.request_path = Some(path);
        self.request_method = Some(method);
        self
    }
}

/// Resolves function calls inside expressions.
///
/// Return `None` for unknown functions so the evaluator can report them.
///
/// ```ignore
/// #[derive(Default)]
/// struct TenantRoot {
///     default: DefaultExpressionRoot,
/// }
///
/// impl ExpressionRoot for TenantRoot {
///     fn evaluate_function(&self, name: &str, args: &[String], ctx: &EvaluationContext<'_>) -> Option<bool> {
///         match name {
///             "isTenantAdmin" => Some(ctx.user.is_some_and(|u| u.has_authority("tenant:admin"))),
///             _ => self.default.evaluate_function(name, args, ctx),
///         }
///     }
/// }
/// ```
pub trait ExpressionRoot: Send + Sync {
    fn evaluate_function(
        &self,
        name: &str,
        args: &[String],
        ctx: &EvaluationContext<'_>,
    ) -> Option<bool>;
}

/// Built-in functions.
///
/// | function | true when |
/// |----------|-----------|
/// | `hasRole(r)` / `hasAnyRole(r..)` | user has the role(s) |
/// | `hasAuthority(a)` / `hasAnyAuthority(a..)` | user has the authority |
/// | `isAuthenticated()` / `isFullyAuthenticated()` | a user is present |
/// | `isAnonymous()` | no user |
/// | `permitAll()` / `denyAll()` | always / never |
/// | `isMessageType(t..)` | message type is one of `t` |
/// | `destinationMatches(p)` | message destination matches ant pattern `p` |
/// | `requestMatches(p)` | request path matches ant pattern `p` |
///
/// Ant patterns are compiled on first use and kept for later evaluations.
#[derive(Debug, Default)]
pub struct DefaultExpressionRoot {
    matchers: RwLock<HashMap<String, Arc<AntMatcher>>>,
}

impl DefaultExpressionRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of compiled ant patterns.
    pub fn cached_patterns(&self) -> usize {
        self.matchers.read().map(|m| m.len()).unwrap_or(0)
    }

    fn path_matches(&self, pattern: &str, path: &str) -> bool {
        let cached = self
            .matchers
            .read()
            .ok()
            .and_then(|m| m.get(pattern).cloned());
        let matcher = match cached {
            Some(matcher) => matcher,
            None => {
                let matcher = Arc::new(AntMatcher::new(pattern));
                if let Ok(mut matchers) = self.matchers.write() {
                    matchers.insert(pattern.to_string(), Arc::clone(&matcher));
                }
                matcher
            }
        };
        matcher.matches(path)
    }
}

impl ExpressionRoot for DefaultExpressionRoot {
    fn evaluate_function(
        &self,
        name: &str,
        args: &[String],
        ctx: &EvaluationContext<'_>,
    ) -> Option<bool> {
        let user = ctx.user;
        match name {
            "hasRole" => {
                let role = args.first()?;
                Some(user.is_some_and(|u| u.has_role(role)))
            }
            "hasAnyRole" => Some(user.is_some_and(|u| u.has_any_role(args))),
            "hasAuthority" => {
                let authority = args.first()?;
                Some(user.is_some_and(|u| u.has_authority(authority)))
            }
            "hasAnyAuthority" => Some(user.is_some_and(|u| u.has_any_authority(args))),
            "isAuthenticated" | "isFullyAuthenticated" => Some(user.is_some()),
            "isAnonymous" => Some(user.is_none()),
            "permitAll" => Some(true),
            "denyAll" => Some(false),
            "isMessageType" => Some(
                ctx.message_type
                    .is_some_and(|t| args.iter().any(|a| a.eq_ignore_ascii_case(t))),
            ),
            "destinationMatches" => {
                let pattern = args.first()?;
                Some(ctx.destination.is_some_and(|d| self.path_matches(pattern, d)))
            }
            "requestMatches" => {
                let pattern = args.first()?;
                Some(ctx.request_path.is_some_and(|p| self.path_matches(pattern, p)))
            }
            _ => None,
        }
    }
}
