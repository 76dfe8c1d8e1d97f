//! HTTP request keys for expression-based URL authorization.
//!
//! # Spring Security Equivalent
//! `AntPathRequestMatcher`, `RegexRequestMatcher`, `FilterInvocation`,
//! `ExpressionBasedFilterInvocationSecurityMetadataSource`

use std::fmt;

use actix_web::dev::ServiceRequest;
use actix_web::http::Method;
use actix_web::HttpRequest;
use regex::Regex;

use crate::http::security::ant_matcher::AntMatcher;
use crate::http::security::expression::EvaluationContext;
use crate::http::security::User;

use super::expression_source::{ExpressionBasedMetadataSource, SecuredObjectMatcher};
use super::vote::ExpressionTarget;

/// Metadata source keyed by [`RequestKey`].
pub type ExpressionBasedRequestMetadataSource = ExpressionBasedMetadataSource<RequestKey>;

#[derive(Debug, Clone)]
enum RequestPattern {
    Ant(AntMatcher),
    /// Original source plus the anchored regex.
    Regex(String, Regex),
}

/// A path pattern with an optional HTTP method restriction.
///
/// # Example
/// ```
/// use actix_web::http::Method;
/// use actix_messaging_security_core::http::security::access::{FilterInvocation, RequestKey};
///
/// let key = RequestKey::ant("/admin/**").method(Method::POST);
/// assert!(key.matches(&FilterInvocation::new(Method::POST, "/admin/users")));
/// assert!(!key.matches(&FilterInvocation::new(Method::GET, "/admin/users")));
/// ```
#[derive(Debug, Clone)]
pub struct RequestKey {
    pattern: RequestPattern,
    method: Option<Method>,
}

impl RequestKey {
    pub fn ant(pattern: &str) -> Self {
        RequestKey {
            pattern: RequestPattern::Ant(AntMatcher::new(pattern)),
            method: None,
        }
    }

    /// A regex that must match the whole path.
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        let anchored = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(RequestKey {
            pattern: RequestPattern::Regex(pattern.to_string(), anchored),
            method: None,
        })
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn pattern(&self) -> &str {
        match &self.pattern {
            RequestPattern::Ant(matcher) => matcher.pattern(),
            RequestPattern::Regex(source, _) => source,
        }
    }

    pub fn http_method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    pub fn matches(&self, invocation: &FilterInvocation) -> bool {
        if let Some(method) = &self.method {
            if *method != invocation.method {
                return false;
            }
        }
        match &self.pattern {
            RequestPattern::Ant(matcher) => matcher.matches(&invocation.path),
            RequestPattern::Regex(_, regex) => regex.is_match(&invocation.path),
        }
    }
}

impl PartialEq for RequestKey {
    fn eq(&self, other: &Self) -> bool {
        let same_kind = matches!(
            (&self.pattern, &other.pattern),
            (RequestPattern::Ant(_), RequestPattern::Ant(_))
                | (RequestPattern::Regex(..), RequestPattern::Regex(..))
        );
        same_kind && self.pattern() == other.pattern() && self.method == other.method
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.pattern {
            RequestPattern::Ant(_) => "Ant",
            RequestPattern::Regex(..) => "Regex",
        };
        write!(f, "{} [pattern='{}'", kind, self.pattern())?;
        if let Some(method) = &self.method {
            write!(f, ", {}", method)?;
        }
        f.write_str("]")
    }
}

impl SecuredObjectMatcher<FilterInvocation> for RequestKey {
    fn matches(&self, object: &FilterInvocation) -> bool {
        RequestKey::matches(self, object)
    }
}

/// The secured object of URL authorization: a method and a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterInvocation {
    method: Method,
    path: String,
}

impl FilterInvocation {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        FilterInvocation {
            method,
            path: path.into(),
        }
    }

    pub fn from_request(req: &HttpRequest) -> Self {
        Self::new(req.method().clone(), req.path())
    }

    pub fn from_service_request(req: &ServiceRequest) -> Self {
        Self::new(req.method().clone(), req.path())
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl ExpressionTarget for FilterInvocation {
    fn evaluation_context<'a>(&'a self, user: Option<&'a User>) -> EvaluationContext<'a> {
        EvaluationContext::for_user(user).with_request(&self.path, self.method.as_str())
    }
}
