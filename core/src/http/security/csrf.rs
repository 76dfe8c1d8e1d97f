//! CSRF tokens for HTTP requests and WebSocket sessions.
//!
//! # Spring Security Equivalent
//! `CsrfToken`, `HttpSessionCsrfTokenRepository`, `CsrfFilter`
//!
//! The HTTP filter loads (or issues) the session token and exposes it in the
//! request extensions. The handshake interceptor copies it into the
//! WebSocket session attributes, where the CONNECT check finds it.
//!
//! # Example
//! ```rust,ignore
//! use actix_messaging_security_core::http::security::csrf::{CsrfConfig, CsrfProtection};
//!
//! App::new()
//!     .wrap(CsrfProtection::new(CsrfConfig::default().ignore_path("/ws/.*")))
//!     .wrap(session_middleware)
//! ```

use std::rc::Rc;
use std::sync::Arc;

use actix_session::SessionExt;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::{Method, StatusCode};
use actix_web::{Error as ActixError, HttpMessage, HttpRequest, HttpResponse, ResponseError};
use derive_more::{Display, Error};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

pub const DEFAULT_CSRF_HEADER_NAME: &str = "X-CSRF-TOKEN";
pub const DEFAULT_CSRF_PARAMETER_NAME: &str = "_csrf";

/// Session attribute holding the [`CsrfToken`] of a WebSocket session.
pub const CSRF_TOKEN_ATTRIBUTE: &str = "CsrfToken";

/// A CSRF token plus the names it is expected under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrfToken {
    token: String,
    header_name: String,
    parameter_name: String,
}

impl CsrfToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_names(token, DEFAULT_CSRF_HEADER_NAME, DEFAULT_CSRF_PARAMETER_NAME)
    }

    pub fn with_names(token: impl Into<String>, header_name: &str, parameter_name: &str) -> Self {
        CsrfToken {
            token: token.into(),
            header_name: header_name.to_string(),
            parameter_name: parameter_name.to_string(),
        }
    }

    /// A fresh random token with the default names.
    pub fn generate() -> Self {
        Self::new(random_token_value())
    }

    pub fn value(&self) -> &str {
        &self.token
    }

    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }

    /// Compares `candidate` with the token in constant time.
    pub fn matches(&self, candidate: &str) -> bool {
        self.token.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

/// Storage for the CSRF token of an HTTP session.
pub trait CsrfTokenRepository: Send + Sync {
    fn generate_token(&self) -> CsrfToken;

    fn save_token(&self, req: &HttpRequest, token: &CsrfToken) -> Result<(), CsrfError>;

    fn load_token(&self, req: &HttpRequest) -> Option<CsrfToken>;

    /// Loads the stored token, issuing and saving a new one when absent.
    fn load_or_generate(&self, req: &HttpRequest) -> Result<CsrfToken, CsrfError> {
        if let Some(token) = self.load_token(req) {
            return Ok(token);
        }
        let token = self.generate_token();
        self.save_token(req, &token)?;
        log::debug!("Issued new CSRF token for {}", req.path());
        Ok(token)
    }
}

/// Keeps the token in the `actix-session` session.
#[derive(Debug, Clone)]
pub struct SessionCsrfTokenRepository {
    session_key: String,
    header_name: String,
    parameter_name: String,
}

impl Default for SessionCsrfTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionCsrfTokenRepository {
    pub fn new() -> Self {
        SessionCsrfTokenRepository {
            session_key: "CSRF_TOKEN".to_string(),
            header_name: DEFAULT_CSRF_HEADER_NAME.to_string(),
            parameter_name: DEFAULT_CSRF_PARAMETER_NAME.to_string(),
        }
    }

    pub fn session_key(mut self, key: &str) -> Self {
        self.session_key = key.to_string();
        self
    }

    pub fn header_name(mut self, name: &str) -> Self {
        self.header_name = name.to_string();
        self
    }

    pub fn parameter_name(mut self, name: &str) -> Self {
        self.parameter_name = name.to_string();
        self
    }
}

impl CsrfTokenRepository for SessionCsrfTokenRepository {
    fn generate_token(&self) -> CsrfToken {
        CsrfToken::with_names(random_token_value(), &self.header_name, &self.parameter_name)
    }

    fn save_token(&self, req: &HttpRequest, token: &CsrfToken) -> Result<(), CsrfError> {
        req.get_session()
            .insert(&self.session_key, token.value())
            .map_err(|e| CsrfError::Storage {
                message: e.to_string(),
            })
    }

    fn load_token(&self, req: &HttpRequest) -> Option<CsrfToken> {
        req.get_session()
            .get::<String>(&self.session_key)
            .ok()
            .flatten()
            .map(|token| CsrfToken::with_names(token, &self.header_name, &self.parameter_name))
    }
}

/// Settings of [`CsrfProtection`].
#[derive(Clone)]
pub struct CsrfConfig {
    repository: Arc<dyn CsrfTokenRepository>,
    protected_methods: Vec<Method>,
    ignored_paths: Vec<Regex>,
}

impl Default for CsrfConfig {
    /// Session storage, protecting POST, PUT, DELETE and PATCH.
    fn default() -> Self {
        CsrfConfig {
            repository: Arc::new(SessionCsrfTokenRepository::new()),
            protected_methods: vec![Method::POST, Method::PUT, Method::DELETE, Method::PATCH],
            ignored_paths: Vec::new(),
        }
    }
}

impl CsrfConfig {
    pub fn repository<R: CsrfTokenRepository + 'static>(mut self, repository: R) -> Self {
        self.repository = Arc::new(repository);
        self
    }

    pub fn protected_methods(mut self, methods: Vec<Method>) -> Self {
        self.protected_methods = methods;
        self
    }

    /// Skips validation for paths matching `pattern`. Invalid patterns are
    /// logged and ignored.
    pub fn ignore_path(mut self, pattern: &str) -> Self {
        match Regex::new(pattern) {
            Ok(regex) => self.ignored_paths.push(regex),
            Err(e) => log::warn!("Ignoring invalid CSRF path pattern '{}': {}", pattern, e),
        }
        self
    }

    fn is_path_ignored(&self, path: &str) -> bool {
        self.ignored_paths.iter().any(|regex| regex.is_match(path))
    }

    fn requires_protection(&self, method: &Method) -> bool {
        self.protected_methods.contains(method)
    }
}

/// Middleware exposing the session [`CsrfToken`] in the request extensions
/// and validating it on state-changing requests.
#[derive(Clone, Default)]
pub struct CsrfProtection {
    config: CsrfConfig,
}

impl CsrfProtection {
    pub fn new(config: CsrfConfig) -> Self {
        CsrfProtection { config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CsrfProtection
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type Transform = CsrfMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(CsrfMiddleware {
            service: Rc::new(service),
            config: self.config.clone(),
        })
    }
}

pub struct CsrfMiddleware<S> {
    service: Rc<S>,
    config: CsrfConfig,
}

impl<S, B> Service<ServiceRequest> for CsrfMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let config = self.config.clone();

        Box::pin(async move {
            let token = match config.repository.load_or_generate(req.request()) {
                Ok(token) => token,
                Err(e) => return Ok(req.error_response(e).map_into_right_body()),
            };
            req.extensions_mut().insert(token.clone());

            if config.requires_protection(req.method()) && !config.is_path_ignored(req.path()) {
                let verdict = match submitted_token(&req, &token) {
                    Some(submitted) if token.matches(&submitted) => None,
                    Some(_) => Some(CsrfError::InvalidToken),
                    None => Some(CsrfError::MissingToken),
                };
                if let Some(e) = verdict {
                    log::debug!("Rejecting {} {}: {}", req.method(), req.path(), e);
                    return Ok(req.error_response(e).map_into_right_body());
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Header first, then query parameter.
fn submitted_token(req: &ServiceRequest, token: &CsrfToken) -> Option<String> {
    if let Some(value) = req
        .headers()
        .get(token.header_name())
        .and_then(|h| h.to_str().ok())
    {
        return Some(value.to_string());
    }

    let prefix = format!("{}=", token.parameter_name());
    req.query_string()
        .split('&')
        .find_map(|pair| pair.strip_prefix(prefix.as_str()))
        .map(str::to_string)
}

#[derive(Debug, Display, Error)]
pub enum CsrfError {
    #[display("CSRF token missing")]
    MissingToken,
    #[display("Invalid CSRF token")]
    InvalidToken,
    #[display("CSRF storage error: {message}")]
    Storage { message: String },
}

impl ResponseError for CsrfError {
    fn status_code(&self) -> StatusCode {
        match self {
            CsrfError::MissingToken | CsrfError::InvalidToken => StatusCode::FORBIDDEN,
            CsrfError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}

fn random_token_value() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
