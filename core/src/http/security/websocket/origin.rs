//! Origin validation for Cross-Site WebSocket Hijacking (CSWSH) prevention.
//!
//! # Cross-Site WebSocket Hijacking (CSWSH)
//!
//! Browsers attach cookies to WebSocket upgrade requests, so a page on
//! another site can open an authenticated socket to your server unless the
//! `Origin` header is checked.
//!
//! ```text
//! 1. User logs into https://yourapp.com (session cookie set)
//! 2. User visits https://evil.com
//! 3. evil.com runs: new WebSocket('wss://yourapp.com/ws')
//! 4. Browser includes yourapp.com cookies with the request
//! ```
//!
//! Requests from the server's own origin are always accepted. With no
//! allowed origins configured, that is the only origin accepted.
//!
//! # Usage
//!
//! ```ignore
//! use actix_messaging_security_core::http::security::websocket::OriginValidator;
//!
//! let validator = OriginValidator::builder()
//!     .allow("https://myapp.com")
//!     .allow_subdomain_pattern("*.myapp.com")
//!     .build();
//!
//! validator.validate(&req)?;
//! ```

use actix_web::HttpRequest;

use crate::http::security::messaging::SessionAttributes;

use super::error::WebSocketSecurityError;
use super::handshake::HandshakeInterceptor;

/// Validates the Origin header of WebSocket upgrade requests.
///
/// # Spring Equivalent
/// `OriginHandshakeInterceptor` allowed origins
#[derive(Debug, Clone, Default)]
pub struct OriginValidator {
    allowed_origins: Vec<String>,
    allow_any: bool,
    require_origin: bool,
}

impl OriginValidator {
    /// Accepts the listed origins plus the server's own.
    pub fn new(origins: &[&str]) -> Self {
        OriginValidator {
            allowed_origins: origins.iter().map(|s| s.to_string()).collect(),
            allow_any: false,
            require_origin: false,
        }
    }

    /// Accepts only the server's own origin.
    pub fn same_origin() -> Self {
        Self::default()
    }

    pub fn builder() -> OriginValidatorBuilder {
        OriginValidatorBuilder::default()
    }

    /// Disables origin checking.
    pub fn allow_any() -> Self {
        OriginValidator {
            allowed_origins: Vec::new(),
            allow_any: true,
            require_origin: false,
        }
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }

    /// Validates the Origin header of the request.
    ///
    /// # Errors
    /// - `MissingOrigin` when the header is absent and an origin is required
    /// - `InvalidOrigin` when the origin is neither the server's nor allowed
    pub fn validate(&self, req: &HttpRequest) -> Result<(), WebSocketSecurityError> {
        if self.allow_any {
            return Ok(());
        }

        let Some(origin) = req.headers().get("origin").and_then(|h| h.to_str().ok()) else {
            return if self.require_origin {
                Err(WebSocketSecurityError::MissingOrigin)
            } else {
                Ok(())
            };
        };

        if is_same_origin(req, origin) || self.is_allowed(origin) {
            Ok(())
        } else {
            log::debug!("Rejecting handshake from origin '{}'", origin);
            Err(WebSocketSecurityError::InvalidOrigin {
                origin: origin.to_string(),
            })
        }
    }

    fn is_allowed(&self, origin: &str) -> bool {
        let normalized = normalize(origin);

        self.allowed_origins.iter().any(|allowed| {
            if allowed == "*" {
                return true;
            }
            if let Some(domain) = allowed.trim_end_matches('/').strip_prefix("*.") {
                let domain = domain.to_ascii_lowercase();
                return normalized.split_once("://").is_some_and(|(_, host)| {
                    host == domain || host.ends_with(&format!(".{}", domain))
                });
            }
            normalized.eq_ignore_ascii_case(&normalize(allowed))
        })
    }
}

/// Lower-cased `scheme://host[:port]` without a default port or trailing slash.
fn normalize(origin: &str) -> String {
    let origin = origin.trim_end_matches('/').to_ascii_lowercase();
    for (scheme, port) in [("http://", ":80"), ("https://", ":443")] {
        if origin.starts_with(scheme) {
            if let Some(stripped) = origin.strip_suffix(port) {
                return stripped.to_string();
            }
        }
    }
    origin
}

fn is_same_origin(req: &HttpRequest, origin: &str) -> bool {
    let info = req.connection_info();
    let own = format!("{}://{}", info.scheme(), info.host());
    normalize(&own) == normalize(origin)
}

#[derive(Debug, Clone, Default)]
pub struct OriginValidatorBuilder {
    allowed_origins: Vec<String>,
    allow_any: bool,
    require_origin: bool,
}

impl OriginValidatorBuilder {
    pub fn allow(mut self, origin: &str) -> Self {
        self.allowed_origins.push(origin.to_string());
        self
    }

    pub fn allow_all(mut self, origins: &[&str]) -> Self {
        self.allowed_origins
            .extend(origins.iter().map(|s| s.to_string()));
        self
    }

    /// `"*.myapp.com"` (or `"myapp.com"`) accepts `myapp.com` and its subdomains.
    pub fn allow_subdomain_pattern(mut self, pattern: &str) -> Self {
        if pattern.starts_with("*.") {
            self.allowed_origins.push(pattern.to_string());
        } else {
            self.allowed_origins.push(format!("*.{}", pattern));
        }
        self
    }

    pub fn allow_any(mut self) -> Self {
        self.allow_any = true;
        self
    }

    /// Rejects requests without an Origin header.
    pub fn require_origin(mut self) -> Self {
        self.require_origin = true;
        self
    }

    pub fn build(self) -> OriginValidator {
        OriginValidator {
            allowed_origins: self.allowed_origins,
            allow_any: self.allow_any,
            require_origin: self.require_origin,
        }
    }
}

/// Handshake interceptor rejecting foreign origins.
#[derive(Debug, Clone, Default)]
pub struct OriginHandshakeInterceptor {
    validator: OriginValidator,
}

impl OriginHandshakeInterceptor {
    pub fn new(validator: OriginValidator) -> Self {
        OriginHandshakeInterceptor { validator }
    }

    pub fn validator(&self) -> &OriginValidator {
        &self.validator
    }
}

impl HandshakeInterceptor for OriginHandshakeInterceptor {
    fn name(&self) -> &'static str {
        "OriginHandshakeInterceptor"
    }

    fn before_handshake(
        &self,
        req: &HttpRequest,
        _attributes: &mut SessionAttributes,
    ) -> Result<bool, WebSocketSecurityError> {
        self.validator.validate(req)?;
        Ok(true)
    }
}
