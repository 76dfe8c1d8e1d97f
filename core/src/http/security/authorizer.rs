//! Expression based URL authorization.
//!
//! # Spring Security Equivalent
//! `FilterSecurityInterceptor` over an
//! `ExpressionBasedFilterInvocationSecurityMetadataSource`

use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpResponse};
use futures_util::future::LocalBoxFuture;

use crate::http::security::access::{
    AccessDecisionManager, AccessDeniedError, ExpressionBasedRequestMetadataSource,
    ExpressionVoter, FilterInvocation, RequestKey, SecurityMetadataMap,
};
use crate::http::security::config::Authorizer;
use crate::http::security::error::ConfigurationError;
use crate::http::security::expression::{DefaultExpressionParser, ExpressionParser};
use crate::http::security::user::User;

/// URL authorization over an ordered `RequestKey -> expression` map.
///
/// Requests no key matches are forwarded. A denied anonymous request gets
/// `401 Unauthorized`, a denied authenticated one `403 Forbidden`.
///
/// # Example
/// ```
/// use actix_messaging_security_core::http::security::access::{
///     RequestKey, SecurityConfig, SecurityMetadataMap,
/// };
/// use actix_messaging_security_core::http::security::authorizer::ExpressionUrlAuthorizer;
///
/// let map = SecurityMetadataMap::new()
///     .with(RequestKey::ant("/admin/**"), SecurityConfig::create_list(&["hasRole('ADMIN')"]))
///     .with(RequestKey::ant("/**"), SecurityConfig::create_list(&["permitAll()"]));
///
/// let authorizer = ExpressionUrlAuthorizer::from_map(&map).unwrap();
/// assert_eq!(authorizer.metadata_source().map().len(), 2);
/// ```
#[derive(Debug)]
pub struct ExpressionUrlAuthorizer {
    metadata_source: ExpressionBasedRequestMetadataSource,
    access_decision_manager: AccessDecisionManager<FilterInvocation>,
}

impl ExpressionUrlAuthorizer {
    /// Affirmative decision with one expression voter.
    pub fn new(metadata_source: ExpressionBasedRequestMetadataSource) -> Self {
        Self::with_decision_manager(
            metadata_source,
            AccessDecisionManager::affirmative(ExpressionVoter::new()),
        )
    }

    pub fn with_decision_manager(
        metadata_source: ExpressionBasedRequestMetadataSource,
        access_decision_manager: AccessDecisionManager<FilterInvocation>,
    ) -> Self {
        ExpressionUrlAuthorizer {
            metadata_source,
            access_decision_manager,
        }
    }

    /// Parses `map` with the default expression parser.
    pub fn from_map(map: &SecurityMetadataMap<RequestKey>) -> Result<Self, ConfigurationError> {
        let source = ExpressionBasedRequestMetadataSource::new(
            map,
            Some(&DefaultExpressionParser as &dyn ExpressionParser),
        )?;
        Ok(Self::new(source))
    }

    pub fn metadata_source(&self) -> &ExpressionBasedRequestMetadataSource {
        &self.metadata_source
    }

    /// `Ok` when no key matches or the decision manager grants access.
    pub fn decide(
        &self,
        user: Option<&User>,
        invocation: &FilterInvocation,
    ) -> Result<(), AccessDeniedError> {
        match self.metadata_source.get_attributes(invocation) {
            Some(attributes) => self
                .access_decision_manager
                .decide(user, invocation, attributes),
            None => Ok(()),
        }
    }
}

impl<B: 'static> Authorizer<B> for ExpressionUrlAuthorizer {
    fn process(
        &self,
        req: ServiceRequest,
        user: Option<&User>,
        next: impl FnOnce(ServiceRequest) -> LocalBoxFuture<'static, Result<ServiceResponse<B>, Error>>
            + 'static,
    ) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>> {
        let invocation = FilterInvocation::from_service_request(&req);

        if self.decide(user, &invocation).is_ok() {
            return Box::pin(async move {
                let res = next(req).await?;
                Ok(res.map_into_left_body())
            });
        }

        log::debug!(
            "Access denied to {} {} for {}",
            invocation.method(),
            invocation.path(),
            user.map(|u| u.get_username()).unwrap_or("anonymous")
        );
        let response = match user {
            Some(_) => HttpResponse::Forbidden().finish(),
            None => HttpResponse::Unauthorized().finish(),
        };
        Box::pin(async move { Ok(req.into_response(response.map_into_right_body())) })
    }
}
