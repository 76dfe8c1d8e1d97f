//! URL security middleware for Actix Web.
//!
//! # Spring Equivalent
//! `FilterChainProxy` with a `FilterSecurityInterceptor`

use std::rc::Rc;
use std::sync::Arc;

use actix_service::{Service, Transform};
use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ok, LocalBoxFuture, Ready};

use crate::http::security::config::{Authenticator, Authorizer};
use crate::http::security::context::SecurityContext;

/// Security middleware factory.
///
/// The authenticated user is stored in the request extensions and is the
/// ambient [`SecurityContext`] user while the inner service runs.
///
/// # Example
/// ```ignore
/// App::new().wrap(
///     UrlSecurityTransform::new()
///         .authenticator(header_authenticator)
///         .authorizer(ExpressionUrlAuthorizer::from_map(&urls)?)
/// )
/// ```
pub struct UrlSecurityTransform<Auth, Autho> {
    authenticator: Option<Arc<Auth>>,
    authorizer: Option<Arc<Autho>>,
}

impl<Auth, Autho> UrlSecurityTransform<Auth, Autho> {
    pub fn new() -> Self {
        UrlSecurityTransform {
            authenticator: None,
            authorizer: None,
        }
    }

    pub fn authenticator(mut self, authenticator: Auth) -> Self {
        self.authenticator = Some(Arc::new(authenticator));
        self
    }

    pub fn authorizer(mut self, authorizer: Autho) -> Self {
        self.authorizer = Some(Arc::new(authorizer));
        self
    }

    /// Shares an authorizer built once for every worker.
    pub fn shared_authorizer(mut self, authorizer: Arc<Autho>) -> Self {
        self.authorizer = Some(authorizer);
        self
    }
}

impl<Auth, Autho> Default for UrlSecurityTransform<Auth, Autho> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Auth, Autho> Clone for UrlSecurityTransform<Auth, Autho> {
    fn clone(&self) -> Self {
        UrlSecurityTransform {
            authenticator: self.authenticator.clone(),
            authorizer: self.authorizer.clone(),
        }
    }
}

impl<S, B, Auth, Autho> Transform<S, ServiceRequest> for UrlSecurityTransform<Auth, Autho>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    Auth: Authenticator + 'static,
    Autho: Authorizer<B> + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = UrlSecurityService<Auth, Autho, S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(UrlSecurityService {
            authenticator: self.authenticator.clone(),
            authorizer: self.authorizer.clone(),
            service: Rc::new(service),
        })
    }
}

pub struct UrlSecurityService<Auth, Autho, S> {
    authenticator: Option<Arc<Auth>>,
    authorizer: Option<Arc<Autho>>,
    service: Rc<S>,
}

impl<Auth, Autho, S, B> Service<ServiceRequest> for UrlSecurityService<Auth, Autho, S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    Auth: Authenticator,
    Autho: Authorizer<B>,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        let user = self
            .authenticator
            .as_ref()
            .and_then(|auth| auth.get_user(&req));

        if let Some(ref u) = user {
            req.extensions_mut().insert(u.clone());
        }

        let response: Self::Future = match &self.authorizer {
            Some(authorizer) => {
                let next = move |req: ServiceRequest| -> LocalBoxFuture<'static, Result<ServiceResponse<B>, Error>> {
                    Box::pin(service.call(req))
                };
                authorizer.process(req, user.as_ref(), next)
            }
            None => {
                let fut = service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
        };

        Box::pin(SecurityContext::run_with(user, response))
    }
}
