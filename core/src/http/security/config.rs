//! Configuration traits for HTTP authentication and authorization.
//!
//! # Spring Equivalent
//! `AuthenticationProvider` and `FilterSecurityInterceptor`

use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::Error;
use futures_util::future::LocalBoxFuture;

use crate::http::security::user::User;

/// Extracts the user identity from an HTTP request.
///
/// # Spring Equivalent
/// `AuthenticationProvider`
///
/// Closures of type `Fn(&ServiceRequest) -> Option<User>` implement it.
pub trait Authenticator {
    fn get_user(&self, req: &ServiceRequest) -> Option<User>;
}

impl<F> Authenticator for F
where
    F: Fn(&ServiceRequest) -> Option<User>,
{
    fn get_user(&self, req: &ServiceRequest) -> Option<User> {
        self(req)
    }
}

/// Decides whether a request may reach the inner service.
///
/// The returned future resolves to:
/// - `EitherBody::left()` when the request was forwarded through `next`
/// - `EitherBody::right()` for a response produced by the authorizer
pub trait Authorizer<B> {
    fn process(
        &self,
        req: ServiceRequest,
        user: Option<&User>,
        next: impl FnOnce(ServiceRequest) -> LocalBoxFuture<'static, Result<ServiceResponse<B>, Error>>
            + 'static,
    ) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>>;
}
