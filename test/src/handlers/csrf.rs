//! Exposes the session CSRF token to browser clients.

use actix_web::{get, HttpMessage, HttpRequest, HttpResponse, Responder};
use serde::Serialize;

use actix_messaging_security_core::http::security::CsrfToken;

#[derive(Debug, Serialize)]
pub struct CsrfTokenResponse {
    pub token: String,
    pub header_name: String,
    pub parameter_name: String,
}

/// The client sends `token` in the `header_name` native header of its
/// CONNECT frame.
#[get("/csrf")]
pub async fn csrf_token(req: HttpRequest) -> impl Responder {
    match req.extensions().get::<CsrfToken>() {
        Some(token) => HttpResponse::Ok().json(CsrfTokenResponse {
            token: token.value().to_string(),
            header_name: token.header_name().to_string(),
            parameter_name: token.parameter_name().to_string(),
        }),
        None => HttpResponse::InternalServerError().body("CSRF protection is not installed"),
    }
}
