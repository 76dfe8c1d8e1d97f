//! Chat demo wiring shared by the demo binary and the integration tests.

pub mod chat;
pub mod handlers;

use std::sync::Arc;

use actix_web::dev::ServiceRequest;
use actix_web::web;

use actix_messaging_security_core::http::security::access::{
    RequestKey, SecurityConfig, SecurityMetadataMap,
};
use actix_messaging_security_core::http::security::User;

/// Demo users, selected by the `X-User` header.
///
/// - admin: ADMIN, USER roles
/// - user: USER role
/// - guest: no roles
pub fn demo_user(name: &str) -> Option<User> {
    match name {
        "admin" => Some(User::new("admin").roles(&["ADMIN", "USER"])),
        "user" => Some(User::new("user").roles(&["USER"])),
        "guest" => Some(User::new("guest")),
        _ => None,
    }
}

pub fn header_authenticator(req: &ServiceRequest) -> Option<User> {
    let name = req.headers().get("x-user")?.to_str().ok()?;
    demo_user(name)
}

/// URL rules of the demo application, first match wins.
pub fn url_rules() -> SecurityMetadataMap<RequestKey> {
    SecurityMetadataMap::new()
        .with(
            RequestKey::ant("/admin/**"),
            SecurityConfig::create_list(&["hasRole('ADMIN')"]),
        )
        .with(
            RequestKey::ant("/ws"),
            SecurityConfig::create_list(&["isAuthenticated()"]),
        )
        .with(
            RequestKey::ant("/sockjs/**"),
            SecurityConfig::create_list(&["isAuthenticated()"]),
        )
        .with(
            RequestKey::ant("/**"),
            SecurityConfig::create_list(&["permitAll()"]),
        )
}

/// Registers the demo routes.
pub fn configure_routes(state: Arc<chat::ChatState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::from(state))
            .service(handlers::csrf::csrf_token)
            .service(handlers::admin::dashboard)
            .route("/ws", web::get().to(handlers::stomp::connect))
            .route("/sockjs/{tail:.*}", web::get().to(handlers::stomp::connect));
    }
}
