//! Actix Messaging Security Demo Application
//!
//! A chat endpoint secured like a Spring `AbstractSecurityWebSocketMessageBrokerConfigurer`.

use std::io;
use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer};

use actix_messaging_security_core::http::security::{
    CsrfConfig, CsrfProtection, ExpressionUrlAuthorizer, UrlSecurityTransform,
    WebSocketMessageBrokerSecurity,
};
use actix_messaging_security_test::chat::{ChatSecurity, ChatState};
use actix_messaging_security_test::{configure_routes, header_authenticator, url_rules};

fn print_startup_info() {
    println!("=== Actix Messaging Security Demo ===");
    println!();
    println!("Server: http://127.0.0.1:8080");
    println!();
    println!("Users (X-User header):");
    println!("  admin - Roles: [ADMIN, USER]");
    println!("  user  - Roles: [USER]");
    println!("  guest - Roles: []");
    println!();
    println!("Routes:");
    println!("  GET /csrf            - CSRF token of the session");
    println!("  GET /admin/dashboard - ADMIN role");
    println!("  GET /ws              - WebSocket endpoint (authenticated)");
    println!("  GET /sockjs/**       - SockJS endpoint (authenticated)");
    println!();
    println!("Frames (JSON text messages):");
    println!("  {{\"type\":\"CONNECT\",\"headers\":{{\"X-CSRF-TOKEN\":\"<token>\"}}}}");
    println!("  {{\"type\":\"MESSAGE\",\"destination\":\"/app/chat\",\"body\":\"hi\"}}");
    println!("  {{\"type\":\"SUBSCRIBE\",\"destination\":\"/topic/rooms\"}}");
    println!();
}

fn startup_error(e: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    print_startup_info();

    let security = WebSocketMessageBrokerSecurity::new(ChatSecurity::default());
    let state = Arc::new(ChatState::build(&security).map_err(startup_error)?);
    let authorizer = Arc::new(ExpressionUrlAuthorizer::from_map(&url_rules()).map_err(startup_error)?);
    let key = Key::generate();

    HttpServer::new(move || {
        App::new()
            .wrap(
                UrlSecurityTransform::new()
                    .authenticator(header_authenticator)
                    .shared_authorizer(Arc::clone(&authorizer)),
            )
            .wrap(CsrfProtection::new(CsrfConfig::default()))
            .wrap(SessionMiddleware::new(CookieSessionStore::default(), key.clone()))
            .configure(configure_routes(Arc::clone(&state)))
    })
    .bind("127.0.0.1:8080")?
    .run()
    .await
}
