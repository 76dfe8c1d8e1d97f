//! Admin routes, protected by the URL rules (`/admin/**` requires ADMIN).

use actix_web::{get, HttpResponse, Responder};

use actix_messaging_security_core::http::security::SecurityContext;

#[get("/admin/dashboard")]
pub async fn dashboard() -> impl Responder {
    let username = SecurityContext::get_username().unwrap_or_default();
    HttpResponse::Ok().body(format!("Welcome to the admin dashboard, {}!", username))
}
