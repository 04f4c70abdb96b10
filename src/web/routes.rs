use actix_web::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use actix_web::middleware::DefaultHeaders;
use actix_web::web;

use crate::web::handlers;

pub const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
pub const ALLOWED_METHODS: &str = "POST, OPTIONS";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api").service(
            web::resource("/chat")
                .route(web::post().to(handlers::chat))
                .route(web::method(actix_web::http::Method::OPTIONS).to(handlers::preflight)),
        ),
    )
    .route("/health", web::get().to(handlers::health_check));
}

pub fn cors_headers(allow_origin: &str) -> DefaultHeaders {
    DefaultHeaders::new()
        .add((ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin.to_string()))
        .add((ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS))
        .add((ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS))
}
