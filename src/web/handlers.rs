use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use futures_util::StreamExt;
use log::warn;
use serde_json::json;

use crate::error::RelayError;
use crate::relay::ChatRelay;

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

// CORS preflight; the allow headers come from the app-wide defaults.
pub async fn preflight() -> impl Responder {
    HttpResponse::Ok().finish()
}

// Chat API endpoint. The payload is only drained once the caller is admitted.
pub async fn chat(
    relay: web::Data<ChatRelay>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, RelayError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let turn = relay.admit(authorization).await?;
    let body = read_body(payload, relay.max_body_bytes()).await?;
    let response = relay.respond(turn, &body).await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn read_body(mut payload: web::Payload, limit: usize) -> Result<web::BytesMut, RelayError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| {
            warn!("Failed to read chat body: {}", e);
            RelayError::Unexpected(format!("payload error: {}", e))
        })?;
        if body.len() + chunk.len() > limit {
            return Err(RelayError::PayloadTooLarge(limit));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}
