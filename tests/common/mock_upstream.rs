use std::sync::Mutex;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::{json, Value};

pub const MOCK_ANON_KEY: &str = "anon-key";
pub const GOOD_USER_TOKEN: &str = "user-jwt";
pub const BROKEN_USER_TOKEN: &str = "explode";
pub const SLOW_USER_TOKEN: &str = "stall";
pub const GARBLED_USER_TOKEN: &str = "garbled";

/// How the fake completion endpoint answers.
#[derive(Clone)]
pub enum GatewayBehavior {
    Reply(String),
    Status(u16, String),
    Body(String),
    Delay(Duration, String),
}

pub struct MockState {
    behavior: GatewayBehavior,
    requests: Mutex<Vec<RecordedRequest>>,
}

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub body: Value,
}

/// A stand-in for both the completion gateway and the hosted auth service.
pub struct MockUpstream {
    pub url: String,
    state: web::Data<MockState>,
    handle: ServerHandle,
}

impl MockUpstream {
    pub async fn start(behavior: GatewayBehavior) -> Self {
        let state = web::Data::new(MockState {
            behavior,
            requests: Mutex::new(Vec::new()),
        });
        let data = state.clone();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route("/v1/chat/completions", web::post().to(chat_completions_handler))
                .route("/auth/v1/user", web::get().to(auth_user_handler))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind mock upstream");

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            url: format!("http://{}", addr),
            state,
            handle,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

fn header(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn completion(text: &str) -> Value {
    json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }]
    })
}

async fn chat_completions_handler(
    req: HttpRequest,
    body: web::Json<Value>,
    state: web::Data<MockState>,
) -> HttpResponse {
    state.requests.lock().unwrap().push(RecordedRequest {
        authorization: header(&req, "authorization"),
        body: body.into_inner(),
    });

    match &state.behavior {
        GatewayBehavior::Reply(text) => HttpResponse::Ok().json(completion(text)),
        GatewayBehavior::Status(status, body) => {
            HttpResponse::build(actix_web::http::StatusCode::from_u16(*status).unwrap())
                .body(body.clone())
        }
        GatewayBehavior::Body(raw) => HttpResponse::Ok()
            .content_type("application/json")
            .body(raw.clone()),
        GatewayBehavior::Delay(delay, text) => {
            tokio::time::sleep(*delay).await;
            HttpResponse::Ok().json(completion(text))
        }
    }
}

async fn auth_user_handler(req: HttpRequest) -> HttpResponse {
    if header(&req, "apikey").as_deref() != Some(MOCK_ANON_KEY) {
        return HttpResponse::Unauthorized().json(json!({ "msg": "invalid api key" }));
    }
    match header(&req, "authorization").as_deref() {
        Some(value) if value == format!("Bearer {}", GOOD_USER_TOKEN) => {
            HttpResponse::Ok().json(json!({
                "id": "8d0fd2b3-1c1f-4b0c-9a55-0d6c3c1a2b7e",
                "email": "ranger@example.org",
                "aud": "authenticated"
            }))
        }
        Some(value) if value == format!("Bearer {}", BROKEN_USER_TOKEN) => {
            HttpResponse::InternalServerError().body("database is down")
        }
        Some(value) if value == format!("Bearer {}", SLOW_USER_TOKEN) => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            HttpResponse::Ok().json(json!({ "id": "too-late" }))
        }
        Some(value) if value == format!("Bearer {}", GARBLED_USER_TOKEN) => HttpResponse::Ok()
            .content_type("application/json")
            .body("<html>gateway login page</html>"),
        _ => HttpResponse::Unauthorized().json(json!({ "msg": "invalid JWT" })),
    }
}
