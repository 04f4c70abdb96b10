#![allow(dead_code, unused_macros)]

pub mod mock_upstream;

use std::sync::{Arc, Mutex};

use actix_web::web::Data;
use async_trait::async_trait;

use fra_chat_relay::auth::{AuthError, AuthenticatedCaller, IdentityVerifier};
use fra_chat_relay::error::UpstreamError;
use fra_chat_relay::model::CompletionProvider;
use fra_chat_relay::prompts::PromptTable;
use fra_chat_relay::relay::ChatRelay;
use fra_chat_relay::web::models::Message;

pub const VALID_TOKEN: &str = "valid-token";

/// Accepts exactly one token.
pub struct StaticVerifier;

#[async_trait]
impl IdentityVerifier for StaticVerifier {
    async fn verify(&self, credential: &str) -> Result<AuthenticatedCaller, AuthError> {
        if credential == VALID_TOKEN {
            Ok(AuthenticatedCaller {
                id: "user-1".to_string(),
                email: Some("ranger@example.org".to_string()),
            })
        } else {
            Err(AuthError::Rejected("unknown token".to_string()))
        }
    }
}

/// Always fails as if the identity service were down.
pub struct UnreachableVerifier;

#[async_trait]
impl IdentityVerifier for UnreachableVerifier {
    async fn verify(&self, _credential: &str) -> Result<AuthenticatedCaller, AuthError> {
        Err(AuthError::Unavailable("connection refused".to_string()))
    }
}

pub enum Reply {
    Text(String),
    Status(u16, String),
}

/// Records every conversation it is asked to complete.
pub struct RecordingProvider {
    reply: Reply,
    calls: Mutex<Vec<(Vec<Message>, u32)>>,
}

impl RecordingProvider {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Text(text.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Status(status, body.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<(Vec<Message>, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for RecordingProvider {
    async fn complete(&self, messages: &[Message], max_tokens: u32) -> Result<String, UpstreamError> {
        self.calls.lock().unwrap().push((messages.to_vec(), max_tokens));
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Status(status, body) => Err(UpstreamError::Status {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

pub fn relay(
    verifier: Arc<dyn IdentityVerifier>,
    provider: Option<Arc<dyn CompletionProvider>>,
) -> Data<ChatRelay> {
    Data::new(ChatRelay::new(verifier, provider, PromptTable::default(), 500))
}

pub fn relay_with_limit(
    verifier: Arc<dyn IdentityVerifier>,
    provider: Option<Arc<dyn CompletionProvider>>,
    max_body_bytes: usize,
) -> Data<ChatRelay> {
    Data::new(
        ChatRelay::new(verifier, provider, PromptTable::default(), 500)
            .with_body_limit(max_body_bytes),
    )
}

/// Builds the service the same way `main` wires the `App`.
macro_rules! init_app {
    ($relay:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(fra_chat_relay::web::routes::cors_headers("*"))
                .app_data($relay)
                .configure(fra_chat_relay::web::routes::configure),
        )
        .await
    };
}
