use std::sync::Arc;

use log::{error, info, warn};
use uuid::Uuid;

use crate::auth::{bearer_token, AuthError, AuthenticatedCaller, IdentityVerifier};
use crate::error::RelayError;
use crate::model::CompletionProvider;
use crate::prompts::PromptTable;
use crate::web::models::{ChatRequest, ChatResponse, Message, RawChatRequest};

pub const DEFAULT_MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

pub struct ChatRelay {
    verifier: Arc<dyn IdentityVerifier>,
    // None when the upstream secret was missing at startup
    provider: Option<Arc<dyn CompletionProvider>>,
    prompts: PromptTable,
    max_tokens: u32,
    max_body_bytes: usize,
}

// A caller that passed authentication on a relay able to serve it.
pub struct AdmittedTurn {
    pub request_id: Uuid,
    pub caller: AuthenticatedCaller,
    provider: Arc<dyn CompletionProvider>,
}

impl ChatRelay {
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        provider: Option<Arc<dyn CompletionProvider>>,
        prompts: PromptTable,
        max_tokens: u32,
    ) -> Self {
        Self {
            verifier,
            provider,
            prompts,
            max_tokens,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_body_limit(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    // Auth and configuration stages; the body has not been read yet.
    pub async fn admit(&self, authorization: Option<&str>) -> Result<AdmittedTurn, RelayError> {
        let request_id = Uuid::new_v4();

        let token = authorization
            .and_then(bearer_token)
            .ok_or_else(|| RelayError::Auth("missing bearer credential".to_string()))?;
        let caller = self.verifier.verify(token).await.map_err(|e| match e {
            AuthError::Rejected(reason) => RelayError::Auth(reason),
            AuthError::Unavailable(reason) => {
                error!("[{}] Identity verification unavailable: {}", request_id, reason);
                RelayError::Unexpected(reason)
            }
        })?;

        let Some(provider) = self.provider.clone() else {
            error!("[{}] Completion gateway API key is not configured", request_id);
            return Err(RelayError::Configuration(
                "completion gateway API key is not configured".to_string(),
            ));
        };

        Ok(AdmittedTurn {
            request_id,
            caller,
            provider,
        })
    }

    pub async fn respond(&self, turn: AdmittedTurn, body: &[u8]) -> Result<ChatResponse, RelayError> {
        let request_id = turn.request_id;

        let raw: RawChatRequest = serde_json::from_slice(body).map_err(|e| {
            warn!("[{}] Unreadable chat body: {}", request_id, e);
            RelayError::Unexpected(format!("unreadable body: {}", e))
        })?;
        let request = raw.validate()?;

        info!(
            "[{}] Chat request from {} (language: {}, history: {}, message chars: {})",
            request_id,
            turn.caller.id,
            request.language,
            request.history.len(),
            request.message.chars().count()
        );

        let messages = build_messages(&self.prompts, request);
        let response = turn
            .provider
            .complete(&messages, self.max_tokens)
            .await
            .map_err(|e| {
                error!("[{}] Upstream completion failed: {}", request_id, e);
                RelayError::from(e)
            })?;

        info!("[{}] Completion returned {} characters", request_id, response.chars().count());
        Ok(ChatResponse { response })
    }

    pub async fn handle(
        &self,
        authorization: Option<&str>,
        body: &[u8],
    ) -> Result<ChatResponse, RelayError> {
        let turn = self.admit(authorization).await?;
        if body.len() > self.max_body_bytes {
            return Err(RelayError::PayloadTooLarge(self.max_body_bytes));
        }
        self.respond(turn, body).await
    }
}

// [system] + history + [user], history kept in caller order
pub fn build_messages(prompts: &PromptTable, request: ChatRequest) -> Vec<Message> {
    let mut messages = Vec::with_capacity(request.history.len() + 2);
    messages.push(Message::system(prompts.get(request.language)));
    messages.extend(request.history);
    messages.push(Message::user(request.message));
    messages
}
