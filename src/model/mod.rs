use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::GatewayConfig;
use crate::error::UpstreamError;
use crate::web::models::Message;

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, messages: &[Message], max_tokens: u32) -> Result<String, UpstreamError>;
}

// Client for an OpenAI-compatible chat completions gateway
pub struct GatewayModel {
    url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl GatewayModel {
    pub fn from_config(config: &GatewayConfig) -> Result<Option<Self>, reqwest::Error> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let url = format!("{}/v1/chat/completions", config.base_url);
        info!("Using completion gateway at: {} (model: {})", url, config.model);

        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Some(Self {
            url,
            api_key,
            model: config.model.clone(),
            client,
        }))
    }
}

#[async_trait]
impl CompletionProvider for GatewayModel {
    async fn complete(&self, messages: &[Message], max_tokens: u32) -> Result<String, UpstreamError> {
        let payload = json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": max_tokens,
        });
        debug!("Sending {} messages to gateway with max_tokens: {}", messages.len(), max_tokens);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| {
                if e.is_decode() {
                    UpstreamError::Malformed(e.to_string())
                } else {
                    e.into()
                }
            })?;

        let content = response_json
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .ok_or_else(|| UpstreamError::Malformed("no choices[0].message.content".to_string()))?;

        debug!("Completion length: {} characters", content.chars().count());
        Ok(content.to_string())
    }
}
