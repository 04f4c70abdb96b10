use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::config::AuthConfig;

// Only used to gate access and to tag log lines.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthenticatedCaller {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("credential rejected: {0}")]
    Rejected(String),
    #[error("identity service unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<AuthenticatedCaller, AuthError>;
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

// Verifies access tokens against the hosted auth service's /auth/v1/user.
pub struct HostedAuthVerifier {
    url: String,
    anon_key: String,
    client: Client,
}

impl HostedAuthVerifier {
    pub fn new(config: &AuthConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            url: format!("{}/auth/v1/user", config.base_url),
            anon_key: config.anon_key.clone(),
            client: Client::builder().timeout(config.timeout).build()?,
        })
    }
}

#[async_trait]
impl IdentityVerifier for HostedAuthVerifier {
    async fn verify(&self, credential: &str) -> Result<AuthenticatedCaller, AuthError> {
        let response = self
            .client
            .get(&self.url)
            .bearer_auth(credential)
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<AuthenticatedCaller>()
                .await
                .map_err(|e| AuthError::Unavailable(format!("unreadable identity: {}", e))),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(AuthError::Rejected("token not accepted".to_string()))
            }
            status if status.is_server_error() => {
                let body = response.text().await.unwrap_or_default();
                debug!("Identity service error {}: {}", status, body);
                Err(AuthError::Unavailable(format!("status {}", status.as_u16())))
            }
            status => Err(AuthError::Rejected(format!("status {}", status.as_u16()))),
        }
    }
}
