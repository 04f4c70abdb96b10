use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::relay::DEFAULT_MAX_BODY_BYTES;

pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev";
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    // None is a deployment defect: every request is answered with 503
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub base_url: String,
    pub anon_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    pub allow_origin: String,
    pub max_body_bytes: usize,
    pub gateway: GatewayConfig,
    pub auth: AuthConfig,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values are treated the same as unset ones.
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| anyhow!("{} must be set", key));

        let gateway = GatewayConfig {
            base_url: get("AI_GATEWAY_URL")
                .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key: get("AI_GATEWAY_API_KEY"),
            model: get("AI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: parse_or(get("MAX_TOKENS"), "MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            timeout: Duration::from_secs(parse_or(
                get("UPSTREAM_TIMEOUT_SECS"),
                "UPSTREAM_TIMEOUT_SECS",
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
            )?),
        };
        if gateway.max_tokens == 0 {
            return Err(anyhow!("MAX_TOKENS must be greater than zero"));
        }
        if gateway.timeout.is_zero() {
            return Err(anyhow!("UPSTREAM_TIMEOUT_SECS must be greater than zero"));
        }

        let auth = AuthConfig {
            base_url: require("AUTH_URL")?.trim_end_matches('/').to_string(),
            anon_key: require("AUTH_ANON_KEY")?,
            timeout: Duration::from_secs(parse_or(
                get("AUTH_TIMEOUT_SECS"),
                "AUTH_TIMEOUT_SECS",
                DEFAULT_AUTH_TIMEOUT_SECS,
            )?),
        };
        if auth.timeout.is_zero() {
            return Err(anyhow!("AUTH_TIMEOUT_SECS must be greater than zero"));
        }

        let max_body_bytes =
            parse_or(get("MAX_BODY_BYTES"), "MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?;
        if max_body_bytes == 0 {
            return Err(anyhow!("MAX_BODY_BYTES must be greater than zero"));
        }

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(get("PORT"), "PORT", 8080)?,
            allow_origin: get("CORS_ALLOW_ORIGIN").unwrap_or_else(|| "*".to_string()),
            max_body_bytes,
            gateway,
            auth,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}
