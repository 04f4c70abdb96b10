use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::prompts::Language;

pub const MAX_MESSAGE_CHARS: usize = 2000;
pub const MAX_HISTORY_ENTRIES: usize = 50;

// Fields stay untyped so a wrong type surfaces as the matching validation
// failure instead of a decode error.
#[derive(Debug, Default, Deserialize)]
pub struct RawChatRequest {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub language: Option<Value>,
    #[serde(default)]
    pub history: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub language: Language,
    pub history: Vec<Message>,
}

impl RawChatRequest {
    // Checks run in a fixed order so the first failure is deterministic
    pub fn validate(self) -> Result<ChatRequest, ValidationError> {
        let message = match self.message {
            Some(Value::String(s)) if !s.trim().is_empty() => s,
            _ => return Err(ValidationError::MessageRequired),
        };
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(ValidationError::MessageTooLong);
        }

        let language = match self.language {
            None | Some(Value::Null) => Language::default(),
            Some(Value::String(code)) => code
                .parse::<Language>()
                .map_err(|_| ValidationError::InvalidLanguage)?,
            Some(_) => return Err(ValidationError::InvalidLanguage),
        };

        let entries = match self.history {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(entries)) if entries.len() <= MAX_HISTORY_ENTRIES => entries,
            Some(_) => return Err(ValidationError::InvalidHistory),
        };
        let history = entries
            .into_iter()
            .map(Message::from_history_entry)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ChatRequest {
            message,
            language,
            history,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "system")]
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    // Callers may only replay user and assistant turns; the system slot
    // belongs to the relay.
    fn from_history_entry(entry: Value) -> Result<Self, ValidationError> {
        let role = match entry.get("role").and_then(Value::as_str) {
            Some("user") => Role::User,
            Some("assistant") => Role::Assistant,
            _ => return Err(ValidationError::InvalidHistoryFormat),
        };
        match entry.get("content").and_then(Value::as_str) {
            Some(content) if !content.is_empty() => Ok(Self {
                role,
                content: content.to_string(),
            }),
            _ => Err(ValidationError::InvalidHistoryFormat),
        }
    }
}
