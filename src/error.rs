use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::web::models::ErrorResponse;

// Display text is what the caller sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Message required")]
    MessageRequired,
    #[error("Message too long")]
    MessageTooLong,
    #[error("Invalid language")]
    InvalidLanguage,
    #[error("Invalid history")]
    InvalidHistory,
    #[error("Invalid history format")]
    InvalidHistoryFormat,
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("completion request timed out")]
    Timeout,
    #[error("completion request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("completion endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed completion response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Transport(err)
        }
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("configuration defect: {0}")]
    Configuration(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("request body exceeds {0} bytes")]
    PayloadTooLarge(usize),
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl RelayError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Auth(_) => "auth",
            Self::Configuration(_) => "configuration",
            Self::Validation(_) => "validation",
            Self::Upstream(_) => "upstream",
            Self::PayloadTooLarge(_) => "payload",
            Self::Unexpected(_) => "unexpected",
        }
    }

    // Only validation failures are specific; everything else is fixed text.
    pub fn public_message(&self) -> String {
        match self {
            Self::Auth(_) => "Authentication required".to_string(),
            Self::Configuration(_) => "Service unavailable".to_string(),
            Self::Validation(err) => err.to_string(),
            Self::PayloadTooLarge(_) => "Request too large".to_string(),
            Self::Upstream(_) | Self::Unexpected(_) => "Failed to process request".to_string(),
        }
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Upstream(_) | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.public_message(),
        })
    }
}
