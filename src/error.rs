// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid request body: {0}")]
    MalformedBody(String),

    #[error("messages must contain at least one entry")]
    EmptyConversation,

    #[error("message {index} has empty content")]
    EmptyContent { index: usize },
}

/// Failures talking to the upstream provider. Never shown to the caller.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("upstream returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed upstream body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("upstream returned no assistant content")]
    EmptyReply,
}

impl RelayError {
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Status(_) => "upstream_status",
            RelayError::Transport(_) => "transport",
            RelayError::Decode(_) => "decode",
            RelayError::EmptyReply => "empty_reply",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name} value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Errors the caller is allowed to see.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("OpenRouter API key not configured")]
    NotConfigured,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotConfigured => "not_configured",
            AppError::Validation(_) => "validation",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
