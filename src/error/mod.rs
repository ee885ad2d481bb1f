// Error types for headshot-forge
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeadshotError {
    /// Missing input, missing mode selector, or an image outside the dimension gate.
    #[error("{0}")]
    Validation(String),

    /// Network failure, timeout or non-2xx status from the generation endpoint.
    #[error("Model transport error: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
        body: Option<Value>,
    },

    /// The reply was well-formed but carried no image anywhere.
    #[error("No image returned by model ({summary})")]
    Extraction {
        summary: String,
        prompt_feedback: Option<Value>,
    },

    /// The model handed back one of the inputs, even after the escalated retry.
    #[error("Generated image appears identical to one of the inputs after retry")]
    Echo,

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HeadshotError {
    /// Short machine-readable label, used in response bodies and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            HeadshotError::Validation(_) => "validation_error",
            HeadshotError::Transport { .. } => "transport_error",
            HeadshotError::Extraction { .. } => "extraction_error",
            HeadshotError::Echo => "echo_error",
            HeadshotError::Persistence(_) => "persistence_error",
            HeadshotError::NotFound(_) => "not_found",
            HeadshotError::Config(_) | HeadshotError::ConfigParsing(_) => "configuration_error",
            HeadshotError::Io(_) | HeadshotError::Json(_) | HeadshotError::Internal(_) => {
                "internal_error"
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            HeadshotError::Validation(_) => StatusCode::BAD_REQUEST,
            HeadshotError::NotFound(_) => StatusCode::NOT_FOUND,
            HeadshotError::Transport { .. }
            | HeadshotError::Extraction { .. }
            | HeadshotError::Echo
            | HeadshotError::Persistence(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Convert HeadshotError to HTTP responses for Axum
impl IntoResponse for HeadshotError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let mut body = json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });

        match &self {
            HeadshotError::Transport {
                status: upstream_status,
                body: upstream_body,
                ..
            } => {
                body["upstreamStatus"] = json!(upstream_status);
                if let Some(upstream_body) = upstream_body {
                    body["upstream"] = upstream_body.clone();
                }
            }
            HeadshotError::Extraction {
                summary,
                prompt_feedback,
            } => {
                body["rawSummary"] = json!(summary);
                if let Some(feedback) = prompt_feedback {
                    body["promptFeedback"] = feedback.clone();
                }
            }
            _ => {}
        }

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, HeadshotError>;
