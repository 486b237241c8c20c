//! Error types for the chat analyst service

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Result type alias for analyst operations
pub type Result<T> = std::result::Result<T, AnalystError>;

#[derive(Error, Debug)]
pub enum AnalystError {

    // =============================
    // Answer Pipeline Errors
    // =============================

    /// Retries exhausted and the last attempt was rejected by the LLM endpoint.
    #[error("Gemini API Error after {attempts} retries: {detail}")]
    Upstream { attempts: u32, detail: String },

    /// Retries exhausted and the last attempt never got a usable response.
    #[error("LLM Connection Error: {0}")]
    LlmConnection(String),

    /// A single LLM attempt came back with a non-success status.
    #[error("Gemini API returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    // =============================
    // Startup Errors
    // =============================

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AnalystError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalystError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AnalystError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}
