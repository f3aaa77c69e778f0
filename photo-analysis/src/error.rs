use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),

    #[error("Sink write failed: {0}")]
    Sink(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PhotoError {
    pub fn invalid_message(detail: impl Into<String>) -> Self {
        PhotoError::InvalidMessage(detail.into())
    }

    /// Whether the error stems from the OCR capability rather than the
    /// message or the sink.
    pub fn is_extraction_failure(&self) -> bool {
        matches!(
            self,
            PhotoError::Extraction(_) | PhotoError::OcrUnavailable(_)
        )
    }
}

impl IntoResponse for PhotoError {
    fn into_response(self) -> Response {
        let status = match &self {
            PhotoError::InvalidMessage(_) => StatusCode::BAD_REQUEST,
            PhotoError::Extraction(_) => StatusCode::BAD_GATEWAY,
            PhotoError::OcrUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            PhotoError::Http(_) => StatusCode::BAD_GATEWAY,
            PhotoError::Sink(_)
            | PhotoError::Config(_)
            | PhotoError::Database(_)
            | PhotoError::Json(_)
            | PhotoError::UrlParse(_)
            | PhotoError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, PhotoError>;
