use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::message::PubSubMessage;
use crate::processing::ProcessOutcome;

use super::extractors::AppJson;
use super::AppState;

/// Pub/Sub push delivery envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushRequest {
    pub message: PubSubMessage,
    #[serde(default)]
    pub subscription: Option<String>,
}

/// `POST /` and `POST /pubsub/push`
///
/// Any 2xx acknowledges the message; errors are returned as-is so the push
/// subscription applies its own redelivery policy.
pub async fn push(
    State(state): State<AppState>,
    AppJson(request): AppJson<PushRequest>,
) -> Result<StatusCode> {
    info!(
        message_id = request.message.message_id.as_deref().unwrap_or("-"),
        subscription = request.subscription.as_deref().unwrap_or("-"),
        "Received push message"
    );

    match state.pipeline.process(&request.message).await? {
        ProcessOutcome::Delivered { id } => info!(id = %id, "Message processed"),
        ProcessOutcome::NoText => info!("Message processed, no text found"),
    }

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub sink: String,
    pub ocr: String,
}

/// `GET /health`
pub async fn health_check(State(state): State<AppState>) -> Json<HealthData> {
    let ocr = if state.ocr_available {
        "available"
    } else {
        "unavailable"
    };

    Json(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sink: state.pipeline.sink().kind().to_string(),
        ocr: ocr.to_string(),
    })
}
