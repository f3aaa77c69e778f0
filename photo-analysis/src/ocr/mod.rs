//! OCR (Optical Character Recognition) Module
//!
//! Text detection is delegated to an external service that receives the image
//! by URI; the image bytes never pass through this process.
//!
//! - `TextDetector` is the capability the pipeline depends on
//! - `OcrProvider` implements it on top of the Cloud Vision REST API
//!
//! # Configuration
//!
//! See `OcrConfig` in `config.rs`:
//! - `base_url`: Vision endpoint, overridable for proxies and tests
//! - `api_key` / `access_token`: either one enables the provider
//! - `timeout_secs`: request timeout

mod api;
mod provider;

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;

pub use api::VisionApiClient;
pub use provider::OcrProvider;

/// Detects text in a remote image.
///
/// Implementations return annotations in service order: the whole-image
/// transcript first, then individual fragments. An empty list means no text.
#[async_trait]
pub trait TextDetector: Send + Sync {
    async fn detect_text(&self, image_uri: &str) -> Result<Vec<String>>;
}

/// Runs `detector` once on `image_uri`. Errors are returned unchanged.
pub async fn extract_texts(detector: &dyn TextDetector, image_uri: &str) -> Result<Vec<String>> {
    info!("Looking for text in image {}", image_uri);
    let annotations = detector.detect_text(image_uri).await?;

    let transcript_len = annotations
        .first()
        .map(|text| text.chars().count())
        .unwrap_or(0);
    info!(
        annotations = annotations.len(),
        "Extracted text from image {} ({} chars)", image_uri, transcript_len
    );

    Ok(annotations)
}
