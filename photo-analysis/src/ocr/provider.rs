use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::OcrConfig;
use crate::error::{PhotoError, Result};

use super::api::VisionApiClient;
use super::TextDetector;

#[derive(Clone)]
enum OcrBackend {
    Api { client: VisionApiClient },
    Unavailable { reason: String },
}

#[derive(Clone)]
pub struct OcrProvider {
    backend: OcrBackend,
}

impl OcrProvider {
    /// Never fails: a provider without credentials reports itself
    /// unavailable and rejects every request.
    pub fn new(config: &OcrConfig) -> Self {
        let backend = match VisionApiClient::new(config) {
            Ok(client) => {
                info!(base_url = %config.base_url, "Cloud Vision OCR backend initialized");
                OcrBackend::Api { client }
            }
            Err(e) => {
                let reason = format!("Cloud Vision OCR backend unavailable: {e}");
                warn!("{}", reason);
                OcrBackend::Unavailable { reason }
            }
        };

        Self { backend }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, OcrBackend::Unavailable { .. })
    }
}

#[async_trait]
impl TextDetector for OcrProvider {
    async fn detect_text(&self, image_uri: &str) -> Result<Vec<String>> {
        match &self.backend {
            OcrBackend::Api { client } => client.detect_text(image_uri).await,
            OcrBackend::Unavailable { reason } => Err(PhotoError::OcrUnavailable(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(api_key: Option<&str>) -> OcrConfig {
        OcrConfig {
            api_key: api_key.map(String::from),
            ..OcrConfig::default()
        }
    }

    #[test]
    fn test_without_credentials_falls_back_to_unavailable() {
        let provider = OcrProvider::new(&make_config(None));
        assert!(!provider.is_available());
    }

    #[test]
    fn test_with_api_key_is_available() {
        let provider = OcrProvider::new(&make_config(Some("test-key")));
        assert!(provider.is_available());
    }

    #[tokio::test]
    async fn test_unavailable_returns_error() {
        let provider = OcrProvider::new(&make_config(None));
        let result = provider.detect_text("gs://bucket/image.png").await;
        assert!(matches!(result, Err(PhotoError::OcrUnavailable(_))));
    }
}
