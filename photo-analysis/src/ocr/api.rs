use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::OcrConfig;
use crate::error::{PhotoError, Result};

/// Client for the Cloud Vision `images:annotate` REST method.
#[derive(Clone, Debug)]
pub struct VisionApiClient {
    client: Client,
    api_key: Option<String>,
    access_token: Option<String>,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct AnnotateRequest<'a> {
    requests: Vec<AnnotateImageRequest<'a>>,
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest<'a> {
    image: Image<'a>,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct Image<'a> {
    source: ImageSource<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageSource<'a> {
    image_uri: &'a str,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<EntityAnnotation>,
    error: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

impl VisionApiClient {
    pub fn new(config: &OcrConfig) -> Result<Self> {
        if config.api_key.is_none() && config.access_token.is_none() {
            return Err(PhotoError::OcrUnavailable(
                "API key or access token required for Cloud Vision".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PhotoError::Extraction(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            access_token: config.access_token.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Runs text detection on the image at `image_uri`.
    ///
    /// Returns every annotation description in the order the service reports
    /// them; the first one is the whole-image transcript. A single attempt is
    /// made.
    pub async fn detect_text(&self, image_uri: &str) -> Result<Vec<String>> {
        let request = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: Image {
                    source: ImageSource { image_uri },
                },
                features: vec![Feature {
                    kind: "TEXT_DETECTION",
                }],
            }],
        };

        let url = format!("{}/images:annotate", self.base_url);
        debug!("Sending text detection request to {}", url);

        let mut builder = self.client.post(&url).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.query(&[("key", api_key)]);
        }
        if let Some(token) = &self.access_token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                PhotoError::Extraction("Request timeout".to_string())
            } else {
                PhotoError::Extraction(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PhotoError::Extraction(format!(
                "API request failed: {status} - {body}"
            )));
        }

        let parsed: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| PhotoError::Extraction(format!("Failed to parse response: {e}")))?;

        let Some(first) = parsed.responses.into_iter().next() else {
            return Ok(Vec::new());
        };

        if let Some(error) = first.error {
            return Err(PhotoError::Extraction(format!(
                "Image annotation failed ({}): {}",
                error.code, error.message
            )));
        }

        Ok(first
            .text_annotations
            .into_iter()
            .map(|annotation| annotation.description)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    const URI: &str = "http://example.org/some/image.jpeg";

    fn test_config(base_url: String) -> OcrConfig {
        OcrConfig {
            base_url,
            api_key: Some("test-key".to_string()),
            access_token: None,
            timeout_secs: 10,
        }
    }

    #[test]
    fn test_client_requires_credentials() {
        let mut config = test_config("http://localhost".to_string());
        config.api_key = None;
        let result = VisionApiClient::new(&config);
        assert!(matches!(result, Err(PhotoError::OcrUnavailable(_))));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = VisionApiClient::new(&test_config("https://vision.test/v1/".to_string())).unwrap();
        assert_eq!(client.base_url, "https://vision.test/v1");
    }

    #[tokio::test]
    async fn test_detect_text_keeps_order() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/images:annotate"))
            .and(query_param("key", "test-key"))
            .and(body_json(json!({
                "requests": [{
                    "image": {"source": {"imageUri": URI}},
                    "features": [{"type": "TEXT_DETECTION"}]
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "responses": [{
                    "textAnnotations": [
                        {"locale": "en", "description": "some\ntext\nö (e)"},
                        {"description": "some\ntext\nö"},
                        {"description": "(e)"}
                    ]
                }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = VisionApiClient::new(&test_config(mock_server.uri())).unwrap();
        let texts = client.detect_text(URI).await.unwrap();
        assert_eq!(texts, vec!["some\ntext\nö (e)", "some\ntext\nö", "(e)"]);
    }

    #[tokio::test]
    async fn test_empty_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/images:annotate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"responses": [{}]})))
            .mount(&mock_server)
            .await;

        let client = VisionApiClient::new(&test_config(mock_server.uri())).unwrap();
        assert!(client.detect_text(URI).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_access_token_sent_as_bearer() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/images:annotate"))
            .and(header("Authorization", "Bearer ya29.token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"responses": []})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut config = test_config(mock_server.uri());
        config.api_key = None;
        config.access_token = Some("ya29.token".to_string());

        let client = VisionApiClient::new(&config).unwrap();
        assert!(client.detect_text(URI).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_per_image_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/images:annotate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "responses": [{
                    "error": {"code": 7, "message": "We can not access the URL currently."}
                }]
            })))
            .mount(&mock_server)
            .await;

        let client = VisionApiClient::new(&test_config(mock_server.uri())).unwrap();
        let err = client.detect_text(URI).await.unwrap_err();
        assert!(matches!(err, PhotoError::Extraction(_)));
        assert!(err.to_string().contains("can not access"));
    }

    #[tokio::test]
    async fn test_http_error_is_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/images:annotate"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = VisionApiClient::new(&test_config(mock_server.uri())).unwrap();
        let err = client.detect_text(URI).await.unwrap_err();
        assert!(matches!(err, PhotoError::Extraction(_)));
        assert!(err.to_string().contains("503"));
    }
}
