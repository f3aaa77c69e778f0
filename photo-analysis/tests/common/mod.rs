#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use photo_analysis::config::{Config, OcrConfig};

pub const IMAGE_URI: &str = "https://example.org/some/path/to/a/image.jpeg";

/// Annotations as returned for the reference photo, transcript first.
pub const ANNOTATIONS: &[&str] = &["some Text Message ö (e)", "some", "Text", "Message", "ö", "(e)"];

pub fn vision_body(texts: &[&str]) -> Value {
    let annotations: Vec<Value> = texts.iter().map(|t| json!({"description": t})).collect();
    if annotations.is_empty() {
        json!({"responses": [{}]})
    } else {
        json!({"responses": [{"textAnnotations": annotations}]})
    }
}

/// Starts a Vision API double answering every annotate call with `texts`.
pub async fn start_vision(texts: &[&str]) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images:annotate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vision_body(texts)))
        .expect(1)
        .mount(&server)
        .await;
    server
}

pub fn ocr_config(base_url: String) -> OcrConfig {
    OcrConfig {
        base_url,
        api_key: Some("test-key".to_string()),
        access_token: None,
        timeout_secs: 5,
    }
}

/// Env-independent starting point for tests; callers adjust what they need.
pub fn base_config() -> Config {
    let mut config = Config::default();
    config.message = Default::default();
    config.sink.collection = "photos".to_string();
    config.sink.remote = Default::default();
    config.processing.forward_raw_text = false;
    config
}
