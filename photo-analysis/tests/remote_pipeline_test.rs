mod common;

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use photo_analysis::config::RemoteConfig;
use photo_analysis::error::PhotoError;
use photo_analysis::message::{IdSource, MessageFormat, PubSubMessage};
use photo_analysis::ocr::OcrProvider;
use photo_analysis::processing::{CasePolicy, PhotoPipeline, ProcessOutcome};
use photo_analysis::sink::RemoteEndpointSink;

use common::{base_config, ocr_config, start_vision, ANNOTATIONS, IMAGE_URI};

fn pipeline(vision_uri: String, host: String, fallback_token: Option<&str>) -> PhotoPipeline {
    let mut config = base_config();
    config.message.format = MessageFormat::Json;
    config.message.id_source = IdSource::Attribute;
    config.message.require_jwt = fallback_token.is_none();
    config.processing.case_policy = CasePolicy::Preserve;

    let sink = RemoteEndpointSink::new(&RemoteConfig {
        host: Some(host),
        token: fallback_token.map(String::from),
        timeout_secs: 5,
    })
    .unwrap();
    let ocr = OcrProvider::new(&ocr_config(vision_uri));
    PhotoPipeline::new(&config, Arc::new(ocr), Arc::new(sink))
}

fn structured_message(id: &str, jwt: Option<&str>) -> PubSubMessage {
    let payload = match jwt {
        Some(jwt) => json!({"image_uri": IMAGE_URI, "jwt": jwt}),
        None => json!({"image_uri": IMAGE_URI}),
    };
    PubSubMessage::from_payload(&payload.to_string()).with_attribute("id", id)
}

#[tokio::test]
async fn test_structured_message_is_put_to_remote_endpoint() {
    let vision = start_vision(ANNOTATIONS).await;
    let remote = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/wp-json/mt-wp-photo-analysis/v1/text/3001"))
        .and(header("Authorization", "Bearer 0123"))
        .and(body_json(json!({"textAnnotations": "some Text Message (e)"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&remote)
        .await;

    let outcome = pipeline(vision.uri(), remote.uri(), None)
        .process(&structured_message("3001", Some("0123")))
        .await
        .unwrap();

    assert_eq!(outcome, ProcessOutcome::Delivered { id: "3001".to_string() });
}

#[tokio::test]
async fn test_fallback_token_used_without_jwt() {
    let vision = start_vision(ANNOTATIONS).await;
    let remote = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/wp-json/mt-wp-photo-analysis/v1/text/42"))
        .and(header("Authorization", "Bearer configured"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&remote)
        .await;

    pipeline(vision.uri(), remote.uri(), Some("configured"))
        .process(&structured_message("42", None))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_remote_rejection_is_not_an_error() {
    let vision = start_vision(ANNOTATIONS).await;
    let remote = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .expect(1)
        .mount(&remote)
        .await;

    let result = pipeline(vision.uri(), remote.uri(), None)
        .process(&structured_message("3001", Some("0123")))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_missing_jwt_rejected_when_required() {
    let vision = MockServer::start().await;
    let remote = MockServer::start().await;

    let err = pipeline(vision.uri(), remote.uri(), None)
        .process(&structured_message("3001", None))
        .await
        .unwrap_err();

    assert!(matches!(err, PhotoError::InvalidMessage(msg) if msg == "missing jwt"));
}

#[tokio::test]
async fn test_no_text_sends_nothing() {
    let vision = start_vision(&[]).await;
    let remote = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&remote)
        .await;

    let outcome = pipeline(vision.uri(), remote.uri(), None)
        .process(&structured_message("3001", Some("0123")))
        .await
        .unwrap();

    assert_eq!(outcome, ProcessOutcome::NoText);
}
