use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use crate::config::RemoteConfig;
use crate::error::{PhotoError, Result};
use crate::processing::PhotoRecord;

use super::{CredentialResolver, ResultSink, SinkKind};

const REMOTE_TEXT_SEGMENTS: [&str; 4] = ["wp-json", "mt-wp-photo-analysis", "v1", "text"];

#[derive(Debug, Serialize)]
struct TextUpdate<'a> {
    #[serde(rename = "textAnnotations")]
    text_annotations: &'a str,
}

/// Best-effort delivery to the photo analysis REST endpoint.
///
/// A response other than 200 is logged and swallowed; only transport
/// failures and a missing credential are reported as errors.
#[derive(Clone, Debug)]
pub struct RemoteEndpointSink {
    client: Client,
    host: Url,
    credentials: CredentialResolver,
}

impl RemoteEndpointSink {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let host = config
            .host
            .as_deref()
            .ok_or_else(|| PhotoError::Config("REMOTE_HOST is required for the remote sink".to_string()))?;
        let host = Url::parse(host)?;
        if host.cannot_be_a_base() {
            return Err(PhotoError::Config(format!(
                "REMOTE_HOST must be an http(s) base URL, got {host}"
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PhotoError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            host,
            credentials: CredentialResolver::new(config.token.clone()),
        })
    }

    /// The text endpoint for `id`. The id always occupies exactly one path
    /// segment; `/`, `?`, `#` and `%` in it are percent-encoded.
    pub fn endpoint(&self, id: &str) -> Result<Url> {
        if id.is_empty() || id == "." || id == ".." {
            return Err(PhotoError::Sink(format!("Invalid photo id '{id}' for remote endpoint")));
        }

        let mut url = self.host.clone();
        url.path_segments_mut()
            .map_err(|_| PhotoError::Config(format!("REMOTE_HOST {} cannot be a base URL", self.host)))?
            .pop_if_empty()
            .extend(REMOTE_TEXT_SEGMENTS)
            .push(id);
        Ok(url)
    }
}

#[async_trait]
impl ResultSink for RemoteEndpointSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Remote
    }

    async fn write(&self, record: &PhotoRecord, credential: Option<&str>) -> Result<()> {
        let token = self.credentials.resolve(credential).ok_or_else(|| {
            PhotoError::Sink(format!("No bearer token available for photo {}", record.id))
        })?;

        let joined = record.joined_texts();
        let url = self.endpoint(&record.id)?;

        let response = self
            .client
            .put(url.clone())
            .header("Authorization", format!("Bearer {token}"))
            .json(&TextUpdate {
                text_annotations: &joined,
            })
            .send()
            .await
            .map_err(|e| PhotoError::Sink(format!("PUT {url} failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = %status,
                id = %record.id,
                "Remote endpoint rejected text update: {}",
                body
            );
            return Ok(());
        }

        info!(id = %record.id, texts = record.texts.len(), "Sent photo texts to remote endpoint");
        Ok(())
    }
}
