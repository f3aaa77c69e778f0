use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::message::{MessageDecoder, PubSubMessage};
use crate::ocr::{extract_texts, TextDetector};
use crate::sink::ResultSink;

use super::record::RecordAssembler;

/// What a single invocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// A record was assembled and handed to the sink.
    Delivered { id: String },
    /// OCR found no text; nothing was written.
    NoText,
}

/// Decode, detect, normalize, assemble and deliver one message.
///
/// Holds no per-message state, so one instance serves any number of
/// invocations.
#[derive(Clone)]
pub struct PhotoPipeline {
    decoder: MessageDecoder,
    assembler: RecordAssembler,
    detector: Arc<dyn TextDetector>,
    sink: Arc<dyn ResultSink>,
}

impl PhotoPipeline {
    pub fn new(
        config: &Config,
        detector: Arc<dyn TextDetector>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            decoder: MessageDecoder::new(&config.message),
            assembler: RecordAssembler::new(&config.processing),
            detector,
            sink,
        }
    }

    pub fn sink(&self) -> &dyn ResultSink {
        self.sink.as_ref()
    }

    pub async fn process(&self, message: &PubSubMessage) -> Result<ProcessOutcome> {
        self.process_at(message, Utc::now()).await
    }

    /// Like [`process`](Self::process) with `now` as the record's `updated` time.
    pub async fn process_at(
        &self,
        message: &PubSubMessage,
        now: DateTime<Utc>,
    ) -> Result<ProcessOutcome> {
        let decoded = self.decoder.decode(message)?;

        let annotations = extract_texts(self.detector.as_ref(), &decoded.image_uri).await?;

        let Some(record) = self.assembler.assemble(&decoded, &annotations, now) else {
            info!("No text found in image {}", decoded.image_uri);
            return Ok(ProcessOutcome::NoText);
        };

        info!(
            id = %record.id,
            sink = %self.sink.kind(),
            case_policy = %self.assembler.case_policy(),
            "Delivering photo texts"
        );
        self.sink
            .write(&record, decoded.credential.as_deref())
            .await?;

        Ok(ProcessOutcome::Delivered { id: record.id })
    }
}
