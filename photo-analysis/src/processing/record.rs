use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ProcessingConfig;
use crate::error::Result;
use crate::message::DecodedMessage;

use super::identifier::photo_id;
use super::normalize::{normalize_texts, CasePolicy};

/// The text extracted from one photo, ready for a sink.
///
/// `id` is the storage key and is not part of the serialized document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoRecord {
    #[serde(skip)]
    pub id: String,
    pub uri: String,
    pub texts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_texts: Option<String>,
    pub updated: DateTime<Utc>,
}

impl PhotoRecord {
    /// The document body persisted by the document store.
    pub fn to_document(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Fragments joined by single spaces, as sent to the remote endpoint.
    pub fn joined_texts(&self) -> String {
        self.texts.join(" ")
    }
}

#[derive(Debug, Clone)]
pub struct RecordAssembler {
    case_policy: CasePolicy,
    forward_raw_text: bool,
}

impl RecordAssembler {
    pub fn new(config: &ProcessingConfig) -> Self {
        Self {
            case_policy: config.case_policy,
            forward_raw_text: config.forward_raw_text,
        }
    }

    pub fn case_policy(&self) -> CasePolicy {
        self.case_policy
    }

    /// Returns `None` when OCR found no text at all.
    ///
    /// `annotations[0]` is the whole-image transcript; the remaining entries
    /// are normalized into `texts`.
    pub fn assemble(
        &self,
        message: &DecodedMessage,
        annotations: &[String],
        now: DateTime<Utc>,
    ) -> Option<PhotoRecord> {
        let (transcript, fragments) = annotations.split_first()?;

        let id = message
            .image_id
            .clone()
            .unwrap_or_else(|| photo_id(&message.image_uri));

        Some(PhotoRecord {
            id,
            uri: message.image_uri.clone(),
            texts: normalize_texts(fragments, self.case_policy),
            raw_texts: self.forward_raw_text.then(|| transcript.clone()),
            updated: now,
        })
    }
}
