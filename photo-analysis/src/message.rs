//! Inbound Pub/Sub message decoding.
//!
//! A message carries a base64 `data` payload and optional string
//! `attributes`. Depending on the deployment the payload is either the image
//! URI itself or a JSON object `{"image_uri": ..., "jwt": ...}`; which shape is
//! accepted is fixed by [`MessageFormat`], never inferred loosely.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::config::MessageConfig;
use crate::error::{PhotoError, Result};

/// The Pub/Sub message as delivered to the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PubSubMessage {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub attributes: Option<HashMap<String, String>>,
    #[serde(default, rename = "messageId", alias = "message_id")]
    pub message_id: Option<String>,
    #[serde(default, rename = "publishTime", alias = "publish_time")]
    pub publish_time: Option<String>,
}

impl PubSubMessage {
    /// Builds a message whose payload is the base64 encoding of `payload`.
    pub fn from_payload(payload: &str) -> Self {
        Self {
            data: Some(STANDARD.encode(payload.as_bytes())),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes
            .get_or_insert_with(HashMap::new)
            .insert(key.to_string(), value.to_string());
        self
    }
}

/// Fields extracted from a valid message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMessage {
    pub image_uri: String,
    pub image_id: Option<String>,
    pub credential: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFormat {
    /// Payload is the image URI.
    Uri,
    /// Payload is a JSON object with `image_uri` and `jwt`.
    Json,
    /// Payloads starting with `{` are JSON, anything else is a URI.
    Auto,
}

impl FromStr for MessageFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uri" | "plain" => Ok(Self::Uri),
            "json" | "structured" => Ok(Self::Json),
            "auto" => Ok(Self::Auto),
            other => Err(format!("unknown message format '{other}'")),
        }
    }
}

impl fmt::Display for MessageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uri => write!(f, "uri"),
            Self::Json => write!(f, "json"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

/// Where the photo identifier comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdSource {
    /// The `id` attribute is mandatory.
    Attribute,
    /// The `id` attribute is optional; the id is derived from the URI when absent.
    Derived,
}

impl FromStr for IdSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "attribute" | "explicit" => Ok(Self::Attribute),
            "derived" | "hash" => Ok(Self::Derived),
            other => Err(format!("unknown id source '{other}'")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StructuredPayload {
    image_uri: Option<String>,
    jwt: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MessageDecoder {
    format: MessageFormat,
    id_source: IdSource,
    require_jwt: bool,
}

impl MessageDecoder {
    pub fn new(config: &MessageConfig) -> Self {
        Self {
            format: config.format,
            id_source: config.id_source,
            require_jwt: config.require_jwt,
        }
    }

    pub fn decode(&self, message: &PubSubMessage) -> Result<DecodedMessage> {
        let attributes = message.attributes.as_ref();

        // An empty id is no id.
        let image_id = match self.id_source {
            IdSource::Attribute => {
                let attributes =
                    attributes.ok_or_else(|| PhotoError::invalid_message("missing attributes"))?;
                let id = attributes
                    .get("id")
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| PhotoError::invalid_message("missing id attribute"))?;
                Some(id.clone())
            }
            IdSource::Derived => attributes
                .and_then(|a| a.get("id"))
                .filter(|id| !id.is_empty())
                .cloned(),
        };

        let data = message
            .data
            .as_deref()
            .ok_or_else(|| PhotoError::invalid_message("missing data"))?;
        let payload = decode_payload(data)?;

        let structured = match self.format {
            MessageFormat::Uri => false,
            MessageFormat::Json => true,
            MessageFormat::Auto => payload.trim_start().starts_with('{'),
        };

        let (image_uri, credential) = if structured {
            self.parse_structured(&payload)?
        } else {
            (payload, None)
        };

        if image_uri.is_empty() {
            return Err(PhotoError::invalid_message("missing image_uri"));
        }

        Ok(DecodedMessage {
            image_uri,
            image_id,
            credential,
        })
    }

    fn parse_structured(&self, payload: &str) -> Result<(String, Option<String>)> {
        let parsed: StructuredPayload = serde_json::from_str(payload)
            .map_err(|e| PhotoError::invalid_message(format!("invalid json: {e}")))?;

        let image_uri = parsed
            .image_uri
            .ok_or_else(|| PhotoError::invalid_message("missing image_uri"))?;

        if self.require_jwt && parsed.jwt.is_none() {
            return Err(PhotoError::invalid_message("missing jwt"));
        }

        Ok((image_uri, parsed.jwt))
    }
}

fn decode_payload(data: &str) -> Result<String> {
    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| PhotoError::invalid_message(format!("invalid base64: {e}")))?;
    String::from_utf8(bytes).map_err(|e| PhotoError::invalid_message(format!("invalid utf-8: {e}")))
}
