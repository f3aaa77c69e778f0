//! Destinations for assembled photo records.
//!
//! Exactly one sink is active per deployment, chosen by `SINK`:
//! - `DocumentSink` stores the record as a full document keyed by photo id
//! - `RemoteEndpointSink` PUTs the joined texts to the photo analysis REST API

mod credential;
mod document;
mod remote;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;
use crate::processing::PhotoRecord;

pub use credential::CredentialResolver;
pub use document::DocumentSink;
pub use remote::RemoteEndpointSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    Document,
    Remote,
}

impl SinkKind {
    /// Case folding each sink expects when `TEXT_LOWERCASE` is not set.
    pub fn lowercases_by_default(&self) -> bool {
        matches!(self, Self::Document)
    }
}

impl FromStr for SinkKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "document" | "firestore" => Ok(Self::Document),
            "remote" | "wordpress" => Ok(Self::Remote),
            other => Err(format!("unknown sink '{other}'")),
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document => write!(f, "document"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

#[async_trait]
pub trait ResultSink: Send + Sync {
    fn kind(&self) -> SinkKind;

    /// Delivers `record`. `credential` is the bearer token carried by the
    /// message, if any; sinks that need no authentication ignore it.
    async fn write(&self, record: &PhotoRecord, credential: Option<&str>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_kind_from_str() {
        assert_eq!("Document".parse::<SinkKind>().unwrap(), SinkKind::Document);
        assert_eq!("firestore".parse::<SinkKind>().unwrap(), SinkKind::Document);
        assert_eq!("remote".parse::<SinkKind>().unwrap(), SinkKind::Remote);
        assert!("s3".parse::<SinkKind>().is_err());
    }

    #[test]
    fn test_default_casing() {
        assert!(SinkKind::Document.lowercases_by_default());
        assert!(!SinkKind::Remote.lowercases_by_default());
    }
}
