use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::db::DocumentStore;
use crate::error::{PhotoError, Result};
use crate::processing::PhotoRecord;

use super::{ResultSink, SinkKind};

/// Writes each record as a complete document in one collection.
#[derive(Clone)]
pub struct DocumentSink {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl DocumentSink {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }
}

#[async_trait]
impl ResultSink for DocumentSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Document
    }

    async fn write(&self, record: &PhotoRecord, _credential: Option<&str>) -> Result<()> {
        let document = record.to_document()?;

        self.store
            .put(&self.collection, &record.id, &document)
            .await
            .map_err(|e| PhotoError::Sink(format!("Failed to store document {}: {e}", record.id)))?;

        info!(
            collection = %self.collection,
            id = %record.id,
            texts = record.texts.len(),
            "Stored photo texts"
        );
        Ok(())
    }
}
