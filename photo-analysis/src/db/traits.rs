use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Keyed JSON documents grouped into named collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores `document` under `key`, replacing any existing document in full.
    async fn put(&self, collection: &str, key: &str, document: &Value) -> Result<()>;
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>>;
    async fn count(&self, collection: &str) -> Result<u64>;
}
