use async_trait::async_trait;
use serde_json::Value;

use crate::db::connection::Database;
use crate::db::repository::DocumentRepository;
use crate::db::traits::DocumentStore;
use crate::error::Result;

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DocumentStore for LibSqlBackend {
    async fn put(&self, collection: &str, key: &str, document: &Value) -> Result<()> {
        let conn = self.db.connect()?;
        DocumentRepository::put(&conn, collection, key, document).await
    }
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>> {
        let conn = self.db.connect()?;
        DocumentRepository::get(&conn, collection, key).await
    }
    async fn count(&self, collection: &str) -> Result<u64> {
        let conn = self.db.connect()?;
        DocumentRepository::count(&conn, collection).await
    }
}
