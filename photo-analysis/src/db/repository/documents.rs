use chrono::Utc;
use libsql::{params, Connection};
use serde_json::Value;

use crate::error::Result;

pub struct DocumentRepository;

impl DocumentRepository {
    pub async fn put(conn: &Connection, collection: &str, key: &str, document: &Value) -> Result<()> {
        let body = serde_json::to_string(document)?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            r#"
            INSERT INTO documents (collection, key, body, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(collection, key) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at
            "#,
            params![collection, key, body, now],
        )
        .await?;

        Ok(())
    }

    pub async fn get(conn: &Connection, collection: &str, key: &str) -> Result<Option<Value>> {
        let mut rows = conn
            .query(
                "SELECT body FROM documents WHERE collection = ?1 AND key = ?2",
                params![collection, key],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            let body = row.get::<String>(0)?;
            Ok(Some(serde_json::from_str(&body)?))
        } else {
            Ok(None)
        }
    }

    pub async fn count(conn: &Connection, collection: &str) -> Result<u64> {
        let mut rows = conn
            .query(
                "SELECT COUNT(*) FROM documents WHERE collection = ?1",
                params![collection],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(row.get::<i64>(0)?.max(0) as u64),
            None => Ok(0),
        }
    }
}
