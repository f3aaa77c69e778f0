use libsql::Connection;

use crate::error::Result;

pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- One row per stored document; `body` holds the full JSON document
        CREATE TABLE IF NOT EXISTS documents (
            collection TEXT NOT NULL,
            key TEXT NOT NULL,
            body TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (collection, key)
        );

        CREATE INDEX IF NOT EXISTS idx_documents_updated_at ON documents(updated_at);
        "#,
    )
    .await?;

    Ok(())
}
