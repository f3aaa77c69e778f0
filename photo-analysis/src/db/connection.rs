use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use libsql::{Builder, Connection};
use serde::Deserialize;

use crate::config::DatabaseConfig;
use crate::error::Result;

use super::schema;

/// SQLite `journal_mode` applied to local database files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    Delete,
    Truncate,
    Persist,
    Memory,
    Wal,
    Off,
}

impl FromStr for JournalMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "delete" => Ok(Self::Delete),
            "truncate" => Ok(Self::Truncate),
            "persist" => Ok(Self::Persist),
            "memory" => Ok(Self::Memory),
            "wal" => Ok(Self::Wal),
            "off" => Ok(Self::Off),
            other => Err(format!("unknown journal mode '{other}'")),
        }
    }
}

impl fmt::Display for JournalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self {
            Self::Delete => "DELETE",
            Self::Truncate => "TRUNCATE",
            Self::Persist => "PERSIST",
            Self::Memory => "MEMORY",
            Self::Wal => "WAL",
            Self::Off => "OFF",
        };
        f.write_str(mode)
    }
}

/// Where the document database lives, derived from `DATABASE_URL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location<'a> {
    File(&'a str),
    Remote { url: &'a str },
    Replica { url: &'a str, local_path: &'a str },
}

impl<'a> Location<'a> {
    fn from_config(config: &'a DatabaseConfig) -> Self {
        let url = config.url.as_str();
        if url.starts_with("libsql://") || url.starts_with("https://") {
            match config.local_path.as_deref() {
                Some(local_path) => Self::Replica { url, local_path },
                None => Self::Remote { url },
            }
        } else {
            Self::File(url.strip_prefix("file:").unwrap_or(url))
        }
    }
}

/// Handle to the libsql database backing the document sink.
#[derive(Clone)]
pub struct Database {
    db: Arc<libsql::Database>,
}

impl Database {
    /// Opens the database and creates the `documents` table if needed.
    /// Pragmas are applied to local files only.
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let token = config.auth_token.clone().unwrap_or_default();
        let location = Location::from_config(config);

        let db = match location {
            Location::File(path) => Builder::new_local(path).build().await?,
            Location::Remote { url } => Builder::new_remote(url.to_string(), token).build().await?,
            Location::Replica { url, local_path } => {
                Builder::new_remote_replica(local_path, url.to_string(), token)
                    .build()
                    .await?
            }
        };

        let database = Self { db: Arc::new(db) };
        let conn = database.connect()?;
        if let Location::File(path) = location {
            tracing::debug!(path, "Opened local document database");
            apply_pragmas(&conn, config).await;
        }
        schema::init_schema(&conn).await?;

        Ok(database)
    }

    pub fn connect(&self) -> Result<Connection> {
        Ok(self.db.connect()?)
    }
}

/// Pragma failures are logged; the database stays usable with SQLite defaults.
async fn apply_pragmas(conn: &Connection, config: &DatabaseConfig) {
    let pragmas = [
        format!("PRAGMA busy_timeout = {}", config.busy_timeout_ms),
        format!("PRAGMA journal_mode = {}", config.journal_mode),
    ];

    for pragma in pragmas {
        if let Err(error) = conn.execute_batch(&pragma).await {
            tracing::warn!(%pragma, %error, "Failed to apply SQLite pragma");
        }
    }
}
