use serde::Deserialize;
use std::env;

use crate::db::JournalMode;
use crate::message::{IdSource, MessageFormat};
use crate::processing::CasePolicy;
use crate::sink::SinkKind;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Reads an optional string variable, treating an empty value as unset.
fn env_opt(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub ocr: OcrConfig,
    pub message: MessageConfig,
    pub processing: ProcessingConfig,
    pub sink: SinkConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
    pub busy_timeout_ms: u64,
    pub journal_mode: JournalMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub base_url: String,
    /// Sent as the `key` query parameter.
    pub api_key: Option<String>,
    /// Sent as a bearer token, e.g. a service account access token.
    pub access_token: Option<String>,
    pub timeout_secs: u64,
}

/// Shape of the inbound Pub/Sub payload for this deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageConfig {
    pub format: MessageFormat,
    pub id_source: IdSource,
    pub require_jwt: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessingConfig {
    pub case_policy: CasePolicy,
    /// Keep the whole-image transcript in the stored document as `raw_texts`.
    pub forward_raw_text: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SinkConfig {
    pub kind: SinkKind,
    pub collection: String,
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    pub host: Option<String>,
    /// Fallback bearer token for messages that carry no `jwt`.
    pub token: Option<String>,
    pub timeout_secs: u64,
}

pub const DEFAULT_DATABASE_URL: &str = "file:photos.db";
pub const DEFAULT_OCR_BASE_URL: &str = "https://vision.googleapis.com/v1";
pub const DEFAULT_COLLECTION: &str = "photos";

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            auth_token: None,
            local_path: None,
            busy_timeout_ms: 5000,
            journal_mode: JournalMode::Wal,
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OCR_BASE_URL.to_string(),
            api_key: None,
            access_token: None,
            timeout_secs: 60,
        }
    }
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            format: MessageFormat::Auto,
            id_source: IdSource::Derived,
            require_jwt: false,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: None,
            token: None,
            timeout_secs: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let sink_kind = parse_env_or("SINK", SinkKind::Document);
        let lowercase = parse_env_or("TEXT_LOWERCASE", sink_kind.lowercases_by_default());

        Self {
            server: ServerConfig {
                host: env::var("PHOTO_ANALYSIS_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("PHOTO_ANALYSIS_PORT", 8080),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
                auth_token: env_opt("DATABASE_AUTH_TOKEN"),
                local_path: env_opt("DATABASE_LOCAL_PATH"),
                busy_timeout_ms: parse_env_or("DATABASE_BUSY_TIMEOUT_MS", 5000),
                journal_mode: parse_env_or("DATABASE_JOURNAL_MODE", JournalMode::Wal),
            },
            ocr: OcrConfig {
                base_url: env::var("OCR_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_OCR_BASE_URL.to_string()),
                api_key: env_opt("OCR_API_KEY"),
                access_token: env_opt("OCR_ACCESS_TOKEN"),
                timeout_secs: parse_env_or("OCR_TIMEOUT", 60),
            },
            message: MessageConfig {
                format: parse_env_or("MESSAGE_FORMAT", MessageFormat::Auto),
                id_source: parse_env_or("MESSAGE_ID_SOURCE", IdSource::Derived),
                require_jwt: parse_env_or("MESSAGE_REQUIRE_JWT", false),
            },
            processing: ProcessingConfig {
                case_policy: CasePolicy::from_lowercase_flag(lowercase),
                forward_raw_text: parse_env_or("FORWARD_RAW_TEXT", false),
            },
            sink: SinkConfig {
                kind: sink_kind,
                collection: env::var("SINK_COLLECTION")
                    .unwrap_or_else(|_| DEFAULT_COLLECTION.to_string()),
                remote: RemoteConfig {
                    host: env_opt("REMOTE_HOST"),
                    token: env_opt("REMOTE_TOKEN"),
                    timeout_secs: parse_env_or("REMOTE_TIMEOUT", 30),
                },
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
