use anyhow::{Context, Result};

use crate::embedding::EncoderModel;

const DEFAULT_LANGUAGETOOL_URL: &str = "https://api.languagetool.org";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub embedding_model: EncoderModel,
    /// Where fastembed keeps downloaded model files. `None` uses the library default.
    pub embedding_cache_dir: Option<String>,
    pub languagetool_url: String,
    pub grammar_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            embedding_model: optional_env("EMBEDDING_MODEL")
                .map(|v| v.parse::<EncoderModel>())
                .transpose()
                .context("EMBEDDING_MODEL is not a supported model name")?
                .unwrap_or_default(),
            embedding_cache_dir: optional_env("EMBEDDING_CACHE_DIR"),
            languagetool_url: optional_env("LANGUAGETOOL_URL")
                .unwrap_or_else(|| DEFAULT_LANGUAGETOOL_URL.to_string()),
            grammar_timeout_secs: parse_env("GRAMMAR_TIMEOUT_SECS", 30)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}
