use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::matching::embedding::DEFAULT_EMBEDDING_MODEL;

/// Application configuration loaded from environment variables.
/// Every setting has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Fallback credential for the language-model service when a request
    /// does not carry its own `x-llm-api-key` header.
    pub llm_api_key: Option<String>,
    pub llm_model: String,
    pub llm_base_url: String,
    pub llm_timeout_secs: u64,
    pub embedding_model: String,
    pub embedding_cache_dir: String,
    /// Load the embedding model at startup instead of on the first analysis.
    pub preload_embedding_model: bool,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            llm_api_key: None,
            llm_model: DEFAULT_MODEL.to_string(),
            llm_base_url: DEFAULT_BASE_URL.to_string(),
            llm_timeout_secs: 120,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_cache_dir: ".fastembed_cache".to_string(),
            preload_embedding_model: false,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            llm_api_key: optional_env("LLM_API_KEY"),
            llm_model: optional_env("LLM_MODEL").unwrap_or(defaults.llm_model),
            llm_base_url: optional_env("LLM_BASE_URL").unwrap_or(defaults.llm_base_url),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", defaults.llm_timeout_secs)?,
            embedding_model: optional_env("EMBEDDING_MODEL").unwrap_or(defaults.embedding_model),
            embedding_cache_dir: optional_env("EMBEDDING_CACHE_DIR")
                .unwrap_or(defaults.embedding_cache_dir),
            preload_embedding_model: match optional_env("PRELOAD_EMBEDDING_MODEL") {
                Some(raw) => parse_bool(&raw).with_context(|| {
                    format!("PRELOAD_EMBEDDING_MODEL must be a boolean, got '{raw}'")
                })?,
                None => defaults.preload_embedding_model,
            },
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        })
    }
}

/// Reads a variable, treating blank values as unset.
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
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" YES "), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_defaults_use_minilm_and_gemini_flash() {
        let config = Config::default();
        assert_eq!(config.embedding_model, "all-MiniLM-L6-v2");
        assert_eq!(config.llm_model, "gemini-flash-latest");
        assert!(config.llm_api_key.is_none());
        assert_eq!(config.port, 8080);
    }
}
