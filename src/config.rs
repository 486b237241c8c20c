//! Environment-driven configuration
//!
//! Values are read once at startup. `.env` files are honoured by the binaries
//! via `dotenv` before [`Config::from_env`] runs.

use crate::error::AnalystError;
use crate::Result;
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MESSAGES_API_URL: &str =
    "https://november7-730026606190.europe-west1.run.app/messages";
pub const DEFAULT_CACHE_FILE: &str = "messages_cache_v2.json";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Config {
    /// Empty when unset; the service then answers with a diagnostic.
    pub gemini_api_key: String,
    pub model: String,
    pub api_base_url: String,
    pub messages_api_url: String,
    pub cache_file: PathBuf,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("PORT").or_else(|| get("API_PORT")) {
            Some(raw) => raw
                .parse()
                .map_err(|e| AnalystError::Config(format!("invalid port {:?}: {}", raw, e)))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            gemini_api_key: get("GEMINI_API_KEY").unwrap_or_default(),
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base_url: get("GEMINI_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            messages_api_url: get("MESSAGES_API_URL")
                .unwrap_or_else(|| DEFAULT_MESSAGES_API_URL.to_string()),
            cache_file: get("MESSAGES_CACHE_FILE")
                .unwrap_or_else(|| DEFAULT_CACHE_FILE.to_string())
                .into(),
            port,
        })
    }
}
