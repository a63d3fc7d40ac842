//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development.

use crate::locale::Locale;
use std::env;
use std::time::Duration;

/// `STORE_URL` value that selects the in-process store.
pub const MEMORY_STORE_URL: &str = "memory";

const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the hosted project (REST API lives under `/rest/v1`)
    pub store_url: String,
    /// Project API key sent with every store request
    pub store_api_key: String,
    /// Upper bound for a single store request
    pub store_timeout: Duration,
    /// HS256 secret shared with the authentication service (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Frontend URL for CORS and redirects
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Language for labels, units and messages
    pub locale: Locale,
}

impl Config {
    /// Config for tests: in-memory store and a fixed signing key.
    pub fn test_default() -> Self {
        Self {
            store_url: MEMORY_STORE_URL.to_string(),
            store_api_key: String::new(),
            store_timeout: Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            locale: Locale::Ru,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store_url = env::var("STORE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .map_err(|_| ConfigError::Missing("STORE_URL"))?;

        let store_api_key = if store_url == MEMORY_STORE_URL {
            env::var("STORE_API_KEY").unwrap_or_default()
        } else {
            env::var("STORE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STORE_API_KEY"))?
        };

        let store_timeout_secs = match env::var("STORE_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid("STORE_TIMEOUT_SECS", raw))?,
            Err(_) => DEFAULT_STORE_TIMEOUT_SECS,
        };

        let locale = match env::var("APP_LOCALE") {
            Ok(raw) => raw
                .parse::<Locale>()
                .map_err(|_| ConfigError::Invalid("APP_LOCALE", raw))?,
            Err(_) => Locale::default(),
        };

        Ok(Self {
            store_url,
            store_api_key,
            store_timeout: Duration::from_secs(store_timeout_secs),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            locale,
        })
    }

    /// Whether the in-process store was selected instead of the hosted one.
    pub fn uses_memory_store(&self) -> bool {
        self.store_url == MEMORY_STORE_URL
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
