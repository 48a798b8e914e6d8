//! Configuration management for the seller dashboard sync engine
//!
//! Loads the API location and the timing knobs of the list, filter and KYC
//! components from environment variables, with support for different
//! environments (development, staging, production).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment value: {0}")]
    InvalidValue(String),
}

/// Deployment the API base URL points at; only reported in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let environment = match raw.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" | "local" => Environment::Development,
            "stage" | "staging" => Environment::Staging,
            "prod" | "production" | "live" => Environment::Production,
            other => {
                return Err(ConfigError::InvalidValue(format!(
                    "ENVIRONMENT '{}' is not one of dev, staging, prod",
                    other
                )))
            }
        };
        Ok(environment)
    }
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the dashboard REST API
    pub api_base_url: String,

    /// Bearer token sent with every request
    pub api_token: Option<String>,

    /// Current environment
    pub environment: Environment,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Interval between KYC status checks in seconds (default: 6)
    pub kyc_poll_interval_secs: u64,

    /// Quiet period before a typed search is committed (default: 500 ms)
    pub search_debounce_ms: u64,

    /// Scroll fraction past which the next page is loaded (default: 0.8)
    pub scroll_threshold: f64,

    /// Directory that downloaded documents are written to
    pub download_dir: PathBuf,

    /// Log level (RUST_LOG)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .map(|raw| raw.parse::<Environment>())
            .transpose()?
            .unwrap_or(Environment::Development);

        let api_base_url = lookup("API_BASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("API_BASE_URL".to_string()))?
            .trim_end_matches('/')
            .to_string();

        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(format!(
                "API_BASE_URL must be an http(s) URL, got '{}'",
                api_base_url
            )));
        }

        let api_token = lookup("API_TOKEN").filter(|t| !t.is_empty());

        let request_timeout_secs = lookup("REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let kyc_poll_interval_secs = lookup("KYC_POLL_INTERVAL_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(6);

        let search_debounce_ms = lookup("SEARCH_DEBOUNCE_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(500);

        let scroll_threshold = match lookup("SCROLL_THRESHOLD") {
            Some(raw) => {
                let value = raw.parse::<f64>().map_err(|_| {
                    ConfigError::InvalidValue(format!("SCROLL_THRESHOLD must be a number: {}", raw))
                })?;
                if !(value > 0.0 && value <= 1.0) {
                    return Err(ConfigError::InvalidValue(format!(
                        "SCROLL_THRESHOLD must be in (0, 1]: {}",
                        value
                    )));
                }
                value
            }
            None => 0.8,
        };

        let download_dir = lookup("DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("downloads"));

        let log_level = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        Ok(Config {
            api_base_url,
            api_token,
            environment,
            request_timeout_secs,
            kyc_poll_interval_secs,
            search_debounce_ms,
            scroll_threshold,
            download_dir,
            log_level,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn kyc_poll_interval(&self) -> Duration {
        Duration::from_secs(self.kyc_poll_interval_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Get the API token with everything but the last four characters masked
    pub fn api_token_masked(&self) -> Option<String> {
        self.api_token.as_ref().map(|token| {
            let visible: String = token
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("****{}", visible)
        })
    }
}
