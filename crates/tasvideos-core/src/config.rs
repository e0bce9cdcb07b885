use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line human readable output.
    #[default]
    Plain,
    /// Multi-line colorized output with source locations.
    Pretty,
    /// One JSON object per event, for log aggregation.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "" => Ok(LogFormat::Plain),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection URL (e.g. sqlite://tasvideos.db?mode=rwc, postgres://...)
    pub database_url: String,

    /// Server host (default: 127.0.0.1)
    pub server_host: String,

    /// Server port (default: 3000)
    pub server_port: u16,

    /// Environment: development, production, test
    pub environment: String,

    /// Log output format (default: plain)
    pub log_format: LogFormat,

    /// How long a user's permission set stays cached, in seconds.
    /// Zero disables the cache.
    pub permission_cache_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables (with .env support).
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load .env file if present (ignore errors if missing)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an explicit set of variables.
    ///
    /// Missing keys take their defaults, exactly as with [`Config::from_env`].
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup(
        get: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let log_format = match get("LOG_FORMAT") {
            Some(raw) => raw.parse::<LogFormat>()?,
            None => LogFormat::default(),
        };

        Ok(Config {
            database_url: get("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://tasvideos.db?mode=rwc".to_string()),
            server_host: get("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port: get("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            log_format,
            permission_cache_ttl_secs: get("PERMISSION_CACHE_TTL_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
        })
    }

    /// Configuration for tests: in-memory SQLite, random port, no permission cache.
    pub fn for_tests() -> Self {
        Config {
            database_url: "sqlite::memory:".to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            environment: "test".to_string(),
            log_format: LogFormat::Plain,
            permission_cache_ttl_secs: 0,
        }
    }

    /// Check if running in development mode.
    pub fn is_dev(&self) -> bool {
        self.environment == "development"
    }

    /// Permission cache lifetime, or `None` when caching is disabled.
    pub fn permission_cache_ttl(&self) -> Option<Duration> {
        match self.permission_cache_ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
