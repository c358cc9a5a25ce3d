use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "WhiteCross Dashboard";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix for environment overrides, e.g. `WHITECROSS_SERVER__BIND_ADDR`.
pub const ENV_PREFIX: &str = "WHITECROSS";

/// Log filter used when neither `RUST_LOG` nor `log_filter` is set.
pub fn default_log_filter() -> &'static str {
    "info,whitecross_dashboard=debug,tower_http=info"
}

/// Get the application data directory (`<local data dir>/whitecross`).
pub fn app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("whitecross")
}

/// Default location of the clinic database.
pub fn default_database_path() -> PathBuf {
    app_data_dir().join("whitecross.db")
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardConfig {
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AuthConfig {
    /// Accepted bearer tokens. Empty disables authentication.
    #[serde(default)]
    pub api_tokens: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateLimitConfig {
    pub per_minute: u32,
    pub per_hour: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditConfig {
    /// Entries older than this are pruned at startup.
    pub retention_days: i64,
}

/// Runtime configuration: built-in defaults, then an optional TOML file,
/// then `WHITECROSS_*` environment variables (`__` between sections).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    pub rate_limit: RateLimitConfig,
    pub audit: AuditConfig,
    #[serde(default)]
    pub log_filter: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_addr: "127.0.0.1:8080".into(),
            },
            database: DatabaseConfig {
                path: default_database_path(),
            },
            dashboard: DashboardConfig { cache_ttl_secs: 300 },
            auth: AuthConfig::default(),
            rate_limit: RateLimitConfig {
                per_minute: 100,
                per_hour: 1000,
            },
            audit: AuditConfig { retention_days: 90 },
            log_filter: None,
        }
    }
}

impl AppConfig {
    /// Load from the process environment and an optional config file.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// `env` replaces the process environment when given.
    fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("auth.api_tokens")
                .try_parsing(true)
                .source(env),
        );

        let loaded: AppConfig = builder.build()?.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.dashboard.cache_ttl_secs == 0 {
            return Err(ConfigError::Invalid("dashboard.cache_ttl_secs must be > 0".into()));
        }
        if self.rate_limit.per_minute == 0 || self.rate_limit.per_hour == 0 {
            return Err(ConfigError::Invalid("rate_limit values must be > 0".into()));
        }
        if self.audit.retention_days < 1 {
            return Err(ConfigError::Invalid("audit.retention_days must be >= 1".into()));
        }
        if self.auth.api_tokens.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "auth.api_tokens must not contain blank tokens".into(),
            ));
        }
        Ok(())
    }

    /// Effective log filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(default_log_filter())
    }
}
