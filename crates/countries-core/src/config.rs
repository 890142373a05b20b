//! Configuration loading and typed config structures.
//!
//! Configuration lives in `countries-config.yaml` next to the binary (or
//! at the path in `COUNTRIES_CONFIG`). Every field has a default, so the
//! file itself is optional. A handful of deployment settings can be
//! overridden from the environment:
//!
//! - `PORT` overrides `server.port`
//! - `DATABASE_URL` overrides `database.url`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "countries-config.yaml";

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "COUNTRIES_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value (usually from the environment) is out of range or malformed.
    #[error("invalid config value for {key}: {message}")]
    Invalid {
        /// Name of the offending setting.
        key: String,
        /// What was wrong with it.
        message: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSettings,

    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseSettings,

    /// Upstream API endpoints.
    #[serde(default)]
    pub sources: SourceSettings,

    /// Summary image output.
    #[serde(default)]
    pub summary: SummarySettings,

    /// Read-side behaviour of the list and lookup endpoints.
    #[serde(default)]
    pub query: QuerySettings,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// Load configuration from `COUNTRIES_CONFIG` or `countries-config.yaml`.
    ///
    /// A missing file yields the defaults. Environment overrides are
    /// applied in both cases.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or
    /// parsed, or an environment override is malformed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);

        if path.exists() {
            Self::from_file(&path)
        } else {
            tracing::debug!(path = %path.display(), "No config file found, using defaults");
            let mut config = Self::default();
            config.apply_env_overrides()?;
            Ok(config)
        }
    }

    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] for a malformed environment override.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `PORT` is not a valid port.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `PORT` is not a valid port.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").filter(|p| !p.trim().is_empty()) {
            self.server.port = port.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: String::from("PORT"),
                message: format!("{port:?}: {e}"),
            })?;
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()) {
            self.database.url = url;
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseSettings {
    /// `SQLite` connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// Upstream API endpoints and client behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceSettings {
    /// Full URL returning the country metadata array.
    #[serde(default = "default_countries_url")]
    pub countries_url: String,

    /// Full URL returning USD-based exchange rates.
    #[serde(default = "default_rates_url")]
    pub rates_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl SourceSettings {
    /// Per-request timeout as a [`Duration`].
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            countries_url: default_countries_url(),
            rates_url: default_rates_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Summary image output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SummarySettings {
    /// Where the rendered PNG is written (and served from).
    #[serde(default = "default_image_path")]
    pub image_path: PathBuf,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            image_path: default_image_path(),
        }
    }
}

/// Read-side behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuerySettings {
    /// Recompute the estimated GDP with a fresh multiplier on every read
    /// instead of returning the value persisted by the last refresh.
    #[serde(default)]
    pub rederive_on_read: bool,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8080
}

fn default_database_url() -> String {
    String::from("sqlite://countries.db")
}

const fn default_max_connections() -> u32 {
    5
}

fn default_countries_url() -> String {
    String::from(
        "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies",
    )
}

fn default_rates_url() -> String {
    String::from("https://open.er-api.com/v6/latest/USD")
}

const fn default_timeout_ms() -> u64 {
    30_000
}

fn default_image_path() -> PathBuf {
    PathBuf::from("cache").join("summary.png")
}

fn default_log_level() -> String {
    String::from("info")
}
