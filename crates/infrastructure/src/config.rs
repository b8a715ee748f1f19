//! Application configuration.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. The config file (`apiweave.toml` in the working directory, or an
//!    explicit path which must then exist)
//! 3. `APIWEAVE_*` environment variables (`APIWEAVE_API_BASE_URL`, ...)

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

/// Config file looked up in the working directory (any supported extension).
pub const DEFAULT_CONFIG_NAME: &str = "apiweave";

const ENV_PREFIX: &str = "APIWEAVE";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or the values have the wrong type.
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read but is not acceptable.
    #[error("invalid setting {key}: {reason}")]
    Invalid {
        /// Offending key.
        key: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Backend base URL. When unset, the file store in `data_dir` is used.
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Directory holding the file store.
    pub data_dir: PathBuf,

    /// Timeout for backend requests, in seconds.
    pub request_timeout_secs: u64,

    /// Default `tracing` filter; `RUST_LOG` takes precedence.
    pub log_filter: String,

    /// Events buffered per event bus subscriber.
    pub event_capacity: usize,
}

impl AppConfig {
    /// Loads the configuration from defaults, file and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `path` is missing, a source cannot be
    /// parsed, or a value is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("request_timeout_secs", 30_i64)?
            .set_default("log_filter", "info")?
            .set_default("event_capacity", 64_i64)?;

        if let Some(data_dir) = default_data_dir() {
            builder = builder.set_default("data_dir", data_dir.to_string_lossy().into_owned())?;
        }

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        let mut config: Self = builder.add_source(env).build()?.try_deserialize()?;
        config.normalize()?;
        Ok(config)
    }

    fn normalize(&mut self) -> Result<(), ConfigError> {
        self.api_base_url = self
            .api_base_url
            .take()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "request_timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.event_capacity == 0 {
            return Err(ConfigError::Invalid {
                key: "event_capacity",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Backend request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Platform data directory for APIWeave:
/// - Linux: ~/.local/share/apiweave
/// - macOS: ~/Library/Application Support/apiweave
/// - Windows: %APPDATA%/apiweave
#[must_use]
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("apiweave"))
}
