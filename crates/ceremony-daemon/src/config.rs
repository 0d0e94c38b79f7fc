//! Configuration file management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ceremony_types::CeremonyDetails;
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CEREMONY_CONFIG";

/// Config file read from the working directory when [`CONFIG_ENV`] is unset.
pub const DEFAULT_CONFIG_FILE: &str = "ceremony.toml";

/// Complete daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CeremonyConfig {
    /// Ceremony parameters.
    #[serde(default)]
    pub ceremony: CeremonySection,
    /// Polling and timeout settings.
    #[serde(default)]
    pub runtime: RuntimeConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Where the report goes.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Ceremony parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CeremonySection {
    #[serde(default = "default_ceremony_id")]
    pub ceremony_id: String,
    #[serde(default = "default_mediator_id")]
    pub mediator_id: String,
    #[serde(default = "default_number_of_guardians")]
    pub number_of_guardians: usize,
    #[serde(default = "default_quorum")]
    pub quorum: usize,
}

/// Runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// How often guardians poll the mediator.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Give up on the ceremony after this long.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive. `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report file path. Empty = stdout only.
    #[serde(default)]
    pub path: String,
}

// Default value functions

fn default_ceremony_id() -> String {
    "ceremony-1".to_string()
}

fn default_mediator_id() -> String {
    "mediator".to_string()
}

fn default_number_of_guardians() -> usize {
    3
}

fn default_quorum() -> usize {
    2
}

fn default_poll_interval() -> u64 {
    10
}

fn default_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CeremonySection {
    fn default() -> Self {
        Self {
            ceremony_id: default_ceremony_id(),
            mediator_id: default_mediator_id(),
            number_of_guardians: default_number_of_guardians(),
            quorum: default_quorum(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl CeremonyConfig {
    /// Load configuration from the default location.
    ///
    /// Falls back to defaults if the file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CeremonyConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Validated ceremony details.
    pub fn details(&self) -> anyhow::Result<CeremonyDetails> {
        let details = CeremonyDetails::new(
            self.ceremony.ceremony_id.clone(),
            self.ceremony.number_of_guardians,
            self.ceremony.quorum,
        )?;
        Ok(details)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.runtime.poll_interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.runtime.timeout_secs)
    }

    /// Report file, if one is configured.
    pub fn output_path(&self) -> Option<PathBuf> {
        if self.output.path.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.output.path))
        }
    }

    fn config_path() -> PathBuf {
        // Check env var override first
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }
}
