//! Application configuration: the TOML file every binary entrypoint loads.
//!
//! The file names the SQLite database and the three upstream dataset
//! locations. Locations are plain strings; anything starting with
//! `http://` or `https://` is fetched over the network, everything else is
//! treated as a local file path (the upstream publisher can be mirrored
//! into a local clone).
//!
//! ```toml
//! database_url = "_data/report.db"
//!
//! [sources]
//! nation    = "https://example.org/dpc-covid19-ita-andamento-nazionale.json"
//! regions   = "https://example.org/dpc-covid19-ita-regioni.json"
//! provinces = "https://example.org/dpc-covid19-ita-province.json"
//!
//! [notify]
//! messages_per_second = 30
//! ```

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading the application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`AppConfig`].
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Path that was attempted.
        path: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// SQLite database path (or `sqlite:`-less URL, passed to Diesel as-is).
    pub database_url: String,
    /// Locations of the three upstream datasets.
    pub sources: SourceSet,
    /// Notification fan-out tuning.
    #[serde(default)]
    pub notify: NotifyConfig,
}

/// Locations of the nation / regions / provinces datasets, in that order.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSet {
    /// National time series (one record per day).
    pub nation: String,
    /// Regional time series (one record per day per region).
    pub regions: String,
    /// Provincial time series (one record per day per province).
    pub provinces: String,
}

impl SourceSet {
    /// True when every location is an HTTP(S) URL.
    pub fn is_remote(&self) -> bool {
        [&self.nation, &self.regions, &self.provinces]
            .iter()
            .all(|s| s.starts_with("http://") || s.starts_with("https://"))
    }
}

/// Notification fan-out tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifyConfig {
    /// Upper bound on outbound messages per second during a broadcast.
    pub messages_per_second: u32,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        // The upstream messaging API starts throttling around 30 msg/s.
        Self {
            messages_per_second: 30,
        }
    }
}

/// Read and parse an [`AppConfig`] from a TOML file.
pub fn load_config_path(path: impl AsRef<std::path::Path>) -> Result<AppConfig, ConfigError> {
    let path_str = path.as_ref().display().to_string();
    let text = std::fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Read {
        path: path_str.clone(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path_str,
        source,
    })
}
