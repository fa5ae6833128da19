// src/config.rs
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::labels::{EntityLabels, DEFAULT_LABELS};
use crate::models::server::ServerRecord;
use crate::utils::HostError;

pub const DEFAULT_ROTATE_INTERVAL_SECS: f64 = 8.0;

/// Card options as written in the dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Seconds between rotations; zero, negative or out-of-range values
    /// disable rotation.
    pub rotate_interval: f64,
    pub show_header: bool,
    pub show_offline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<ServerRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_servers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            rotate_interval: DEFAULT_ROTATE_INTERVAL_SECS,
            show_header: true,
            show_offline: false,
            servers: None,
            exclude_servers: None,
            labels: None,
        }
    }
}

impl CardConfig {
    pub fn rotation_period(&self) -> Option<Duration> {
        if !self.rotate_interval.is_finite() || self.rotate_interval <= 0.0 {
            return None;
        }
        match Duration::try_from_secs_f64(self.rotate_interval) {
            Ok(period) => Some(period),
            Err(e) => {
                warn!(
                    "rotate_interval {} disables rotation: {}",
                    self.rotate_interval, e
                );
                None
            }
        }
    }

    pub fn manual_servers(&self) -> Option<&[ServerRecord]> {
        self.servers.as_deref()
    }

    pub fn excluded(&self) -> &[String] {
        self.exclude_servers.as_deref().unwrap_or(&[])
    }

    pub fn entity_labels(&self) -> &'static EntityLabels {
        EntityLabels::preset(self.labels.as_deref().unwrap_or(DEFAULT_LABELS))
    }
}

/// Configuration a freshly added card starts with.
pub fn stub_config() -> CardConfig {
    CardConfig::default()
}

pub fn load_card_config(path: &Path) -> Result<CardConfig, HostError> {
    let contents = fs::read_to_string(path).map_err(|source| HostError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| HostError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Settings for the terminal host, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub snapshot_path: PathBuf,
    pub card_config_path: Option<PathBuf>,
    pub snapshot_reload_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("states.json"),
            card_config_path: None,
            snapshot_reload_secs: 5,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            snapshot_path: env::var("SNAPSHOT_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_path),

            card_config_path: env::var("CARD_CONFIG_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),

            snapshot_reload_secs: env::var("SNAPSHOT_RELOAD_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.snapshot_reload_secs),
        }
    }

    pub fn snapshot_reload_period(&self) -> Option<Duration> {
        (self.snapshot_reload_secs > 0).then(|| Duration::from_secs(self.snapshot_reload_secs))
    }
}
