//! Configuration management for the CLI
//!
//! Settings are layered: built-in defaults, then an optional JSON config
//! file at `~/.config/ontosync/config.json`, then `ONTOSYNC_*` environment
//! variables. Command-line flags override all of these at the call sites.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

/// CLI configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Source station base URL
    #[serde(default = "default_source_url")]
    pub source_url: String,

    /// Source station username
    #[serde(default = "default_source_user")]
    pub source_user: String,

    /// Source station password
    #[serde(default = "default_source_pass")]
    pub source_pass: String,

    /// Target platform base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Target platform access token
    #[serde(default)]
    pub access_token: Option<String>,

    /// Default target building
    #[serde(default)]
    pub building_id: Option<String>,

    /// Explicit datasource id, when known up front
    #[serde(default)]
    pub datasource_id: Option<String>,

    /// Datasource name used for by-name resolution
    #[serde(default = "default_datasource_name")]
    pub datasource_name: String,

    /// Minimum match confidence for a field to become a point
    #[serde(default = "default_min_confidence")]
    pub min_confidence: u8,

    /// Entity types synced by default
    #[serde(default = "default_entity_types")]
    pub entity_types: Vec<String>,

    /// Prefix for generated target device ids
    #[serde(default = "default_device_id_prefix")]
    pub device_id_prefix: String,
}

fn default_source_url() -> String {
    "http://localhost:8080/ontology/v1".to_string()
}

fn default_source_user() -> String {
    "admin".to_string()
}

fn default_source_pass() -> String {
    "admin".to_string()
}

fn default_api_url() -> String {
    "https://bms.example.com/api/v1".to_string()
}

fn default_datasource_name() -> String {
    "StationSync".to_string()
}

fn default_min_confidence() -> u8 {
    70
}

fn default_entity_types() -> Vec<String> {
    ["AHU", "VAV", "FCU", "CH", "BLR"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_device_id_prefix() -> String {
    "station".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        // An empty source map leaves every field to its serde default
        serde_json::from_value(serde_json::json!({})).expect("defaults always deserialize")
    }
}

impl Settings {
    /// Load configuration from the config file and environment
    pub fn load() -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = Self::config_path() {
            if path.exists() {
                debug!(path = %path.display(), "loading config file");
                builder = builder.add_source(config::File::from(path));
            }
        }

        let cfg = builder
            .add_source(
                config::Environment::with_prefix("ONTOSYNC")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("entity_types"),
            )
            .build()
            .context("failed to read configuration")?;

        cfg.try_deserialize().context("invalid configuration")
    }

    /// Parse settings from a JSON file, used directly in tests
    #[cfg(test)]
    fn from_file(path: &std::path::Path) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::from(path.to_path_buf()))
            .build()
            .context("failed to read configuration")?;
        cfg.try_deserialize().context("invalid configuration")
    }

    /// Get the configuration file path
    fn config_path() -> Option<PathBuf> {
        let home = dirs_next::home_dir()?;
        Some(home.join(".config").join("ontosync").join("config.json"))
    }
}
