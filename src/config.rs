use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::services::scoring::ScoreWeights;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub storage: StorageConfig,
    pub scoring: ScoreWeights,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dlmm-api.meteora.ag".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub out_dir: String,
    pub retention: RetentionMode,
    pub history_limit: usize,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RetentionMode {
    /// Rolling per-pool history, bounded by `history_limit`.
    History,
    /// Single most recent snapshot per pool.
    LastOnly,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            out_dir: "./out".to_string(),
            retention: RetentionMode::History,
            history_limit: 50,
        }
    }
}

impl Config {
    /// Load config.toml if present. A missing file means defaults; the run
    /// parameters all come from the CLI anyway.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
