use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

fn default_base_url() -> String {
    "https://api.bestbuy.com/v1".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_pace_ms() -> u64 {
    750
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogCfg {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-call HTTP timeout; a timed-out lookup counts as an upstream failure
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailCfg {
    pub endpoint: String,
    pub token: String,
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchCfg {
    /// Fixed delay between catalog calls within a run
    #[serde(default = "default_pace_ms")]
    pub pace_ms: u64,
    pub store_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub catalog: CatalogCfg,
    pub mail: MailCfg,
    pub watch: WatchCfg,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())
            .with_context(|| format!("read config file {}", path.as_ref().display()))?;
        let cfg: Self = toml::from_str(&s).context("parse Config.toml")?;
        Ok(cfg)
    }
}
