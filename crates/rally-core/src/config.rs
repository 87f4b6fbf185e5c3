//! On-disk configuration (`~/.config/rally/config.toml`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::classify::ErrorKind;
use crate::executor::ExecutorConfig;
use crate::loading::LoadingConfig;

/// `[executor]` section: retry budget and backoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorSettings {
    /// Total attempts per session, including the first.
    pub max_retries: u32,
    /// Backoff base in milliseconds; retry n waits base * 2^(n-1).
    pub base_delay_ms: u64,
    /// Error kinds that are never retried.
    pub no_retry_kinds: Vec<ErrorKind>,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            no_retry_kinds: Vec::new(),
        }
    }
}

impl ExecutorSettings {
    pub fn to_executor_config(&self) -> ExecutorConfig {
        let config = ExecutorConfig::default()
            .with_max_retries(self.max_retries)
            .with_base_delay_ms(self.base_delay_ms);
        if self.no_retry_kinds.is_empty() {
            return config;
        }
        let blocked = self.no_retry_kinds.clone();
        config.with_should_retry(move |e| !blocked.contains(&e.kind()))
    }
}

/// `[loading]` section: deadline and progress simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingSettings {
    pub timeout_ms: u64,
    pub show_progress: bool,
    pub estimated_duration_ms: u64,
    pub loading_message: String,
    pub tick_interval_ms: u64,
}

impl Default for LoadingSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            show_progress: false,
            estimated_duration_ms: 5_000,
            loading_message: "Loading...".to_string(),
            tick_interval_ms: 200,
        }
    }
}

impl LoadingSettings {
    pub fn to_loading_config(&self) -> LoadingConfig {
        LoadingConfig::default()
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_progress(self.show_progress)
            .with_estimated_duration(Duration::from_millis(self.estimated_duration_ms))
            .with_message(self.loading_message.clone())
            .with_tick_interval(Duration::from_millis(self.tick_interval_ms))
    }
}

/// Global configuration. Missing sections fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RallyConfig {
    pub executor: ExecutorSettings,
    pub loading: LoadingSettings,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rally")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Read configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<RallyConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: RallyConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

/// Write `cfg` to `path`, creating parent directories.
pub fn save_to_path(cfg: &RallyConfig, path: &Path) -> Result<()> {
    let toml = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml)?;
    Ok(())
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RallyConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RallyConfig::default();
        save_to_path(&default_cfg, &path)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}
