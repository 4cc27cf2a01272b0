use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::http::HttpOptions;
use crate::retry::RetryPolicy;

/// Default bucket listing scanned when nothing else is configured.
pub const DEFAULT_LISTING_URL: &str = "https://s3.amazonaws.com/baywheels-data/";

/// Default archive-name pattern (monthly trip-data archives).
pub const DEFAULT_PATTERN: &str = "([0-9]+-baywheels-tripdata.csv.zip)";

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

/// Global configuration loaded from `~/.config/bucketzip/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Listing page to scan; archive names are appended to it to form download URLs.
    pub listing_url: String,
    /// Regex applied to the listing text. Capture group 1 is the archive name when present.
    pub pattern: String,
    /// Directory archives are extracted into.
    pub data_dir: PathBuf,
    /// Keep downloaded archives instead of deleting them after extraction.
    #[serde(default)]
    pub keep_archives: bool,
    /// Follow truncated S3 listings with `?marker=`.
    #[serde(default = "default_true")]
    pub follow_pagination: bool,
    /// Upper bound on listing pages fetched in one run.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

fn default_true() -> bool {
    true
}

fn default_max_pages() -> u32 {
    100
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_timeout() -> u64 {
    3600
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            pattern: DEFAULT_PATTERN.to_string(),
            data_dir: PathBuf::from("data"),
            keep_archives: false,
            follow_pagination: true,
            max_pages: default_max_pages(),
            connect_timeout_secs: default_connect_timeout(),
            timeout_secs: default_timeout(),
            user_agent: None,
            retry: None,
        }
    }
}

impl HarvestConfig {
    /// Retry policy from the `[retry]` section, or the built-in default.
    /// Fails when `base_delay_secs` is not a representable delay (`inf` or too large).
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        match &self.retry {
            Some(r) => {
                let base_delay = Duration::try_from_secs_f64(r.base_delay_secs.max(0.0))
                    .with_context(|| {
                        format!("invalid retry.base_delay_secs: {}", r.base_delay_secs)
                    })?;
                Ok(RetryPolicy {
                    max_attempts: r.max_attempts.max(1),
                    base_delay,
                    max_delay: Duration::from_secs(r.max_delay_secs),
                })
            }
            None => Ok(RetryPolicy::default()),
        }
    }

    /// Transfer options for curl handles.
    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone(),
            ..HttpOptions::default()
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bucketzip")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HarvestConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = HarvestConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Parse a config file at an explicit path.
pub fn load_from_path(path: &Path) -> Result<HarvestConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: HarvestConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    cfg.retry_policy()
        .with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
