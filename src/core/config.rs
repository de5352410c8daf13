use crate::core::history::DEFAULT_HISTORY_CAPACITY;
use crate::core::scheduler::DEFAULT_REFRESH_INTERVAL_SECS;
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DolarApiProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CriptoYaProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub dolarapi: Option<DolarApiProviderConfig>,
    pub criptoya: Option<CriptoYaProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            dolarapi: Some(DolarApiProviderConfig {
                base_url: "https://dolarapi.com".to_string(),
            }),
            criptoya: Some(CriptoYaProviderConfig {
                base_url: "https://api.criptoya.com".to_string(),
            }),
        }
    }
}

/// Longest accepted refresh interval: one day.
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 86_400;

/// Refresh policy, HTTP timeouts and retry settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RefreshConfig {
    /// Minimum seconds between two fetches.
    pub interval_secs: u64,
    pub history_capacity: usize,
    pub request_timeout_secs: u64,
    /// Upper bound for the primary provider's whole retry sequence.
    pub deadline_secs: u64,
    pub retry_attempts: usize,
    /// First backoff delay; doubles after every failed attempt.
    pub retry_backoff_ms: u64,
    pub fallback_attempts: usize,
    /// Width of the memoization bucket for repeated fetches.
    pub memo_bucket_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        RefreshConfig {
            interval_secs: DEFAULT_REFRESH_INTERVAL_SECS as u64,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            request_timeout_secs: 10,
            deadline_secs: 15,
            retry_attempts: 3,
            retry_backoff_ms: 1000,
            fallback_attempts: 1,
            memo_bucket_secs: 1,
        }
    }
}

impl RefreshConfig {
    /// The refresh interval, capped at [`MAX_REFRESH_INTERVAL_SECS`].
    pub fn interval(&self) -> chrono::Duration {
        let secs = self.interval_secs.min(MAX_REFRESH_INTERVAL_SECS);
        chrono::Duration::seconds(i64::try_from(secs).unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS))
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval_secs > MAX_REFRESH_INTERVAL_SECS {
            bail!(
                "refresh.interval_secs must be at most {MAX_REFRESH_INTERVAL_SECS}, got {}",
                self.interval_secs
            );
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
}

impl AppConfig {
    /// Loads the config from the default location, or falls back to defaults
    /// when no file has been set up yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("ar", "insieme", "dolarwatch")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .refresh
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn dolarapi_base_url(&self) -> &str {
        self.providers
            .dolarapi
            .as_ref()
            .map_or("https://dolarapi.com", |p| &p.base_url)
    }

    pub fn criptoya_base_url(&self) -> &str {
        self.providers
            .criptoya
            .as_ref()
            .map_or("https://api.criptoya.com", |p| &p.base_url)
    }
}
