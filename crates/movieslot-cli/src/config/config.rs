//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use movieslot_api::paging::{DEFAULT_PAGE_SIZE, DEFAULT_PREFETCH_DISTANCE, PagingConfig};
use movieslot_api::tmdb::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Pagination settings.
    #[serde(default)]
    pub paging: PagingSection,
}

/// TMDB API configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    /// API base URL, ending with a slash.
    pub base_url: String,
    /// Response language (e.g. "en-US"). An empty string omits it from
    /// requests; a missing key uses "en-US".
    pub language: String,
    /// Minimum interval between requests in milliseconds.
    pub min_interval_ms: u64,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Per-read socket timeout in seconds.
    pub read_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            language: String::from("en-US"),
            min_interval_ms: 25,
            connect_timeout_secs: 70,
            read_timeout_secs: 120,
        }
    }
}

impl ApiConfig {
    /// Minimum interval between requests.
    pub const fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    /// TCP connect timeout.
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Response language sent with requests, if any.
    pub fn language(&self) -> Option<&str> {
        Some(self.language.as_str()).filter(|l| !l.is_empty())
    }

    /// Per-read socket timeout.
    pub const fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

/// Pagination configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PagingSection {
    /// Requested items per page.
    pub page_size: u32,
    /// Items remaining before the end that trigger the next page.
    pub prefetch_distance: u32,
}

impl Default for PagingSection {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            prefetch_distance: DEFAULT_PREFETCH_DISTANCE,
        }
    }
}

impl PagingSection {
    /// Converts to the pager configuration.
    pub const fn to_paging_config(&self) -> PagingConfig {
        PagingConfig::new(self.page_size).with_prefetch_distance(self.prefetch_distance)
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}
