//! Application configuration module.
//!
//! Manages the TOML config file holding TMDB API and pagination settings.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{ApiConfig, AppConfig, PagingSection};
pub use paths::resolve_config_path;
