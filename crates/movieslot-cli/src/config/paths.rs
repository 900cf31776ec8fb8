//! Config file location.

use std::path::PathBuf;

use anyhow::{Result, bail};

/// Application directory name under the config root.
const APP_DIR: &str = "movieslot";

/// Resolves the config file path.
///
/// - If `dir` is `Some`, returns `{dir}/config.toml`.
/// - Else if `XDG_CONFIG_HOME` is set, returns `$XDG_CONFIG_HOME/movieslot/config.toml`.
/// - Otherwise returns `~/.config/movieslot/config.toml`.
///
/// # Errors
///
/// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is set (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    config_path_from(
        dir,
        std::env::var("XDG_CONFIG_HOME").ok(),
        std::env::var("HOME").ok(),
    )
}

fn config_path_from(
    dir: Option<&PathBuf>,
    xdg_config_home: Option<String>,
    home: Option<String>,
) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join("config.toml"));
    }

    let root = match (xdg_config_home.filter(|s| !s.is_empty()), home) {
        (Some(xdg), _) => PathBuf::from(xdg),
        (None, Some(home)) => PathBuf::from(home).join(".config"),
        (None, None) => bail!("HOME environment variable is not set"),
    };
    Ok(root.join(APP_DIR).join("config.toml"))
}
