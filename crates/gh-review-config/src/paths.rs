//! Configuration and data directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/gh-review/`, `~/.cache/gh-review/`
//! - macOS: `~/Library/Application Support/gh-review/`, `~/Library/Caches/gh-review/`
//! - Windows: `%APPDATA%\gh-review\`, `%LOCALAPPDATA%\gh-review\`

use anyhow::{Context, Result};
use std::path::PathBuf;

pub const APP_NAME: &str = "gh-review";

/// Get the application config directory
/// Returns ~/.config/gh-review/ on Linux, ~/Library/Application Support/gh-review/ on macOS
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(APP_NAME))
}

/// Get the application cache directory, creating it if needed
/// Returns ~/.cache/gh-review/ on Linux, ~/Library/Caches/gh-review/ on macOS
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(dir)
}

/// Get path to the platform app config file
pub fn app_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Get path to a new log file, one per run
pub fn log_file_path(stamp: &str) -> Result<PathBuf> {
    Ok(cache_dir()?.join(format!("{}-{}.log", APP_NAME, stamp)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_path_is_inside_config_dir() {
        let path = app_config_path().unwrap();
        assert!(path.ends_with("gh-review/config.toml"));
    }

    #[test]
    fn test_log_file_path() {
        let path = log_file_path("20240115-103000").unwrap();
        assert!(path.parent().is_some_and(|dir| dir.exists()));
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("gh-review-20240115-103000.log")
        );
    }
}
