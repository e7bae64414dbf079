//! Application configuration
//!
//! Configuration loaded from .gh-review.toml.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration loaded from .gh-review.toml
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    /// Repository used when none is given on the command line ("owner/repo")
    #[serde(default)]
    pub repository: Option<String>,

    /// GitHub Enterprise host; github.com when unset
    #[serde(default)]
    pub host: Option<String>,

    /// Editor command, overrides $VISUAL and $EDITOR
    #[serde(default)]
    pub editor: Option<String>,

    /// Git binary
    #[serde(default = "default_git")]
    pub git: String,

    /// Branch fetched next to the pull ref; "HEAD" is the remote's default branch
    #[serde(default = "default_base_branch")]
    pub base_branch: String,

    /// Where saved review drafts go; the current directory when unset
    #[serde(default)]
    pub draft_dir: Option<PathBuf>,

    /// Appended to every top-level review comment; empty disables it
    #[serde(default = "default_signature")]
    pub signature: String,
}

fn default_git() -> String {
    "git".to_string()
}

fn default_base_branch() -> String {
    "HEAD".to_string()
}

fn default_signature() -> String {
    "<!-- review by gh-review -->".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            repository: None,
            host: None,
            editor: None,
            git: default_git(),
            base_branch: default_base_branch(),
            draft_dir: None,
            signature: default_signature(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, then the platform
    /// config dir, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Directory drafts are saved to
    pub fn draft_dir(&self) -> PathBuf {
        self.draft_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
