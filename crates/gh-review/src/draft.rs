//! Saved review drafts (`<number>.redraft`)

use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct DraftStore {
    dir: PathBuf,
}

impl DraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, number: u64) -> PathBuf {
        self.dir.join(format!("{}.redraft", number))
    }

    /// Write the document, replacing any earlier draft for the same PR.
    pub fn save(&self, number: u64, document: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.path(number);
        std::fs::write(&path, document)
            .with_context(|| format!("Failed to save draft to {}", path.display()))?;
        info!("Saved draft for PR #{} to {}", number, path.display());
        Ok(path)
    }

    pub fn load(&self, number: u64) -> Result<String> {
        let path = self.path(number);
        std::fs::read_to_string(&path).with_context(|| {
            format!(
                "No saved review for PR #{} at {}",
                number,
                path.display()
            )
        })
    }

    pub fn remove(&self, number: u64) -> Result<()> {
        remove_if_exists(&self.path(number))
    }
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}
