//! Launching the user's editor

use anyhow::{bail, Context, Result};
use log::debug;
use std::path::Path;
use std::process::Command;

/// Characters that make an editor command need a shell (same set git uses).
const SHELL_MAGIC: &[char] = &[
    '|', '&', ';', '<', '>', '(', ')', '$', '`', '\\', '"', '\'', ' ', '\t', '\n', '*', '?', '[',
    '#', '~', '=', '%',
];

/// Something that lets the user edit a file in place.
pub trait Editor {
    fn edit(&self, path: &Path) -> Result<()>;
}

/// The editor from the config file, `$VISUAL` or `$EDITOR`, in that order.
#[derive(Debug, Clone)]
pub struct SystemEditor {
    command: String,
}

impl SystemEditor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn resolve(configured: Option<&str>) -> Self {
        let command = configured
            .map(str::to_string)
            .or_else(|| std::env::var("VISUAL").ok().filter(|v| !v.is_empty()))
            .or_else(|| std::env::var("EDITOR").ok().filter(|v| !v.is_empty()))
            .unwrap_or_else(|| "vi".to_string());
        Self::new(command)
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn build(&self, path: &Path) -> Command {
        if self.command.contains(SHELL_MAGIC) {
            // Lets commands like `emacs -nw` or `code --wait` work.
            let mut cmd = Command::new("sh");
            cmd.arg("-c")
                .arg(format!("{} \"$@\"", self.command))
                .arg(&self.command)
                .arg(path);
            cmd
        } else {
            let mut cmd = Command::new(&self.command);
            cmd.arg(path);
            cmd
        }
    }
}

impl Editor for SystemEditor {
    fn edit(&self, path: &Path) -> Result<()> {
        debug!("Opening {} with {}", path.display(), self.command);

        let status = self
            .build(path)
            .status()
            .with_context(|| format!("Failed to start editor '{}'", self.command))?;
        if !status.success() {
            bail!("Editor '{}' exited with {}", self.command, status);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_command_runs_directly() {
        let cmd = SystemEditor::new("nano").build(Path::new("/tmp/review.diff"));
        assert_eq!(cmd.get_program(), "nano");
        assert_eq!(cmd.get_args().collect::<Vec<_>>(), ["/tmp/review.diff"]);
    }

    #[test]
    fn test_command_with_arguments_goes_through_shell() {
        let cmd = SystemEditor::new("emacs -nw").build(Path::new("/tmp/review.diff"));
        assert_eq!(cmd.get_program(), "sh");
        assert_eq!(
            cmd.get_args().collect::<Vec<_>>(),
            ["-c", "emacs -nw \"$@\"", "emacs -nw", "/tmp/review.diff"]
        );
    }

    #[test]
    fn test_configured_editor_wins() {
        assert_eq!(SystemEditor::resolve(Some("hx")).command(), "hx");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_editor_is_an_error() {
        let err = SystemEditor::new("false")
            .edit(Path::new("/nonexistent"))
            .unwrap_err();
        assert!(err.to_string().contains("exited with"));
    }
}
