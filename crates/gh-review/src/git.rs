//! Git invocations that produce the diff text

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use log::debug;

/// `git show` format: a `commit <sha>` header per commit, the message
/// indented by four spaces, then the patch.
const SHOW_FORMAT: &str = "--pretty=format:commit %H%nAuthor: %an <%ae>%nDate:   %ad%n%n%w(0,4,4)%B";

/// Where the raw diff text comes from.
#[async_trait]
pub trait DiffSource: Send + Sync {
    /// Fetch the pull request head (and its base branch) from `remote`.
    async fn fetch_pull_ref(&self, remote: &str, number: u64, base_branch: &str) -> Result<()>;

    /// Every commit in `base..head`, oldest first, with its patch.
    async fn show_commits(&self, base: &str, head: &str) -> Result<String>;

    /// `--stat` summary of `base...head`.
    async fn diff_stat(&self, base: &str, head: &str) -> Result<String>;
}

/// Runs the real git binary in the current directory.
#[derive(Debug, Clone)]
pub struct Git {
    binary: String,
}

impl Git {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Non-ASCII paths stay unquoted in headers; the template decoder still
    /// unquotes the ones git always quotes.
    fn command(&self, args: &[&str]) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.binary);
        command.args(["-c", "core.quotepath=off"]).args(args);
        command
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        debug!("Running {} {}", self.binary, args.join(" "));

        let output = self
            .command(args)
            .output()
            .await
            .with_context(|| format!("Failed to execute '{}'. Is git installed?", self.binary))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("git {} failed: {}", args[0], stderr.trim());
        }

        String::from_utf8(output.stdout).context("git printed invalid UTF-8")
    }
}

/// Local ref the pull request head is fetched into.
pub fn review_ref(number: u64) -> String {
    format!("refs/reviews/{}", number)
}

#[async_trait]
impl DiffSource for Git {
    async fn fetch_pull_ref(&self, remote: &str, number: u64, base_branch: &str) -> Result<()> {
        let refspec = format!("refs/pull/{}/head:{}", number, review_ref(number));
        self.run(&["fetch", "-f", remote, base_branch, &refspec])
            .await
            .map(drop)
    }

    async fn show_commits(&self, base: &str, head: &str) -> Result<String> {
        let range = format!("{}..{}", base, head);
        self.run(&["show", "--no-color", "--reverse", SHOW_FORMAT, &range])
            .await
    }

    async fn diff_stat(&self, base: &str, head: &str) -> Result<String> {
        let range = format!("{}...{}", base, head);
        self.run(&["diff", "--no-color", "--stat", &range]).await
    }
}
