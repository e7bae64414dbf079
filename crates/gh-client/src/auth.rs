//! Token resolution and client construction
//!
//! Builds an authenticated octocrab instance for github.com or a GitHub
//! Enterprise host.

use crate::{OctocrabClient, DEFAULT_HOST};
use anyhow::{bail, Context, Result};
use log::{debug, info};
use octocrab::Octocrab;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Token file looked up in the home directory
pub const HOME_TOKEN_FILE: &str = ".github-issue-token";

/// Resolves GitHub tokens for different hosts
///
/// Tries multiple sources in order:
/// 1. An explicit token file (must not be readable by group or others)
/// 2. `~/.github-issue-token`, when it exists (same permission rule)
/// 3. Host-specific env var (e.g., `GITHUB_TOKEN_GHE_EXAMPLE_COM`)
/// 4. `gh auth token --hostname {host}` command
/// 5. Generic `GITHUB_TOKEN` or `GH_TOKEN` (github.com only)
#[derive(Debug, Clone)]
pub struct TokenResolver {
    /// File given with `--token`
    token_file: Option<PathBuf>,
    /// Token file read when it exists and no explicit file was given
    home_token_file: Option<PathBuf>,
    /// Cached default token from GITHUB_TOKEN/GH_TOKEN
    default_token: Option<String>,
}

impl Default for TokenResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenResolver {
    /// Create a new token resolver
    pub fn new() -> Self {
        let default_token = std::env::var("GITHUB_TOKEN")
            .or_else(|_| std::env::var("GH_TOKEN"))
            .ok();

        Self {
            token_file: None,
            home_token_file: dirs::home_dir().map(|home| home.join(HOME_TOKEN_FILE)),
            default_token,
        }
    }

    /// Read the token from this file before trying anything else
    pub fn with_token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_file = Some(path.into());
        self
    }

    /// Replace the `~/.github-issue-token` lookup; `None` disables it
    pub fn with_home_token_file(mut self, path: Option<PathBuf>) -> Self {
        self.home_token_file = path;
        self
    }

    /// Get a token for the given host
    ///
    /// # Arguments
    ///
    /// * `host` - The GitHub host (None = github.com)
    pub async fn get_token(&self, host: Option<&str>) -> Result<String> {
        let host = host.unwrap_or(DEFAULT_HOST);

        if let Some(path) = &self.token_file {
            debug!("Using token file {}", path.display());
            return read_token_file(path);
        }

        if let Some(path) = self.home_token_file.as_ref().filter(|p| p.is_file()) {
            debug!("Using token file {}", path.display());
            return read_token_file(path);
        }

        // Try host-specific env var
        let env_key = host_env_key(host);
        if let Ok(token) = std::env::var(&env_key) {
            debug!("Using token from env var {} for host {}", env_key, host);
            return Ok(token);
        }

        // Try gh CLI with hostname
        debug!("Trying gh auth token for host {}", host);
        match tokio::process::Command::new("gh")
            .args(["auth", "token", "--hostname", host])
            .output()
            .await
        {
            Ok(output) if output.status.success() => {
                let token = String::from_utf8(output.stdout)
                    .context("Invalid UTF-8 in gh auth token output")?
                    .trim()
                    .to_string();
                if !token.is_empty() {
                    debug!("Using token from gh CLI for host {}", host);
                    return Ok(token);
                }
            }
            Ok(_) => debug!("gh auth token has no token for {}", host),
            Err(e) => debug!("Could not run gh: {}", e),
        }

        // Fallback to default token (for github.com only)
        if host == DEFAULT_HOST {
            if let Some(ref token) = self.default_token {
                debug!("Using default token (GITHUB_TOKEN/GH_TOKEN) for github.com");
                return Ok(token.clone());
            }
        }

        Err(anyhow::anyhow!(
            "No token found for host '{}'. \
             Pass --token, set {} or run 'gh auth login --hostname {}'",
            host,
            env_key,
            host
        ))
    }
}

/// Env var holding the token for a specific host
fn host_env_key(host: &str) -> String {
    format!(
        "GITHUB_TOKEN_{}",
        host.replace(['.', '-'], "_").to_uppercase()
    )
}

/// Read a token file, refusing files other users could read.
pub fn read_token_file(path: &Path) -> Result<String> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mode = std::fs::metadata(path)
            .with_context(|| format!("Failed to stat token file {}", path.display()))?
            .permissions()
            .mode();
        if mode & 0o077 != 0 {
            bail!(
                "Token file {} is accessible by other users (mode {:o}); run chmod 600 on it",
                path.display(),
                mode & 0o777
            );
        }
    }

    let token = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read token file {}", path.display()))?
        .trim()
        .to_string();
    if token.is_empty() {
        bail!("Token file {} is empty", path.display());
    }
    Ok(token)
}

/// Build a client for the given host with an already resolved token
pub fn build_client(host: Option<&str>, token: String) -> Result<OctocrabClient> {
    let effective_host = host.unwrap_or(DEFAULT_HOST);
    info!("Creating GitHub client for host: {}", effective_host);

    // Build octocrab with appropriate base URI
    let mut builder = Octocrab::builder().personal_token(token);
    if effective_host != DEFAULT_HOST {
        let uri = format!("https://{}/api/v3", effective_host);
        builder = builder.base_uri(&uri).context("Failed to set base URI")?;
    }

    let octocrab = builder.build().context("Failed to build Octocrab client")?;
    Ok(OctocrabClient::new(Arc::new(octocrab)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_token_resolver_env_key_generation() {
        // Test that host names are properly converted to env var format
        let hosts = [
            ("github.com", "GITHUB_TOKEN_GITHUB_COM"),
            ("ghe.example.com", "GITHUB_TOKEN_GHE_EXAMPLE_COM"),
            (
                "github-enterprise.corp.com",
                "GITHUB_TOKEN_GITHUB_ENTERPRISE_CORP_COM",
            ),
        ];

        for (host, expected_key) in hosts {
            assert_eq!(
                host_env_key(host),
                expected_key,
                "Host '{}' should produce key '{}'",
                host,
                expected_key
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_must_be_private() {
        use std::os::unix::fs::PermissionsExt;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ghp_secret").unwrap();

        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o644)).unwrap();
        let err = read_token_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("accessible by other users"));

        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o600)).unwrap();
        assert_eq!(read_token_file(file.path()).unwrap(), "ghp_secret");
    }

    #[tokio::test]
    async fn test_token_file_takes_precedence() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "  from_file \n").unwrap();

        // NamedTempFile is created with mode 0600
        let resolver = TokenResolver::new().with_token_file(file.path());
        assert_eq!(
            resolver.get_token(Some("ghe.example.com")).await.unwrap(),
            "from_file"
        );
    }

    #[tokio::test]
    async fn test_home_token_file_is_used_when_present() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "from_home").unwrap();

        let resolver =
            TokenResolver::new().with_home_token_file(Some(file.path().to_path_buf()));
        assert_eq!(
            resolver.get_token(Some("ghe.example.com")).await.unwrap(),
            "from_home"
        );
    }

    #[tokio::test]
    async fn test_explicit_token_file_beats_home_token_file() {
        let mut home = tempfile::NamedTempFile::new().unwrap();
        writeln!(home, "from_home").unwrap();
        let mut explicit = tempfile::NamedTempFile::new().unwrap();
        writeln!(explicit, "from_flag").unwrap();

        let resolver = TokenResolver::new()
            .with_home_token_file(Some(home.path().to_path_buf()))
            .with_token_file(explicit.path());
        assert_eq!(resolver.get_token(None).await.unwrap(), "from_flag");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_home_token_file_with_loose_permissions_is_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "from_home").unwrap();
        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o640)).unwrap();

        let resolver =
            TokenResolver::new().with_home_token_file(Some(file.path().to_path_buf()));
        let err = resolver.get_token(None).await.unwrap_err();
        assert!(err.to_string().contains("accessible by other users"));
    }

    #[tokio::test]
    async fn test_build_client_for_enterprise_host() {
        assert!(build_client(Some("ghe.example.com"), "token".to_string()).is_ok());
    }
}
