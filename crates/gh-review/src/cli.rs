//! Command line arguments

use clap::{ArgAction, Parser};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Review a GitHub pull request by editing a text file.
///
/// The pull request's commits, discussion and existing line comments are
/// written to a temporary file and opened in your editor. Type comments
/// below the diff lines they refer to, save, and pick how to submit.
#[derive(Parser, Debug)]
#[command(name = "gh-review", version)]
pub struct Cli {
    /// Repository as owner/repo. Falls back to `repository` in the config file.
    #[arg(short = 'p', long = "project", value_name = "OWNER/REPO")]
    pub project: Option<RepoSlug>,

    /// GitHub Enterprise host (default: github.com)
    #[arg(long)]
    pub host: Option<String>,

    /// Read the API token from this file instead of ~/.github-issue-token.
    /// It must not be readable by others.
    #[arg(long, value_name = "FILE")]
    pub token: Option<PathBuf>,

    /// Continue a review saved earlier with `s` instead of starting fresh
    #[arg(long)]
    pub resume: bool,

    /// Log more to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Pull request number
    pub number: u64,
}

/// An `owner/repo` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl FromStr for RepoSlug {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.trim_end_matches(".git").to_string(),
                })
            }
            _ => Err(format!("expected owner/repo, got '{}'", s)),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from([
            "gh-review",
            "-p",
            "acme/widgets",
            "--resume",
            "-vv",
            "42",
        ])
        .unwrap();
        assert_eq!(cli.number, 42);
        assert_eq!(cli.project.unwrap().to_string(), "acme/widgets");
        assert!(cli.resume);
        assert_eq!(cli.verbose, 2);
        assert!(cli.token.is_none());
    }

    #[test]
    fn test_repo_slug() {
        assert_eq!(
            "acme/widgets.git".parse::<RepoSlug>().unwrap(),
            RepoSlug {
                owner: "acme".to_string(),
                repo: "widgets".to_string()
            }
        );
        assert!("acme".parse::<RepoSlug>().is_err());
        assert!("acme/".parse::<RepoSlug>().is_err());
        assert!("a/b/c".parse::<RepoSlug>().is_err());
    }
}
