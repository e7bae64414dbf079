//! GitHub API client for pull request reviews
//!
//! This crate provides a trait-based GitHub API client covering what a
//! review round trip needs: the pull request, its reviews, conversation
//! comments and line comments, plus creating reviews and thread replies.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              GitHubClient trait                  │
//! │  - fetch_pull_request() / fetch_reviews()        │
//! │  - fetch_issue_comments()                        │
//! │  - fetch_review_comments()                       │
//! │  - create_review() / reply_to_review_comment()   │
//! └─────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!             ┌─────────────────────┐
//!             │   OctocrabClient    │
//!             │   (direct API)      │
//!             └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_client::{build_client, GitHubClient, TokenResolver};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let token = TokenResolver::new().get_token(None).await?;
//! let client = build_client(None, token)?;
//!
//! let pr = client.fetch_pull_request("rust-lang", "rust", 1234).await?;
//! println!("{} by {}", pr.title, pr.author);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod octocrab_client;
pub mod types;

/// Default GitHub host (public GitHub)
pub const DEFAULT_HOST: &str = "github.com";

pub use auth::{build_client, read_token_file, TokenResolver};
pub use client::GitHubClient;
pub use octocrab_client::OctocrabClient;
pub use types::{
    IssueComment, NewReview, NewReviewComment, PullRequest, Review, ReviewComment, ReviewEvent,
    ReviewState,
};
