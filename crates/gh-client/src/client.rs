//! GitHub client trait definition
//!
//! This module defines the core `GitHubClient` trait that all client
//! implementations must satisfy.

use crate::types::{IssueComment, NewReview, PullRequest, Review, ReviewComment};
use async_trait::async_trait;

/// GitHub API client trait
///
/// Defines the part of the GitHub API a review needs: reading a pull
/// request with its discussion and line comments, and posting a review.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::{GitHubClient, ReviewComment};
///
/// async fn threads(client: &dyn GitHubClient) -> anyhow::Result<Vec<ReviewComment>> {
///     let comments = client.fetch_review_comments("rust-lang", "rust", 1234).await?;
///     Ok(comments.into_iter().filter(|c| c.in_reply_to_id.is_none()).collect())
/// }
/// ```
#[async_trait]
pub trait GitHubClient: Send + Sync {
    /// Fetch a single pull request by number
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `pr_number` - Pull request number
    async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequest>;

    /// Fetch all reviews of a pull request, including the caller's pending one
    async fn fetch_reviews(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<Review>>;

    /// Fetch the general conversation comments of a pull request
    async fn fetch_issue_comments(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<IssueComment>>;

    /// Fetch review comments for a pull request
    ///
    /// Returns all review comments (line comments) on a PR, outdated ones
    /// included.
    async fn fetch_review_comments(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<ReviewComment>>;

    /// Create a review on a pull request
    ///
    /// # Returns
    ///
    /// The ID of the created review
    async fn create_review(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        review: &NewReview,
    ) -> anyhow::Result<u64>;

    /// Reply to an existing review comment thread
    ///
    /// # Arguments
    ///
    /// * `comment_id` - ID of the thread's first comment
    /// * `body` - Reply text
    ///
    /// # Returns
    ///
    /// The GitHub comment ID of the reply
    async fn reply_to_review_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        comment_id: u64,
        body: &str,
    ) -> anyhow::Result<u64>;
}
