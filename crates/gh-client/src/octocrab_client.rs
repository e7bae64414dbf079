//! Octocrab-based GitHub API client
//!
//! Direct implementation of the `GitHubClient` trait using the octocrab library.
//! The pull request itself is fetched through octocrab's typed API; reviews and
//! comments go through raw routes so pagination and the `position` field stay
//! under our control.

use crate::client::GitHubClient;
use crate::types::{IssueComment, NewReview, PullRequest, Review, ReviewComment, ReviewState};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// GitHub's maximum page size for list endpoints
const PER_PAGE: u8 = 100;

/// Direct GitHub API client using octocrab
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }

    /// GET every page of a list endpoint until a short page comes back.
    async fn get_all<T>(&self, route: &str) -> anyhow::Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let params = PageParams {
                per_page: PER_PAGE,
                page,
            };
            let batch: Vec<T> = self
                .octocrab
                .get(route, Some(&params))
                .await
                .with_context(|| format!("Failed to fetch {} (page {})", route, page))?;

            let is_last = batch.len() < PER_PAGE as usize;
            items.extend(batch);
            if is_last {
                break;
            }
            page += 1;
        }

        debug!("Fetched {} items from {}", items.len(), route);
        Ok(items)
    }
}

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

// Wire shapes of the raw endpoints. Only the fields we read are declared.

#[derive(Debug, Deserialize)]
struct WireUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct WireReview {
    id: u64,
    user: Option<WireUser>,
    body: Option<String>,
    state: ReviewState,
    submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct WireIssueComment {
    id: u64,
    user: Option<WireUser>,
    body: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct WireReviewComment {
    id: u64,
    user: Option<WireUser>,
    body: String,
    commit_id: String,
    path: String,
    position: Option<u32>,
    created_at: DateTime<Utc>,
    in_reply_to_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct WireCreated {
    id: u64,
}

#[derive(Serialize)]
struct ReplyBody<'a> {
    body: &'a str,
}

#[async_trait]
impl GitHubClient for OctocrabClient {
    async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequest> {
        debug!("Fetching PR #{} for {}/{}", pr_number, owner, repo);

        let pr = self
            .octocrab
            .pulls(owner, repo)
            .get(pr_number)
            .await
            .with_context(|| format!("Failed to fetch PR #{}", pr_number))?;

        Ok(convert_pull_request(&pr))
    }

    async fn fetch_reviews(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<Review>> {
        let route = format!("/repos/{}/{}/pulls/{}/reviews", owner, repo, pr_number);
        let reviews: Vec<WireReview> = self.get_all(&route).await?;
        Ok(reviews.into_iter().map(convert_review).collect())
    }

    async fn fetch_issue_comments(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<IssueComment>> {
        let route = format!("/repos/{}/{}/issues/{}/comments", owner, repo, pr_number);
        let comments: Vec<WireIssueComment> = self.get_all(&route).await?;
        Ok(comments.into_iter().map(convert_issue_comment).collect())
    }

    async fn fetch_review_comments(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<ReviewComment>> {
        let route = format!("/repos/{}/{}/pulls/{}/comments", owner, repo, pr_number);
        let comments: Vec<WireReviewComment> = self.get_all(&route).await?;
        Ok(comments.into_iter().map(convert_review_comment).collect())
    }

    async fn create_review(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        review: &NewReview,
    ) -> anyhow::Result<u64> {
        debug!(
            "Creating review on PR #{} with {} comments (event: {:?})",
            pr_number,
            review.comments.len(),
            review.event
        );

        let url = format!("/repos/{}/{}/pulls/{}/reviews", owner, repo, pr_number);
        let created: WireCreated = self
            .octocrab
            .post(&url, Some(review))
            .await
            .with_context(|| format!("Failed to create review on PR #{}", pr_number))?;

        Ok(created.id)
    }

    async fn reply_to_review_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        comment_id: u64,
        body: &str,
    ) -> anyhow::Result<u64> {
        debug!("Replying to thread {} on PR #{}", comment_id, pr_number);

        let url = format!(
            "/repos/{}/{}/pulls/{}/comments/{}/replies",
            owner, repo, pr_number, comment_id
        );
        let created: WireCreated = self
            .octocrab
            .post(&url, Some(&ReplyBody { body }))
            .await
            .with_context(|| format!("Failed to reply to thread {}", comment_id))?;

        Ok(created.id)
    }
}

fn login(user: Option<WireUser>) -> String {
    user.map(|u| u.login).unwrap_or_else(|| "unknown".to_string())
}

/// Convert octocrab PullRequest to our PullRequest type
fn convert_pull_request(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    use octocrab::models::IssueState;

    let state = match pr.state {
        Some(IssueState::Open) => "open",
        Some(IssueState::Closed) => "closed",
        _ => "unknown",
    };

    PullRequest {
        number: pr.number,
        title: pr.title.clone().unwrap_or_default(),
        body: pr.body.clone(),
        author: pr
            .user
            .as_ref()
            .map(|u| u.login.clone())
            .unwrap_or_else(|| "unknown".to_string()),
        state: state.to_string(),
        head_sha: pr.head.sha.clone(),
        base_sha: pr.base.sha.clone(),
        created_at: pr.created_at.unwrap_or_else(Utc::now),
        merged_at: pr.merged_at,
        closed_at: pr.closed_at,
        html_url: pr
            .html_url
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_default(),
    }
}

fn convert_review(review: WireReview) -> Review {
    Review {
        id: review.id,
        author: login(review.user),
        body: review.body.unwrap_or_default(),
        state: review.state,
        submitted_at: review.submitted_at,
    }
}

fn convert_issue_comment(comment: WireIssueComment) -> IssueComment {
    IssueComment {
        id: comment.id,
        author: login(comment.user),
        body: comment.body.unwrap_or_default(),
        created_at: comment.created_at,
    }
}

fn convert_review_comment(comment: WireReviewComment) -> ReviewComment {
    ReviewComment {
        id: comment.id,
        commit_id: comment.commit_id,
        path: comment.path,
        position: comment.position,
        body: comment.body,
        author: login(comment.user),
        created_at: comment.created_at,
        in_reply_to_id: comment.in_reply_to_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_pending_review() {
        let wire: WireReview = serde_json::from_value(serde_json::json!({
            "id": 80,
            "user": {"login": "octocat"},
            "body": null,
            "state": "PENDING",
            "commit_id": "ecdd80bb57125d7ba9641ffaa4d7d2c19d3f3091"
        }))
        .unwrap();

        let review = convert_review(wire);
        assert_eq!(review.author, "octocat");
        assert_eq!(review.body, "");
        assert_eq!(review.state, ReviewState::Pending);
        assert!(review.submitted_at.is_none());
    }

    #[test]
    fn test_convert_outdated_review_comment() {
        let wire: WireReviewComment = serde_json::from_value(serde_json::json!({
            "id": 10,
            "user": null,
            "body": "Great stuff!",
            "commit_id": "6dcb09b5b57875f334f61aebed695e2e4193db5e",
            "original_commit_id": "9c48853fa3dc5c1c3d6f1f1cd1f2743e72652840",
            "path": "file1.txt",
            "position": null,
            "original_position": 4,
            "created_at": "2011-04-14T16:00:49Z",
            "in_reply_to_id": 8
        }))
        .unwrap();

        let comment = convert_review_comment(wire);
        assert_eq!(comment.author, "unknown");
        assert_eq!(comment.position, None);
        assert_eq!(comment.in_reply_to_id, Some(8));
        assert_eq!(comment.commit_id, "6dcb09b5b57875f334f61aebed695e2e4193db5e");
    }

    #[test]
    fn test_convert_issue_comment_without_body() {
        let wire: WireIssueComment = serde_json::from_value(serde_json::json!({
            "id": 1,
            "user": {"login": "hubot"},
            "created_at": "2011-04-14T16:00:49Z"
        }))
        .unwrap();

        let comment = convert_issue_comment(wire);
        assert_eq!(comment.author, "hubot");
        assert_eq!(comment.body, "");
    }
}
