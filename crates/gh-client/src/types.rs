//! GitHub API data transfer objects
//!
//! These types represent the data returned from and sent to the GitHub API.
//! They are intentionally separate from the review template model to keep
//! this crate pure and reusable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pull request from the GitHub API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number (e.g., 123)
    pub number: u64,

    /// PR title
    pub title: String,

    /// PR body/description
    pub body: Option<String>,

    /// Author's GitHub username
    pub author: String,

    /// "open" or "closed"
    pub state: String,

    /// HEAD commit SHA
    pub head_sha: String,

    /// Base commit SHA the PR was opened against
    pub base_sha: String,

    /// When the PR was created
    pub created_at: DateTime<Utc>,

    pub merged_at: Option<DateTime<Utc>>,

    pub closed_at: Option<DateTime<Utc>>,

    /// PR URL for opening in browser
    pub html_url: String,
}

/// State of a submitted (or pending) review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    /// Started but not yet submitted; only visible to its author
    Pending,
    Dismissed,
}

/// A review on a pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: u64,
    /// Reviewer's GitHub username
    pub author: String,
    /// Top-level review comment, empty when the reviewer wrote none
    pub body: String,
    pub state: ReviewState,
    /// `None` while the review is pending
    pub submitted_at: Option<DateTime<Utc>>,
}

/// A general discussion comment on the pull request conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A review comment on a pull request
///
/// Represents a comment on a specific line in a PR diff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewComment {
    /// GitHub comment ID
    pub id: u64,
    /// Commit the comment's position refers to
    pub commit_id: String,
    /// File path the comment is on
    pub path: String,
    /// Position in the diff; `None` once the comment is outdated
    pub position: Option<u32>,
    /// Comment body text
    pub body: String,
    /// Author's GitHub username
    pub author: String,
    /// When the comment was created
    pub created_at: DateTime<Utc>,
    /// ID of the first comment of the thread this one replies to
    pub in_reply_to_id: Option<u64>,
}

/// Review event type for PR reviews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewEvent {
    /// Approve the PR
    Approve,
    /// Request changes
    RequestChanges,
    /// Comment only (no approval/rejection)
    Comment,
}

/// A line comment sent as part of a new review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReviewComment {
    pub path: String,
    pub position: u32,
    pub body: String,
}

/// Request body for creating a review
///
/// Leaving `event` unset creates a pending review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<ReviewEvent>,
    pub comments: Vec<NewReviewComment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_state_serde() {
        let states = vec![
            (ReviewState::Approved, "\"APPROVED\""),
            (ReviewState::ChangesRequested, "\"CHANGES_REQUESTED\""),
            (ReviewState::Commented, "\"COMMENTED\""),
            (ReviewState::Pending, "\"PENDING\""),
            (ReviewState::Dismissed, "\"DISMISSED\""),
        ];

        for (state, expected_json) in states {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, expected_json);

            let deserialized: ReviewState = serde_json::from_str(&json).unwrap();
            assert_eq!(deserialized, state);
        }
    }

    #[test]
    fn test_pending_review_body_omits_event() {
        let review = NewReview {
            commit_id: Some("abc1234".to_string()),
            body: None,
            event: None,
            comments: vec![NewReviewComment {
                path: "a.txt".to_string(),
                position: 2,
                body: "nice".to_string(),
            }],
        };

        let json = serde_json::to_value(&review).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "commit_id": "abc1234",
                "comments": [{"path": "a.txt", "position": 2, "body": "nice"}],
            })
        );
    }

    #[test]
    fn test_review_event_serde() {
        let json = serde_json::to_string(&ReviewEvent::RequestChanges).unwrap();
        assert_eq!(json, "\"REQUEST_CHANGES\"");
    }
}
