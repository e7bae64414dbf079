//! Data carried through the template round trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp format used everywhere in the template.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Metadata shown in the template header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeSummary {
    /// Pull request number
    pub number: u64,
    pub title: String,
    /// Author's login
    pub author: String,
    /// "open" or "closed"
    pub state: String,
    /// Description written by the author
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    /// Canonical URL of the pull request
    pub html_url: String,
}

/// Outcome recorded on a previously submitted review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Pending,
    Dismissed,
}

impl ReviewState {
    /// Verb shown in the discussion header line.
    pub fn action_label(&self) -> &'static str {
        match self {
            ReviewState::Approved => "Approved",
            ReviewState::ChangesRequested => "Changes requested",
            ReviewState::Commented => "Comment",
            ReviewState::Pending => "Draft comment",
            ReviewState::Dismissed => "Dismissed review",
        }
    }
}

/// A review or a general discussion comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopLevelEntry {
    pub body: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    /// Only set for reviews
    pub state: Option<ReviewState>,
}

impl TopLevelEntry {
    pub fn action_label(&self) -> &'static str {
        self.state.map_or("Comment", |state| state.action_label())
    }
}

/// Sort discussion entries oldest first, keeping the input order for ties.
pub fn sort_chronologically(entries: &mut [TopLevelEntry]) {
    entries.sort_by_key(|entry| entry.created_at);
}

/// A line comment that already exists on the pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingComment {
    pub id: u64,
    /// Commit the comment was made against
    pub revision: String,
    pub path: String,
    /// `None` when the platform considers the comment outdated
    pub position: Option<u32>,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub body: String,
    pub in_reply_to: Option<u64>,
}

impl ExistingComment {
    /// Whether this comment starts a thread (is not a reply).
    pub fn is_thread_root(&self) -> bool {
        self.in_reply_to.is_none()
    }
}

/// A new line comment typed into the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftComment {
    pub path: String,
    pub position: u32,
    pub body: String,
    /// Thread the comment answers, when typed right after an existing block
    pub in_reply_to: Option<u64>,
}

impl DraftComment {
    pub fn new(path: impl Into<String>, position: u32, body: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            position,
            body: body.into(),
            in_reply_to: None,
        }
    }
}

/// How the review is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewOutcome {
    /// Submit with comments only
    Comment,
    Approve,
    RequestChanges,
    /// Leave the review pending on the platform
    Pending,
}

impl ReviewOutcome {
    /// Review event string for the GitHub API; pending reviews send none.
    pub fn as_github_str(&self) -> Option<&'static str> {
        match self {
            ReviewOutcome::Comment => Some("COMMENT"),
            ReviewOutcome::Approve => Some("APPROVE"),
            ReviewOutcome::RequestChanges => Some("REQUEST_CHANGES"),
            ReviewOutcome::Pending => None,
        }
    }
}

/// Everything decoded from an edited template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRequest {
    /// Last real commit header seen in the document
    pub commit_id: Option<String>,
    /// Top-level review comment
    pub body: Option<String>,
    pub comments: Vec<DraftComment>,
    pub outcome: Option<ReviewOutcome>,
}

impl fmt::Display for ReviewRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(commit) = &self.commit_id {
            writeln!(f, "Commit: {}", commit)?;
        }
        match &self.body {
            Some(body) => {
                writeln!(f, "Review comment:")?;
                for line in body.lines() {
                    writeln!(f, "\t{}", line)?;
                }
            }
            None => writeln!(f, "Review comment: (none)")?,
        }
        writeln!(f, "Line comments: {}", self.comments.len())?;
        for comment in &self.comments {
            write!(f, "  {}:{}", comment.path, comment.position)?;
            if let Some(thread) = comment.in_reply_to {
                write!(f, " (reply to thread {})", thread)?;
            }
            writeln!(f)?;
            for line in comment.body.lines() {
                writeln!(f, "\t{}", line)?;
            }
        }
        Ok(())
    }
}
