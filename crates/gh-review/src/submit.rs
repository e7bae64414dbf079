//! Turning a decoded review into GitHub API calls

use anyhow::{Context, Result};
use gh_client::{GitHubClient, NewReview, NewReviewComment, ReviewEvent};
use gh_review_template::{ReviewOutcome, ReviewRequest};
use log::info;

/// What gets sent: the review itself plus replies posted to existing threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub review: NewReview,
    /// `(thread id, body)`
    pub replies: Vec<(u64, String)>,
}

fn review_event(outcome: ReviewOutcome) -> Option<ReviewEvent> {
    match outcome {
        ReviewOutcome::Comment => Some(ReviewEvent::Comment),
        ReviewOutcome::Approve => Some(ReviewEvent::Approve),
        ReviewOutcome::RequestChanges => Some(ReviewEvent::RequestChanges),
        ReviewOutcome::Pending => None,
    }
}

fn signed(body: Option<&str>, signature: &str) -> Option<String> {
    match (body, signature.is_empty()) {
        (Some(body), true) => Some(body.to_string()),
        (Some(body), false) => Some(format!("{}\n\n{}", body, signature)),
        (None, false) => Some(signature.to_string()),
        (None, true) => None,
    }
}

/// Build the API request for a decoded review.
///
/// `fallback_commit` is used when the document carried no commit header.
/// Replies to existing threads go through the replies endpoint, except for
/// pending reviews where they stay positioned comments of the draft.
pub fn build_review(request: &ReviewRequest, signature: &str, fallback_commit: &str) -> Submission {
    let outcome = request.outcome.unwrap_or(ReviewOutcome::Comment);
    let pending = outcome == ReviewOutcome::Pending;

    let mut comments = Vec::new();
    let mut replies = Vec::new();
    for comment in &request.comments {
        match comment.in_reply_to {
            Some(thread) if !pending => replies.push((thread, comment.body.clone())),
            _ => comments.push(NewReviewComment {
                path: comment.path.clone(),
                position: comment.position,
                body: comment.body.clone(),
            }),
        }
    }

    Submission {
        review: NewReview {
            commit_id: Some(
                request
                    .commit_id
                    .clone()
                    .unwrap_or_else(|| fallback_commit.to_string()),
            ),
            body: signed(request.body.as_deref(), signature),
            event: review_event(outcome),
            comments,
        },
        replies,
    }
}

/// Create the review, then post thread replies. Returns the review ID.
pub async fn post_review(
    client: &dyn GitHubClient,
    owner: &str,
    repo: &str,
    number: u64,
    submission: &Submission,
) -> Result<u64> {
    info!(
        "Submitting {} comments and {} replies...",
        submission.review.comments.len(),
        submission.replies.len()
    );

    let review_id = client
        .create_review(owner, repo, number, &submission.review)
        .await?;

    for (thread, body) in &submission.replies {
        client
            .reply_to_review_comment(owner, repo, number, *thread, body)
            .await
            .with_context(|| format!("Review {} was created, but replying failed", review_id))?;
    }

    info!("Submitted review {} on PR #{}", review_id, number);
    Ok(review_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gather::tests::MockClient;
    use gh_review_template::DraftComment;
    use pretty_assertions::assert_eq;

    const SIGNATURE: &str = "<!-- review by gh-review -->";

    fn request(outcome: ReviewOutcome) -> ReviewRequest {
        ReviewRequest {
            commit_id: Some("abc1234".to_string()),
            body: Some("Thanks!".to_string()),
            comments: vec![
                DraftComment::new("a.txt", 2, "nice"),
                DraftComment {
                    in_reply_to: Some(7),
                    ..DraftComment::new("a.txt", 5, "agreed")
                },
            ],
            outcome: Some(outcome),
        }
    }

    #[test]
    fn test_approve_splits_replies() {
        let submission = build_review(&request(ReviewOutcome::Approve), SIGNATURE, "fff");

        assert_eq!(
            submission,
            Submission {
                review: NewReview {
                    commit_id: Some("abc1234".to_string()),
                    body: Some("Thanks!\n\n<!-- review by gh-review -->".to_string()),
                    event: Some(ReviewEvent::Approve),
                    comments: vec![NewReviewComment {
                        path: "a.txt".to_string(),
                        position: 2,
                        body: "nice".to_string(),
                    }],
                },
                replies: vec![(7, "agreed".to_string())],
            }
        );
    }

    #[test]
    fn test_pending_keeps_replies_positioned() {
        let submission = build_review(&request(ReviewOutcome::Pending), "", "fff");

        assert_eq!(submission.review.event, None);
        assert_eq!(submission.review.body.as_deref(), Some("Thanks!"));
        assert_eq!(submission.review.comments.len(), 2);
        assert!(submission.replies.is_empty());
    }

    #[test]
    fn test_empty_request_still_builds() {
        let submission = build_review(&ReviewRequest::default(), SIGNATURE, "fff");

        assert_eq!(submission.review.commit_id.as_deref(), Some("fff"));
        assert_eq!(submission.review.body.as_deref(), Some(SIGNATURE));
        assert_eq!(submission.review.event, Some(ReviewEvent::Comment));
        assert!(submission.review.comments.is_empty());
    }

    #[tokio::test]
    async fn test_post_review_then_replies() {
        let client = MockClient::default();
        let submission = build_review(&request(ReviewOutcome::Comment), SIGNATURE, "fff");

        let id = post_review(&client, "acme", "widgets", 42, &submission)
            .await
            .unwrap();

        assert_eq!(id, 500);
        assert_eq!(
            *client.calls.lock().unwrap(),
            [
                "create review 42 with 1 comments".to_string(),
                "reply 7 agreed".to_string()
            ]
        );
    }
}
