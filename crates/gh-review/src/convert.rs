//! Conversion from GitHub API types to the template model

use chrono::Utc;
use gh_client::{IssueComment, PullRequest, Review, ReviewComment};
use gh_review_template::{
    sort_chronologically, ChangeSummary, CommentIndex, ExistingComment, ReviewState,
    TopLevelEntry,
};

pub fn change_summary(pr: &PullRequest) -> ChangeSummary {
    ChangeSummary {
        number: pr.number,
        title: pr.title.clone(),
        author: pr.author.clone(),
        state: pr.state.clone(),
        body: pr.body.clone(),
        created_at: pr.created_at,
        merged_at: pr.merged_at,
        closed_at: pr.closed_at,
        html_url: pr.html_url.clone(),
    }
}

fn review_state(state: gh_client::ReviewState) -> ReviewState {
    use gh_client::ReviewState as S;
    match state {
        S::Approved => ReviewState::Approved,
        S::ChangesRequested => ReviewState::ChangesRequested,
        S::Commented => ReviewState::Commented,
        S::Pending => ReviewState::Pending,
        S::Dismissed => ReviewState::Dismissed,
    }
}

/// Reviews and conversation comments merged into one timeline, oldest first.
///
/// A pending review has no submission time yet; it sorts last.
pub fn discussion(reviews: Vec<Review>, comments: Vec<IssueComment>) -> Vec<TopLevelEntry> {
    let now = Utc::now();
    let mut entries: Vec<TopLevelEntry> = reviews
        .into_iter()
        .map(|review| TopLevelEntry {
            body: review.body,
            author: review.author,
            created_at: review.submitted_at.unwrap_or(now),
            state: Some(review_state(review.state)),
        })
        .chain(comments.into_iter().map(|comment| TopLevelEntry {
            body: comment.body,
            author: comment.author,
            created_at: comment.created_at,
            state: None,
        }))
        .collect();
    sort_chronologically(&mut entries);
    entries
}

pub fn existing_comment(comment: ReviewComment) -> ExistingComment {
    ExistingComment {
        id: comment.id,
        revision: comment.commit_id,
        path: comment.path,
        position: comment.position,
        author: comment.author,
        created_at: comment.created_at,
        body: comment.body,
        in_reply_to: comment.in_reply_to_id,
    }
}

pub fn comment_index(comments: Vec<ReviewComment>) -> CommentIndex {
    comments.into_iter().map(existing_comment).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_discussion_is_chronological_with_pending_last() {
        let reviews = vec![
            Review {
                id: 1,
                author: "carol".to_string(),
                body: "draft".to_string(),
                state: gh_client::ReviewState::Pending,
                submitted_at: None,
            },
            Review {
                id: 2,
                author: "bob".to_string(),
                body: "lgtm".to_string(),
                state: gh_client::ReviewState::Approved,
                submitted_at: Some(at(12)),
            },
        ];
        let comments = vec![IssueComment {
            id: 3,
            author: "alice".to_string(),
            body: "ping".to_string(),
            created_at: at(9),
        }];

        let entries = discussion(reviews, comments);
        let order: Vec<_> = entries
            .iter()
            .map(|e| (e.author.as_str(), e.action_label()))
            .collect();
        assert_eq!(
            order,
            [
                ("alice", "Comment"),
                ("bob", "Approved"),
                ("carol", "Draft comment")
            ]
        );
    }

    #[test]
    fn test_outdated_comments_are_not_indexed() {
        let comment = |id, position| ReviewComment {
            id,
            commit_id: "abc1234".to_string(),
            path: "a.txt".to_string(),
            position,
            body: "hm".to_string(),
            author: "bob".to_string(),
            created_at: at(10),
            in_reply_to_id: None,
        };

        let index = comment_index(vec![comment(1, Some(2)), comment(2, None)]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("abc1234", "a.txt", 2)[0].id, 1);
    }
}
