//! Concurrent collection of everything the template is rendered from
//!
//! ```text
//! fetch PR ──┐
//!            ├─► git show ──┐
//! git fetch ─┘   git diff ──┤
//! fetch reviews ────────────┤
//! fetch issue comments ─────┼─► ReviewData
//! fetch review comments ────┘
//! ```

use crate::convert;
use crate::git::DiffSource;
use anyhow::Result;
use gh_client::{GitHubClient, PullRequest};
use gh_review_template::{
    render_template, ChangeSummary, CommentIndex, TemplateInput, TopLevelEntry,
};
use log::info;
use std::future::Future;
use std::time::Instant;

/// The pull request a review is for.
#[derive(Debug, Clone)]
pub struct ReviewTarget<'a> {
    pub owner: &'a str,
    pub repo: &'a str,
    pub number: u64,
    /// URL git fetches the pull ref from
    pub remote: &'a str,
    pub base_branch: &'a str,
}

/// Everything fetched for one pull request.
#[derive(Debug)]
pub struct ReviewData {
    pub pr: PullRequest,
    pub change: ChangeSummary,
    pub discussion: Vec<TopLevelEntry>,
    pub diff_stat: String,
    pub diff: String,
    pub comments: CommentIndex,
}

impl ReviewData {
    pub fn render(&self) -> String {
        render_template(&TemplateInput {
            change: &self.change,
            discussion: &self.discussion,
            diff_stat: &self.diff_stat,
            diff: &self.diff,
            comments: &self.comments,
        })
    }
}

async fn timed<T>(what: &str, task: impl Future<Output = Result<T>>) -> Result<T> {
    let start = Instant::now();
    let value = task.await?;
    info!("{} in {:?}", what, start.elapsed());
    Ok(value)
}

/// Fetch the pull request, its discussion, its line comments and the diff.
///
/// The first failure aborts the whole gather.
pub async fn gather(
    client: &dyn GitHubClient,
    git: &dyn DiffSource,
    target: &ReviewTarget<'_>,
) -> Result<ReviewData> {
    let (owner, repo, number) = (target.owner, target.repo, target.number);

    // `git show` needs both the PR's base/head SHAs and the fetched objects.
    let diff_chain = async {
        let (pr, ()) = tokio::try_join!(
            timed(
                "Fetched pull request",
                client.fetch_pull_request(owner, repo, number)
            ),
            timed(
                "Fetched refs",
                git.fetch_pull_ref(target.remote, number, target.base_branch)
            ),
        )?;
        let (diff, diff_stat) = tokio::try_join!(
            timed("Showed diffs", git.show_commits(&pr.base_sha, &pr.head_sha)),
            timed("Computed diff stat", git.diff_stat(&pr.base_sha, &pr.head_sha)),
        )?;
        Ok::<_, anyhow::Error>((pr, diff, diff_stat))
    };

    let ((pr, diff, diff_stat), reviews, issue_comments, review_comments) = tokio::try_join!(
        diff_chain,
        timed("Fetched reviews", client.fetch_reviews(owner, repo, number)),
        timed(
            "Fetched issue comments",
            client.fetch_issue_comments(owner, repo, number)
        ),
        timed(
            "Fetched review comments",
            client.fetch_review_comments(owner, repo, number)
        ),
    )?;

    let comments = convert::comment_index(review_comments);
    info!(
        "PR #{}: {} discussion entries, {} positioned comments",
        number,
        reviews.len() + issue_comments.len(),
        comments.len()
    );

    Ok(ReviewData {
        change: convert::change_summary(&pr),
        discussion: convert::discussion(reviews, issue_comments),
        diff_stat,
        diff,
        comments,
        pr,
    })
}
