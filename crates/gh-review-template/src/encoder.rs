//! Render the review template.
//!
//! The template is laid out like `git show` output so editors highlight it
//! as a diff:
//!
//! ```text
//! commit 0000000000000000000000000000000000000000   <- neutral header
//! Author/Date/Title/State/URL, diff stat, discussion
//! top-level comment markers
//! commit <sha> ... diff --git ... @@ ...            <- raw diff
//! ***...v                                           <- existing comments
//! * Comment by @login (2024-01-15 10:30:00) thread 12
//! *	body
//! ***...^
//! ```

use crate::cursor::DiffCursor;
use crate::index::CommentIndex;
use crate::marker::{
    INLINE_END_MARKER, INLINE_START_MARKER, NEUTRAL_REVISION, TOP_LEVEL_END_MARKER,
    TOP_LEVEL_START_MARKER,
};
use crate::model::{ChangeSummary, ExistingComment, TopLevelEntry, TIME_FORMAT};
use crate::wrap::wrap;
use chrono::{DateTime, Utc};
use std::fmt::{self, Write};

/// Discussion bodies containing this marker are bot boilerplate.
const BOILERPLATE_MARKERS: &[&str] = &["<!-- Reviewable:start -->"];

/// Everything the template is rendered from.
#[derive(Debug, Clone, Copy)]
pub struct TemplateInput<'a> {
    pub change: &'a ChangeSummary,
    /// Reviews and discussion comments, oldest first
    pub discussion: &'a [TopLevelEntry],
    /// Output of `git diff --stat`
    pub diff_stat: &'a str,
    /// Output of `git show` over the change's commits
    pub diff: &'a str,
    pub comments: &'a CommentIndex,
}

/// Render the complete template.
pub fn render_template(input: &TemplateInput<'_>) -> String {
    let mut out = String::with_capacity(input.diff.len() * 2 + 4096);
    // Writing into a String cannot fail.
    let _ = write_template(&mut out, input);
    out
}

/// Render the complete template into any `fmt::Write` sink.
pub fn write_template<W: Write>(out: &mut W, input: &TemplateInput<'_>) -> fmt::Result {
    write_header(out, input.change, input.diff_stat)?;
    write_discussion(out, input.discussion)?;
    write_instructions(out)?;
    write_annotated_diff(out, input.diff, input.comments)
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIME_FORMAT).to_string()
}

fn write_header<W: Write>(out: &mut W, change: &ChangeSummary, diff_stat: &str) -> fmt::Result {
    writeln!(out, "commit {}", NEUTRAL_REVISION)?;
    writeln!(out, "Author: {} <>", change.author)?;
    writeln!(out, "Date:   {}", timestamp(&change.created_at))?;
    writeln!(out, "Title:  {}", change.title)?;
    writeln!(out, "State:  {}", change.state)?;
    if let Some(merged_at) = &change.merged_at {
        writeln!(out, "Merged: {}", timestamp(merged_at))?;
    }
    if let Some(closed_at) = &change.closed_at {
        writeln!(out, "Closed: {}", timestamp(closed_at))?;
    }
    writeln!(out, "URL:    {}", change.html_url)?;
    writeln!(out)?;

    out.write_str(diff_stat)?;
    if !diff_stat.is_empty() && !diff_stat.ends_with('\n') {
        writeln!(out)?;
    }

    writeln!(
        out,
        "\nCreated by {} ({})",
        change.author,
        timestamp(&change.created_at)
    )?;
    if let Some(body) = change.body.as_deref().map(str::trim) {
        if !body.is_empty() {
            writeln!(out, "\n\t{}", wrap(body, "\t"))?;
        }
    }
    Ok(())
}

fn is_boilerplate(body: &str) -> bool {
    BOILERPLATE_MARKERS.iter().any(|marker| body.contains(marker))
}

fn write_discussion<W: Write>(out: &mut W, discussion: &[TopLevelEntry]) -> fmt::Result {
    for entry in discussion {
        let body = entry.body.trim();
        if body.is_empty() || is_boilerplate(body) {
            continue;
        }
        writeln!(
            out,
            "\n{} by {} ({})",
            entry.action_label(),
            entry.author,
            timestamp(&entry.created_at)
        )?;
        writeln!(out, "\n\t{}", wrap(body, "\t"))?;
    }
    Ok(())
}

fn write_instructions<W: Write>(out: &mut W) -> fmt::Result {
    write!(
        out,
        "

# Add top-level review comments by typing between the marker lines below.
# Don't modify the markers!

{}
{}

# Add ordinary review comments by typing on a new line below the line of the
# diff you'd like to comment on. Comments may not begin with the special
# characters <space>, +, -, \\, <tab> or *, nor with @@.
#
# Keep the diff lines as they are. An editor that strips trailing whitespace
# turns empty context lines into blank lines and shifts every comment below
# them in that file.
#
# Pre-existing comments are prefixed with *. Type directly below a block of
# them to reply to that thread.

",
        TOP_LEVEL_START_MARKER, TOP_LEVEL_END_MARKER
    )
}

fn write_annotated_diff<W: Write>(out: &mut W, diff: &str, comments: &CommentIndex) -> fmt::Result {
    let mut cursor = DiffCursor::new();
    for line in diff.lines() {
        writeln!(out, "{}", line)?;
        if !cursor.step(line).is_positioned() {
            continue;
        }
        if let Some(anchor) = cursor.anchor() {
            let existing = comments.get(anchor.revision, anchor.path, anchor.position);
            if !existing.is_empty() {
                write_inline_block(out, existing)?;
            }
        }
    }
    Ok(())
}

fn write_inline_block<W: Write>(out: &mut W, comments: &[ExistingComment]) -> fmt::Result {
    writeln!(out, "{}", INLINE_START_MARKER)?;
    for comment in comments {
        write!(
            out,
            "* Comment by @{} ({})",
            comment.author,
            timestamp(&comment.created_at)
        )?;
        if comment.is_thread_root() {
            write!(out, " thread {}", comment.id)?;
        }
        writeln!(out)?;
        writeln!(out, "*\t{}", wrap(comment.body.trim_end(), "*\t"))?;
    }
    writeln!(out, "{}", INLINE_END_MARKER)
}
