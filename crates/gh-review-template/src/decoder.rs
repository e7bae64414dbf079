//! Parse an edited review template back into a [`ReviewRequest`].

use crate::cursor::DiffCursor;
use crate::marker::{classify, LineTag, NEUTRAL_REVISION};
use crate::model::{DraftComment, ReviewRequest};
use thiserror::Error;

/// Structural problems in an edited template. Line numbers are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("line {line}: top-level comment region is never closed")]
    UnterminatedTopLevel { line: usize },

    #[error("line {line}: end of top-level comments without a start marker")]
    UnexpectedTopLevelEnd { line: usize },

    #[error("line {line}: second top-level comment region (first opened on line {first})")]
    DuplicateTopLevel { line: usize, first: usize },

    #[error("line {line}: comment block is never closed")]
    UnterminatedInline { line: usize },

    #[error("line {line}: end of comment block without a start marker")]
    UnexpectedInlineEnd { line: usize },

    #[error("line {line}: comment block opened inside the block started on line {open}")]
    NestedInline { line: usize, open: usize },

    #[error("line {line}: comments cannot be placed directly under the first hunk header")]
    UnanchoredComment { line: usize },
}

/// Parse an edited template.
///
/// New text typed below a diff line becomes a [`DraftComment`] at that
/// line's position. Text between the top-level markers becomes the review
/// body. Everything else (header, discussion, existing comments) is ignored.
pub fn parse_template(document: &str) -> Result<ReviewRequest, DecodeError> {
    let mut decoder = Decoder::default();
    for (index, line) in document.lines().enumerate() {
        decoder.feed(index + 1, line)?;
    }
    decoder.finish()
}

#[derive(Debug, Default)]
enum TopLevel<'d> {
    #[default]
    NotSeen,
    Open {
        start: usize,
        lines: Vec<&'d str>,
    },
    Closed {
        start: usize,
    },
}

#[derive(Debug)]
struct PendingComment {
    path: String,
    position: u32,
    body: String,
    blank_run: usize,
    in_reply_to: Option<u64>,
}

impl PendingComment {
    fn push(&mut self, text: &str) {
        for _ in 0..self.blank_run {
            self.body.push('\n');
        }
        self.blank_run = 0;
        self.body.push('\n');
        self.body.push_str(text);
    }
}

#[derive(Debug, Default)]
struct Decoder<'d> {
    cursor: DiffCursor,
    request: ReviewRequest,
    top_level: TopLevel<'d>,
    /// Line the currently open inline block started on
    inline_open: Option<usize>,
    /// Thread referenced by the currently open inline block
    block_thread: Option<u64>,
    /// Thread a comment typed on the current line would reply to
    reply_to: Option<u64>,
    pending: Option<PendingComment>,
}

impl<'d> Decoder<'d> {
    fn feed(&mut self, line_no: usize, line: &'d str) -> Result<(), DecodeError> {
        if let TopLevel::Open { start, lines } = &mut self.top_level {
            if classify(line) == LineTag::TopLevelEnd {
                let start = *start;
                self.request.body = top_level_body(lines);
                self.top_level = TopLevel::Closed { start };
            } else {
                lines.push(line);
            }
            return Ok(());
        }

        if let Some(open) = self.inline_open {
            match classify(line) {
                LineTag::InlineEnd => {
                    self.inline_open = None;
                    self.reply_to = self.block_thread.take();
                }
                LineTag::InlineStart => {
                    return Err(DecodeError::NestedInline {
                        line: line_no,
                        open,
                    })
                }
                LineTag::ThreadRef(id) => self.block_thread = Some(id),
                _ => {}
            }
            return Ok(());
        }

        let reply_to = self.reply_to.take();
        match self.cursor.step(line) {
            LineTag::Other(text) => return self.comment_text(line_no, text, reply_to),
            LineTag::Blank => {
                if let Some(pending) = &mut self.pending {
                    pending.blank_run += 1;
                }
                return Ok(());
            }
            _ => {}
        }

        self.flush();
        match classify(line) {
            LineTag::TopLevelStart => {
                if let TopLevel::Closed { start } = self.top_level {
                    return Err(DecodeError::DuplicateTopLevel {
                        line: line_no,
                        first: start,
                    });
                }
                self.top_level = TopLevel::Open {
                    start: line_no,
                    lines: Vec::new(),
                };
            }
            LineTag::TopLevelEnd => {
                return Err(DecodeError::UnexpectedTopLevelEnd { line: line_no })
            }
            LineTag::InlineStart => {
                self.inline_open = Some(line_no);
                self.block_thread = None;
            }
            LineTag::InlineEnd => return Err(DecodeError::UnexpectedInlineEnd { line: line_no }),
            LineTag::CommitHeader(id) if id != NEUTRAL_REVISION => {
                self.request.commit_id = Some(id.to_string());
            }
            _ => {}
        }
        Ok(())
    }

    fn comment_text(
        &mut self,
        line_no: usize,
        text: &str,
        reply_to: Option<u64>,
    ) -> Result<(), DecodeError> {
        if let Some(pending) = &mut self.pending {
            pending.push(text);
            return Ok(());
        }

        match self.cursor.position() {
            None => {
                log::debug!("Dropping text outside of any hunk on line {}", line_no);
                return Ok(());
            }
            Some(0) => return Err(DecodeError::UnanchoredComment { line: line_no }),
            Some(_) => {}
        }

        let Some(anchor) = self.cursor.anchor() else {
            log::debug!("Dropping text in a hunk without a file header on line {}", line_no);
            return Ok(());
        };
        self.pending = Some(PendingComment {
            path: anchor.path.to_string(),
            position: anchor.position,
            body: text.to_string(),
            blank_run: 0,
            in_reply_to: reply_to,
        });
        Ok(())
    }

    fn flush(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.request.comments.push(DraftComment {
                path: pending.path,
                position: pending.position,
                body: pending.body,
                in_reply_to: pending.in_reply_to,
            });
        }
    }

    fn finish(mut self) -> Result<ReviewRequest, DecodeError> {
        if let Some(open) = self.inline_open {
            return Err(DecodeError::UnterminatedInline { line: open });
        }
        if let TopLevel::Open { start, .. } = self.top_level {
            return Err(DecodeError::UnterminatedTopLevel { line: start });
        }
        self.flush();
        Ok(self.request)
    }
}

/// Join the region's lines, dropping blank lines around the text.
fn top_level_body(lines: &[&str]) -> Option<String> {
    let is_text = |line: &&str| !line.trim().is_empty();
    let first = lines.iter().position(is_text)?;
    let last = lines.iter().rposition(is_text)?;
    Some(lines[first..=last].join("\n"))
}
