//! # gh-review-template
//!
//! The text round trip behind `gh-review`: a pull request diff and its
//! existing comments are rendered into a plain-text template, the reviewer
//! edits it in any editor, and the edited text is parsed back into line
//! comments addressed the way GitHub addresses them.
//!
//! ## Design Principles
//!
//! This crate does no I/O. It is handed the diff text, the discussion and
//! the existing comments, and hands back strings and [`ReviewRequest`]s.
//! Encoder and decoder share one line classifier ([`classify`]) and one
//! position counter ([`DiffCursor`]), so a line gets the same position on
//! the way out as on the way back in.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gh_review_template::{parse_template, render_template, TemplateInput};
//!
//! let document = render_template(&TemplateInput {
//!     change: &summary,
//!     discussion: &entries,
//!     diff_stat: &stat,
//!     diff: &diff,
//!     comments: &index,
//! });
//!
//! // ... the reviewer edits the document ...
//!
//! let request = parse_template(&edited)?;
//! for comment in &request.comments {
//!     println!("{}:{} {}", comment.path, comment.position, comment.body);
//! }
//! ```

pub mod cursor;
pub mod decoder;
pub mod encoder;
pub mod index;
pub mod marker;
pub mod model;
pub mod wrap;

// Re-export commonly used types
pub use cursor::{Anchor, DiffCursor};
pub use decoder::{parse_template, DecodeError};
pub use encoder::{render_template, write_template, TemplateInput};
pub use index::CommentIndex;
pub use marker::{
    classify, header_path, LineTag, INLINE_END_MARKER, INLINE_START_MARKER, NEUTRAL_REVISION,
    TOP_LEVEL_END_MARKER, TOP_LEVEL_START_MARKER,
};
pub use model::{
    sort_chronologically, ChangeSummary, DraftComment, ExistingComment, ReviewOutcome,
    ReviewRequest, ReviewState, TopLevelEntry, TIME_FORMAT,
};
pub use wrap::{wrap, WRAP_WIDTH};
