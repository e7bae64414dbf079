//! Lookup of existing line comments by (revision, file, position).

use crate::model::ExistingComment;
use std::collections::HashMap;

type LineComments = HashMap<u32, Vec<ExistingComment>>;
type FileComments = HashMap<String, LineComments>;

/// Existing comments keyed by revision, then file path, then diff position.
///
/// Comments sharing a key are kept oldest first.
#[derive(Debug, Clone, Default)]
pub struct CommentIndex {
    revisions: HashMap<String, FileComments>,
    len: usize,
}

impl CommentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a comment. Outdated comments (no position) are skipped and
    /// `false` is returned.
    pub fn put(&mut self, comment: ExistingComment) -> bool {
        let Some(position) = comment.position else {
            log::debug!(
                "Skipping outdated comment {} on {}",
                comment.id,
                comment.path
            );
            return false;
        };

        let line = self
            .revisions
            .entry(comment.revision.clone())
            .or_default()
            .entry(comment.path.clone())
            .or_default()
            .entry(position)
            .or_default();
        let at = line.partition_point(|existing| existing.created_at <= comment.created_at);
        line.insert(at, comment);
        self.len += 1;
        true
    }

    /// Comments at exactly this location, oldest first.
    pub fn get(&self, revision: &str, path: &str, position: u32) -> &[ExistingComment] {
        self.revisions
            .get(revision)
            .and_then(|files| files.get(path))
            .and_then(|lines| lines.get(&position))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of indexed (non-outdated) comments.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Extend<ExistingComment> for CommentIndex {
    fn extend<I: IntoIterator<Item = ExistingComment>>(&mut self, iter: I) {
        for comment in iter {
            self.put(comment);
        }
    }
}

impl FromIterator<ExistingComment> for CommentIndex {
    fn from_iter<I: IntoIterator<Item = ExistingComment>>(iter: I) -> Self {
        let mut index = CommentIndex::new();
        index.extend(iter);
        index
    }
}
