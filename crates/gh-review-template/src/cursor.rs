//! Diff position tracking.
//!
//! GitHub addresses review comments by `position`: the number of lines
//! below the first `@@` hunk header of a file. The header itself is not
//! addressable, the line right under it is position 1, and the count keeps
//! going through later hunk headers until the next file starts.

use crate::marker::{classify, header_path, LineTag};

/// Where a positioned line lives: revision, file and diff position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor<'c> {
    pub revision: &'c str,
    pub path: &'c str,
    pub position: u32,
}

/// Scan state carried from one line to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffCursor {
    revision: Option<String>,
    file: Option<String>,
    old_file: Option<String>,
    saw_first_hunk: bool,
    position: u32,
}

impl DiffCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one line and return the updated cursor with the line's tag.
    pub fn advance(mut self, line: &str) -> (Self, LineTag<'_>) {
        let tag = self.step(line);
        (self, tag)
    }

    /// In-place form of [`DiffCursor::advance`].
    pub fn step<'l>(&mut self, line: &'l str) -> LineTag<'l> {
        let tag = classify(line);
        match tag {
            LineTag::CommitHeader(id) => {
                self.revision = Some(id.to_string());
                self.file = None;
                self.old_file = None;
                self.saw_first_hunk = false;
            }
            LineTag::DiffStart => {
                self.old_file = None;
                self.saw_first_hunk = false;
            }
            // Inside a hunk these are lines whose content begins with "--" or "++".
            LineTag::OldFileHeader(_) | LineTag::FileHeader(_) if self.saw_first_hunk => {
                self.position += 1;
                return LineTag::DiffBody;
            }
            LineTag::OldFileHeader(path) => {
                self.old_file = path.map(|raw| header_path(raw, "a/"));
            }
            LineTag::FileHeader(path) => {
                // Deleted files are addressed by their old path.
                self.file = path
                    .map(|raw| header_path(raw, "b/"))
                    .or_else(|| self.old_file.clone());
            }
            LineTag::Hunk if !self.saw_first_hunk => {
                self.saw_first_hunk = true;
                self.position = 0;
            }
            LineTag::Hunk | LineTag::DiffBody if self.saw_first_hunk => {
                self.position += 1;
            }
            _ => {}
        }
        tag
    }

    /// Current position, or `None` before the first hunk of the current file.
    pub fn position(&self) -> Option<u32> {
        self.saw_first_hunk.then_some(self.position)
    }

    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// The addressable location of the last line, if it has one.
    ///
    /// Position 0 (the first hunk header) is never addressable.
    pub fn anchor(&self) -> Option<Anchor<'_>> {
        let position = self.position().filter(|p| *p > 0)?;
        Some(Anchor {
            revision: self.revision.as_deref().unwrap_or_default(),
            path: self.file.as_deref()?,
            position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_FILES: &str = "\
commit 1111111
Author: A <a@example.com>

    message
diff --git a/a.txt b/a.txt
--- a/a.txt
+++ b/a.txt
@@ -1,2 +1,3 @@
 foo
+bar
 baz
@@ -10,2 +11,2 @@
-old
+new
diff --git a/b.txt b/b.txt
--- a/b.txt
+++ b/b.txt
@@ -1 +1 @@
-x
+y
";

    fn positions(text: &str) -> Vec<Option<u32>> {
        let mut cursor = DiffCursor::new();
        text.lines()
            .map(|line| {
                cursor.step(line);
                cursor.position()
            })
            .collect()
    }

    #[test]
    fn test_positions_follow_github_numbering() {
        let got = positions(TWO_FILES);
        let expected = vec![
            None,    // commit
            None,    // Author
            None,    // blank
            None,    // message
            None,    // diff --git
            None,    // ---
            None,    // +++
            Some(0), // first @@
            Some(1), //  foo
            Some(2), // +bar
            Some(3), //  baz
            Some(4), // second @@ counts
            Some(5), // -old
            Some(6), // +new
            None,    // diff --git resets
            None,
            None,
            Some(0),
            Some(1),
            Some(2),
        ];
        assert_eq!(got, expected);
    }

    #[test]
    fn test_positions_are_deterministic() {
        assert_eq!(positions(TWO_FILES), positions(TWO_FILES));
    }

    #[test]
    fn test_advance_is_pure_over_values() {
        let (cursor, tag) = DiffCursor::new().advance("commit abcdef1");
        assert_eq!(tag, LineTag::CommitHeader("abcdef1"));
        let (cursor, _) = cursor.advance("+++ b/src/lib.rs");
        let (cursor, _) = cursor.advance("@@ -1 +1 @@");
        let (cursor, tag) = cursor.advance("+line");
        assert_eq!(tag, LineTag::DiffBody);
        assert_eq!(
            cursor.anchor(),
            Some(Anchor {
                revision: "abcdef1",
                path: "src/lib.rs",
                position: 1
            })
        );
    }

    #[test]
    fn test_commit_header_resets_even_for_same_path() {
        let text = "\
commit aaaaaaa
+++ b/f.txt
@@ -1 +1 @@
+one
+two
commit bbbbbbb
diff --git a/f.txt b/f.txt
+++ b/f.txt
 stray
@@ -1 +1 @@
+three
";
        let mut cursor = DiffCursor::new();
        let mut lines = text.lines();
        for line in lines.by_ref().take(5) {
            cursor.step(line);
        }
        assert_eq!(cursor.position(), Some(2));

        cursor.step(lines.next().unwrap());
        assert_eq!(cursor.position(), None);
        assert_eq!(cursor.file(), None);
        assert_eq!(cursor.revision(), Some("bbbbbbb"));

        for line in lines {
            cursor.step(line);
        }
        assert_eq!(cursor.position(), Some(1));
        assert_eq!(cursor.file(), Some("f.txt"));
    }

    #[test]
    fn test_header_lookalikes_inside_hunk_are_body_lines() {
        let mut cursor = DiffCursor::new();
        for line in ["+++ b/a.md", "@@ -1 +1,2 @@", "+++ b/not-a-header", "--- a/nor-this"] {
            cursor.step(line);
        }
        assert_eq!(cursor.file(), Some("a.md"));
        assert_eq!(cursor.position(), Some(2));
    }

    #[test]
    fn test_deleted_file_uses_old_path() {
        let mut cursor = DiffCursor::new();
        for line in [
            "diff --git a/gone.rs b/gone.rs",
            "--- a/gone.rs",
            "+++ /dev/null",
            "@@ -1 +0,0 @@",
            "-fn gone() {}",
        ] {
            cursor.step(line);
        }
        assert_eq!(cursor.anchor().map(|a| a.path), Some("gone.rs"));
    }

    #[test]
    fn test_quoted_paths_are_unquoted() {
        let mut cursor = DiffCursor::new();
        for line in [
            r#"diff --git "a/caf\303\251.txt" "b/caf\303\251.txt""#,
            r#"--- "a/caf\303\251.txt""#,
            r#"+++ "b/caf\303\251.txt""#,
            "@@ -1 +1 @@",
            "+x",
        ] {
            cursor.step(line);
        }
        assert_eq!(cursor.anchor().map(|a| a.path), Some("café.txt"));
    }

    #[test]
    fn test_quoted_deleted_file_uses_unquoted_old_path() {
        let mut cursor = DiffCursor::new();
        for line in [
            r#"--- "a/tab\there.txt""#,
            "+++ /dev/null",
            "@@ -1 +0,0 @@",
            "-gone",
        ] {
            cursor.step(line);
        }
        assert_eq!(cursor.anchor().map(|a| a.path), Some("tab\there.txt"));
    }

    #[test]
    fn test_first_hunk_header_is_not_addressable() {
        let mut cursor = DiffCursor::new();
        cursor.step("+++ b/a.txt");
        cursor.step("@@ -1 +1 @@");
        assert_eq!(cursor.position(), Some(0));
        assert!(cursor.anchor().is_none());
    }
}
