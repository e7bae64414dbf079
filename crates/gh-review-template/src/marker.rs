//! Line classification shared by the template encoder and decoder.
//!
//! Every line of a review template (or of raw `git show` output) is mapped
//! to exactly one [`LineTag`]. The classifier here is purely lexical; the
//! [`DiffCursor`](crate::DiffCursor) refines tags that depend on whether a
//! hunk is currently open.

use regex::Regex;
use std::sync::OnceLock;

/// Revision id written into the first template line.
///
/// The line only exists to keep editors from detecting the file as a git
/// commit message. It never becomes the commit id of a review.
pub const NEUTRAL_REVISION: &str = "0000000000000000000000000000000000000000";

/// Opens the editable top-level review comment region.
pub const TOP_LEVEL_START_MARKER: &str = "# ------ BEGIN  TOP-LEVEL REVIEW COMMENTS ----- #";

/// Closes the editable top-level review comment region.
pub const TOP_LEVEL_END_MARKER: &str = "# ------ END OF TOP-LEVEL REVIEW COMMENTS ----- #";

/// Opens a block of pre-existing inline comments.
pub const INLINE_START_MARKER: &str =
    "*******************************************************************************v";

/// Closes a block of pre-existing inline comments.
pub const INLINE_END_MARKER: &str =
    "*******************************************************************************^";

/// Classification of a single template line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTag<'a> {
    TopLevelStart,
    TopLevelEnd,
    InlineStart,
    InlineEnd,
    /// `* Comment by @login (timestamp) thread <id>` inside an inline block.
    ThreadRef(u64),
    /// `commit <sha>`
    CommitHeader(&'a str),
    /// `diff --git a/... b/...`
    DiffStart,
    /// `--- a/<path>` as git printed it; `None` for `/dev/null`.
    /// [`header_path`] turns it into a repository path.
    OldFileHeader(Option<&'a str>),
    /// `+++ b/<path>` as git printed it; `None` for `/dev/null`.
    FileHeader(Option<&'a str>),
    /// `@@ -a,b +c,d @@`
    Hunk,
    /// Context, addition, deletion or `\ No newline at end of file`.
    DiffBody,
    /// Echo of a pre-existing comment (leading `*` or tab).
    Echo,
    Blank,
    /// Anything else, typically text typed by the reviewer.
    Other(&'a str),
}

impl LineTag<'_> {
    /// Whether the line occupies a diff position once a hunk is open.
    pub fn is_positioned(&self) -> bool {
        matches!(self, LineTag::Hunk | LineTag::DiffBody)
    }
}

fn commit_regex() -> &'static Regex {
    static COMMIT_REGEX: OnceLock<Regex> = OnceLock::new();
    COMMIT_REGEX.get_or_init(|| Regex::new(r"^commit ([0-9a-f]{7,64})$").unwrap())
}

fn thread_regex() -> &'static Regex {
    static THREAD_REGEX: OnceLock<Regex> = OnceLock::new();
    THREAD_REGEX
        .get_or_init(|| Regex::new(r"^\* Comment by @\S+ \([^)]+\) thread (\d+)$").unwrap())
}

/// Classify one line (without its trailing newline).
pub fn classify(line: &str) -> LineTag<'_> {
    match line {
        TOP_LEVEL_START_MARKER => return LineTag::TopLevelStart,
        TOP_LEVEL_END_MARKER => return LineTag::TopLevelEnd,
        INLINE_START_MARKER => return LineTag::InlineStart,
        INLINE_END_MARKER => return LineTag::InlineEnd,
        "" => return LineTag::Blank,
        _ => {}
    }

    if let Some(captures) = thread_regex().captures(line) {
        return match captures[1].parse() {
            Ok(id) => LineTag::ThreadRef(id),
            Err(_) => LineTag::Echo,
        };
    }

    if let Some(captures) = commit_regex().captures(line) {
        if let Some(id) = captures.get(1) {
            return LineTag::CommitHeader(id.as_str());
        }
    }

    if line.starts_with("diff --git ") {
        return LineTag::DiffStart;
    }
    if let Some(path) = line.strip_prefix("--- ") {
        return LineTag::OldFileHeader(raw_header_path(path));
    }
    if let Some(path) = line.strip_prefix("+++ ") {
        return LineTag::FileHeader(raw_header_path(path));
    }
    if line.starts_with("@@") {
        return LineTag::Hunk;
    }

    match line.as_bytes()[0] {
        b'+' | b'-' | b' ' | b'\\' => LineTag::DiffBody,
        b'*' | b'\t' => LineTag::Echo,
        _ => LineTag::Other(line),
    }
}

fn raw_header_path(path: &str) -> Option<&str> {
    let path = path.trim_end();
    (path != "/dev/null").then_some(path)
}

/// Repository path of a `---`/`+++` header as printed by git.
///
/// Paths git had to quote (`"b/caf\303\251.txt"`) are unquoted first, then
/// the `a/` or `b/` prefix is removed.
pub fn header_path(raw: &str, prefix: &str) -> String {
    let path = match raw
        .strip_prefix('"')
        .and_then(|quoted| quoted.strip_suffix('"'))
    {
        Some(quoted) => unquote(quoted),
        None => raw.to_string(),
    };
    match path.strip_prefix(prefix) {
        Some(stripped) => stripped.to_string(),
        None => path,
    }
}

/// Undo git's C-style path quoting: octal byte escapes plus the usual
/// backslash escapes.
fn unquote(quoted: &str) -> String {
    let mut bytes = Vec::with_capacity(quoted.len());
    let mut input = quoted.bytes().peekable();

    while let Some(byte) = input.next() {
        if byte != b'\\' {
            bytes.push(byte);
            continue;
        }
        match input.next() {
            Some(digit @ b'0'..=b'7') => {
                let mut value = u32::from(digit - b'0');
                for _ in 0..2 {
                    match input.peek() {
                        Some(&next @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(next - b'0');
                            input.next();
                        }
                        _ => break,
                    }
                }
                bytes.push(u8::try_from(value).unwrap_or(u8::MAX));
            }
            Some(b'a') => bytes.push(0x07),
            Some(b'b') => bytes.push(0x08),
            Some(b'f') => bytes.push(0x0c),
            Some(b'n') => bytes.push(b'\n'),
            Some(b'r') => bytes.push(b'\r'),
            Some(b't') => bytes.push(b'\t'),
            Some(b'v') => bytes.push(0x0b),
            // `\"` and `\\`
            Some(other) => bytes.push(other),
            None => bytes.push(b'\\'),
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_are_recognised_before_echoes() {
        assert_eq!(classify(INLINE_START_MARKER), LineTag::InlineStart);
        assert_eq!(classify(INLINE_END_MARKER), LineTag::InlineEnd);
        assert_eq!(classify(TOP_LEVEL_START_MARKER), LineTag::TopLevelStart);
        assert_eq!(classify(TOP_LEVEL_END_MARKER), LineTag::TopLevelEnd);
        assert_eq!(INLINE_START_MARKER.len(), 80);
    }

    #[test]
    fn test_diff_structure_lines() {
        assert_eq!(
            classify("commit 0123456789abcdef0123456789abcdef01234567"),
            LineTag::CommitHeader("0123456789abcdef0123456789abcdef01234567")
        );
        assert_eq!(classify("diff --git a/x b/x"), LineTag::DiffStart);
        assert_eq!(classify("--- a/src/x.rs"), LineTag::OldFileHeader(Some("a/src/x.rs")));
        assert_eq!(classify("+++ b/src/x.rs"), LineTag::FileHeader(Some("b/src/x.rs")));
        assert_eq!(classify("+++ /dev/null"), LineTag::FileHeader(None));
        assert_eq!(classify("@@ -1,2 +1,3 @@ fn main()"), LineTag::Hunk);
    }

    #[test]
    fn test_header_path_strips_prefix() {
        assert_eq!(header_path("b/src/x.rs", "b/"), "src/x.rs");
        assert_eq!(header_path("a/src/x.rs", "a/"), "src/x.rs");
        assert_eq!(header_path("src/x.rs", "b/"), "src/x.rs");
    }

    #[test]
    fn test_header_path_unquotes_git_quoting() {
        assert_eq!(header_path(r#""b/caf\303\251.txt""#, "b/"), "café.txt");
        assert_eq!(
            header_path(r#""a/odd \"name\" \\ with\ttab""#, "a/"),
            "odd \"name\" \\ with\ttab"
        );
        assert_eq!(
            classify(r#"+++ "b/caf\303\251.txt""#),
            LineTag::FileHeader(Some(r#""b/caf\303\251.txt""#))
        );
    }

    #[test]
    fn test_body_lines() {
        assert_eq!(classify(" context"), LineTag::DiffBody);
        assert_eq!(classify("+added"), LineTag::DiffBody);
        assert_eq!(classify("-removed"), LineTag::DiffBody);
        assert_eq!(classify("\\ No newline at end of file"), LineTag::DiffBody);
    }

    #[test]
    fn test_free_text_is_not_a_commit_header() {
        assert_eq!(classify("commit often"), LineTag::Other("commit often"));
        assert_eq!(classify("looks good"), LineTag::Other("looks good"));
    }

    #[test]
    fn test_echo_and_thread_reference() {
        assert_eq!(classify("*\tsome old comment"), LineTag::Echo);
        assert_eq!(classify("\tindented discussion"), LineTag::Echo);
        assert_eq!(
            classify("* Comment by @octocat (2024-01-15 10:30:00) thread 4242"),
            LineTag::ThreadRef(4242)
        );
        assert_eq!(
            classify("* Comment by @octocat (2024-01-15 10:30:00)"),
            LineTag::Echo
        );
    }

    #[test]
    fn test_blank() {
        assert_eq!(classify(""), LineTag::Blank);
        assert!(!LineTag::Blank.is_positioned());
        assert!(LineTag::Hunk.is_positioned());
    }
}
