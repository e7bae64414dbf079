//! Word wrapping for comment bodies rendered into the template.

/// Column at which comment text is wrapped.
pub const WRAP_WIDTH: usize = 70;

/// Wrap `text` at [`WRAP_WIDTH`] characters, prefixing every line after the
/// first with `prefix`.
///
/// Lines break at the last whitespace within the limit; a line without
/// whitespace there is broken hard at the limit. Existing line breaks are
/// kept (`\r\n` is normalised to `\n`).
pub fn wrap(text: &str, prefix: &str) -> String {
    let text = text.replace("\r\n", "\n");
    let mut out = String::with_capacity(text.len() + prefix.len() * 4);

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            out.push_str(prefix);
        }
        let mut rest = line;
        while let Some((head_end, tail_start)) = split_point(rest) {
            out.push_str(rest[..head_end].trim_end());
            out.push('\n');
            out.push_str(prefix);
            rest = &rest[tail_start..];
        }
        out.push_str(rest);
    }
    out
}

/// Byte offsets where an over-long line is cut: end of the kept head and
/// start of the remainder. `None` if the line fits.
fn split_point(line: &str) -> Option<(usize, usize)> {
    let (limit, _) = line.char_indices().nth(WRAP_WIDTH)?;
    let head = &line[..limit];
    match head.rfind(char::is_whitespace) {
        Some(at) if at > 0 => {
            let width = head[at..].chars().next().map_or(1, char::len_utf8);
            Some((at, at + width))
        }
        _ => Some((limit, limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_untouched() {
        assert_eq!(wrap("short line", "\t"), "short line");
    }

    #[test]
    fn test_existing_newlines_get_prefix() {
        assert_eq!(wrap("one\r\ntwo\n\nthree", "*\t"), "one\n*\ttwo\n*\t\n*\tthree");
    }

    #[test]
    fn test_wraps_on_last_space_before_limit() {
        let words = "lorem ipsum ".repeat(10);
        let wrapped = wrap(words.trim_end(), "\t");
        for line in wrapped.lines() {
            let line = line.strip_prefix('\t').unwrap_or(line);
            assert!(line.chars().count() <= WRAP_WIDTH, "too long: {:?}", line);
            assert!(!line.ends_with(' '));
        }
        assert_eq!(wrapped.replace("\n\t", " "), words.trim_end());
    }

    #[test]
    fn test_hard_break_without_whitespace() {
        let long = "x".repeat(150);
        let wrapped = wrap(&long, "> ");
        let lines: Vec<&str> = wrapped.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), 70);
        assert_eq!(lines[1], format!("> {}", "x".repeat(70)));
        assert_eq!(lines[2], format!("> {}", "x".repeat(10)));
    }

    #[test]
    fn test_multibyte_characters() {
        let long = "é".repeat(71);
        let wrapped = wrap(&long, "");
        let lines: Vec<&str> = wrapped.lines().collect();
        assert_eq!(lines[0].chars().count(), 70);
        assert_eq!(lines[1], "é");
    }
}
