//! Interpretation of string literal text.

const QUOTES: [char; 3] = ['\'', '"', '`'];

/// Strips the delimiting quotes from a string token's text and resolves
/// escapes.
///
/// In `'` and `"` strings a backslash makes the next character literal.
/// Backtick strings are taken verbatim.
pub(crate) fn unquote(raw: &str) -> String {
    let quote = match raw.chars().next() {
        Some(first) if QUOTES.contains(&first) => first,
        _ => return raw.to_string(),
    };
    let inner = match raw[quote.len_utf8()..].strip_suffix(quote) {
        Some(inner) => inner,
        None => &raw[quote.len_utf8()..],
    };

    if quote == '`' {
        return inner.to_string();
    }

    let mut text = String::with_capacity(inner.len());
    let mut escaped = false;
    for c in inner.chars() {
        if escaped {
            text.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else {
            text.push(c);
        }
    }
    text
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn leading_whitespace(line: &str) -> &str {
    let end = line
        .find(|c: char| !c.is_whitespace())
        .unwrap_or(line.len());
    &line[..end]
}

/// Removes the indentation a multi-line literal picks up from the code
/// around it.
///
/// The reference indentation is the leading whitespace of the first
/// non-blank line, or, if that line starts flush, of the first later
/// non-blank line that is indented. That exact prefix is stripped from
/// every line, then leading and trailing blank lines are dropped. Without a
/// reference only the leading blank lines are dropped. Single-line text is
/// returned unchanged.
///
/// ```text
/// `                    ->  this
///     this                 is indented
///     is indented
/// `
/// ```
pub(crate) fn dedent(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() < 2 {
        return text.to_string();
    }
    let Some(first) = lines.iter().position(|line| !is_blank(line)) else {
        return String::new();
    };

    let reference = std::iter::once(&lines[first])
        .chain(lines[first + 1..].iter().filter(|line| !is_blank(line)))
        .map(|line| leading_whitespace(line))
        .find(|prefix| !prefix.is_empty());

    let Some(prefix) = reference else {
        return lines[first..].join("\n");
    };

    let mut stripped: Vec<&str> = lines[first..]
        .iter()
        .map(|line| line.strip_prefix(prefix).unwrap_or(*line))
        .collect();
    while stripped.last().is_some_and(|line| is_blank(line)) {
        stripped.pop();
    }
    stripped.join("\n")
}

/// Splits one tag string on commas, trimming quotes and whitespace and
/// dropping empty pieces.
pub(crate) fn split_tags(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(',')
        .map(|tag| tag.trim_matches(|c: char| c.is_whitespace() || QUOTES.contains(&c)))
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'web app'"), "web app");
        assert_eq!(unquote(r#""say \"hi\"""#), r#"say "hi""#);
        assert_eq!(unquote(r#""back\\slash""#), r"back\slash");
        assert_eq!(unquote("`raw \\n text`"), "raw \\n text");
        assert_eq!(unquote("'👍'"), "👍");
        assert_eq!(unquote("''"), "");
    }

    #[test]
    fn test_dedent_heredoc() {
        let text = "\n\t\tthis\n\t\tis very hard\n\t\tto test\n\t";
        assert_eq!(dedent(text), "this\nis very hard\nto test");
    }

    #[test]
    fn test_dedent_first_line_inline() {
        let text = "or this\n\t\t\twith the first line inline";
        assert_eq!(dedent(text), "or this\nwith the first line inline");
    }

    #[test]
    fn test_dedent_keeps_deeper_indentation() {
        let text = "\n    list:\n      - one\n    end\n  ";
        assert_eq!(dedent(text), "list:\n  - one\nend");
    }

    #[test]
    fn test_dedent_without_reference() {
        assert_eq!(dedent("\n\nflush\nlines\n"), "flush\nlines\n");
        assert_eq!(dedent("single line"), "single line");
    }

    #[test]
    fn test_dedent_single_line_unchanged() {
        assert_eq!(dedent("   padded text"), "   padded text");
        assert_eq!(dedent("   "), "   ");
    }

    #[test]
    fn test_dedent_blank() {
        assert_eq!(dedent("\n   \n\t"), "");
    }

    #[test]
    fn test_split_tags() {
        let tags: Vec<String> = split_tags("tag1, tag2 ,,  'tag3'").collect();
        assert_eq!(tags, vec!["tag1", "tag2", "tag3"]);
        assert_eq!(split_tags("  ").count(), 0);
    }
}
