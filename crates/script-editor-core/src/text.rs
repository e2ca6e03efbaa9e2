//! Line-level text helpers shared by the detector, the resolver and the fold index.
//!
//! Everything here is a heuristic over single lines; none of it is a parser.

use script_editor_lang::LanguageConfig;
use std::collections::BTreeSet;

/// Tag written after the comment token on a masked line.
pub const MASK_TAG: &str = "!masked";

/// Coarse classification of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Empty or whitespace only.
    Blank,
    /// A comment-only line.
    Comment,
    /// A string literal spanning the whole trimmed line, or a triple-quote marker line.
    StringLiteral,
    /// Anything else.
    Code,
}

/// Split text into lines.
///
/// A trailing newline does not open an extra line and `\r\n` endings are accepted.
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    let body = text.strip_suffix('\n').unwrap_or(text);
    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Leading whitespace of a line.
pub fn leading_whitespace(line: &str) -> &str {
    let trimmed = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - trimmed.len()]
}

/// Indentation width counting a space as 1 and a tab as 4.
pub fn indent_width(line: &str) -> usize {
    leading_whitespace(line)
        .chars()
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

/// Indentation level: [`indent_width`] integer-divided by 4.
pub fn indent_level(line: &str) -> usize {
    indent_width(line) / 4
}

/// Classify a line.
pub fn classify_line(line: &str, lang: &LanguageConfig) -> LineClass {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        LineClass::Blank
    } else if lang.comments.is_comment_line(trimmed) {
        LineClass::Comment
    } else if is_string_literal_line(trimmed, lang) {
        LineClass::StringLiteral
    } else {
        LineClass::Code
    }
}

/// Returns `true` for lines that start with a triple-quote delimiter.
pub fn is_docstring_marker(trimmed: &str, lang: &LanguageConfig) -> bool {
    lang.triple_quoted_strings
        && (strip_string_prefix(trimmed).starts_with("\"\"\"")
            || strip_string_prefix(trimmed).starts_with("'''"))
}

fn is_string_literal_line(trimmed: &str, lang: &LanguageConfig) -> bool {
    if is_docstring_marker(trimmed, lang) {
        return true;
    }
    let body = strip_string_prefix(trimmed);
    let mut chars = body.char_indices();
    let Some((_, quote)) = chars.next() else {
        return false;
    };
    if quote != '"' && quote != '\'' {
        return false;
    }
    let mut escaped = false;
    for (idx, c) in chars {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return idx + c.len_utf8() == body.len();
        }
    }
    false
}

fn strip_string_prefix(trimmed: &str) -> &str {
    let prefix_len = trimmed
        .chars()
        .take(2)
        .take_while(|c| matches!(c, 'r' | 'R' | 'b' | 'B' | 'u' | 'U' | 'f' | 'F'))
        .count();
    let rest = &trimmed[prefix_len..];
    if rest.starts_with(['"', '\'']) {
        rest
    } else {
        trimmed
    }
}

/// Marks every line that begins inside, or opens, a triple-quoted string.
pub fn multiline_string_lines(lines: &[&str], lang: &LanguageConfig) -> Vec<bool> {
    let mut marks = vec![false; lines.len()];
    if !lang.triple_quoted_strings {
        return marks;
    }

    let mut open: Option<char> = None;
    for (idx, line) in lines.iter().enumerate() {
        if open.is_some() {
            marks[idx] = true;
        }
        let chars: Vec<char> = line.chars().collect();
        let mut pos = 0;
        while pos < chars.len() {
            let c = chars[pos];
            match open {
                Some(quote) => {
                    if c == '\\' {
                        pos += 2;
                        continue;
                    }
                    if c == quote && triple_at(&chars, pos, quote) {
                        open = None;
                        pos += 3;
                        continue;
                    }
                    pos += 1;
                }
                None => {
                    if c == '#' {
                        break;
                    }
                    if c == '"' || c == '\'' {
                        if triple_at(&chars, pos, c) {
                            open = Some(c);
                            marks[idx] = true;
                            pos += 3;
                            continue;
                        }
                        pos = skip_simple_string(&chars, pos);
                        continue;
                    }
                    pos += 1;
                }
            }
        }
    }
    marks
}

fn triple_at(chars: &[char], pos: usize, quote: char) -> bool {
    pos + 2 < chars.len() && chars[pos + 1] == quote && chars[pos + 2] == quote
}

/// Returns the index after the closing quote of a single-line string starting at `pos`.
fn skip_simple_string(chars: &[char], pos: usize) -> usize {
    let quote = chars[pos];
    let mut i = pos + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}

/// The code part of a line: string contents blanked and any trailing comment removed.
pub fn code_portion(line: &str, lang: &LanguageConfig) -> String {
    let token = lang.line_comment_token();
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len());
    let mut pos = 0;
    while pos < chars.len() {
        let c = chars[pos];
        if c == '"' || c == '\'' {
            let end = skip_simple_string(&chars, pos);
            out.push(c);
            out.push(c);
            pos = end;
            continue;
        }
        if chars[pos..].iter().copied().take(token.chars().count()).eq(token.chars()) {
            break;
        }
        out.push(c);
        pos += 1;
    }
    out
}

/// Opening and closing bracket counts over the code part of a line, all kinds aggregated.
pub fn bracket_counts(line: &str, lang: &LanguageConfig) -> (usize, usize) {
    code_portion(line, lang)
        .chars()
        .fold((0, 0), |(open, close), c| match c {
            '(' | '[' | '{' => (open + 1, close),
            ')' | ']' | '}' => (open, close + 1),
            _ => (open, close),
        })
}

/// Returns `true` if the code part of the line contains any bracket character.
pub fn has_bracket(line: &str, lang: &LanguageConfig) -> bool {
    let (open, close) = bracket_counts(line, lang);
    open + close > 0
}

/// Rewrite a line as an inert comment that still carries the original text.
pub fn mask_line(line: &str, lang: &LanguageConfig) -> String {
    format!(
        "{}{}{} {}",
        leading_whitespace(line),
        lang.line_comment_token(),
        MASK_TAG,
        line.trim()
    )
}

/// Returns `true` if the line was produced by [`mask_line`].
pub fn is_masked_line(line: &str, lang: &LanguageConfig) -> bool {
    line.trim_start()
        .strip_prefix(lang.line_comment_token())
        .is_some_and(|rest| rest.starts_with(MASK_TAG))
}

/// Rebuild `text` with every line in `masked` (1-based) replaced by its masked form.
///
/// The result always has exactly as many lines as `lines`.
pub fn mask_lines(
    text: &str,
    lines: &[&str],
    masked: &BTreeSet<usize>,
    lang: &LanguageConfig,
) -> String {
    let mut out = String::with_capacity(text.len() + masked.len() * 16);
    for (idx, line) in lines.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        if masked.contains(&(idx + 1)) {
            out.push_str(&mask_line(line, lang));
        } else {
            out.push_str(line);
        }
    }
    if text.ends_with('\n') {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn py() -> LanguageConfig {
        LanguageConfig::python()
    }

    #[test]
    fn test_split_lines() {
        assert!(split_lines("").is_empty());
        assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b"]);
        assert_eq!(split_lines("a\r\n\r\nb"), vec!["a", "", "b"]);
        assert_eq!(split_lines("\n"), vec![""]);
    }

    #[test]
    fn test_indent_level() {
        assert_eq!(indent_level("x"), 0);
        assert_eq!(indent_level("    x"), 1);
        assert_eq!(indent_level("\tx"), 1);
        assert_eq!(indent_level("\t    x"), 2);
        assert_eq!(indent_level("   x"), 0);
    }

    #[test]
    fn test_classify_line() {
        let lang = py();
        assert_eq!(classify_line("   ", &lang), LineClass::Blank);
        assert_eq!(classify_line("  # hi", &lang), LineClass::Comment);
        assert_eq!(classify_line("  'abc'", &lang), LineClass::StringLiteral);
        assert_eq!(classify_line("r\"a\\\"b\"", &lang), LineClass::StringLiteral);
        assert_eq!(classify_line("\"\"\"Docstring", &lang), LineClass::StringLiteral);
        assert_eq!(classify_line("'a' + 'b'", &lang), LineClass::Code);
        assert_eq!(classify_line("x = 'a'", &lang), LineClass::Code);
    }

    #[test]
    fn test_multiline_string_lines() {
        let lines = vec!["x = 1", "s = \"\"\"", "def", "\"\"\"", "def", "y = '''a'''"];
        let marks = multiline_string_lines(&lines, &py());
        assert_eq!(marks, vec![false, true, true, true, false, true]);
    }

    #[test]
    fn test_bracket_counts_ignore_strings_and_comments() {
        let lang = py();
        assert_eq!(bracket_counts("f(a, [b])", &lang), (2, 2));
        assert_eq!(bracket_counts("x = ')'  # (", &lang), (0, 0));
        assert_eq!(bracket_counts("    y = 2)", &lang), (0, 1));
    }

    #[test]
    fn test_mask_round_trip_keeps_line_count() {
        let lang = py();
        let text = "def f(\n    pass\n";
        let lines = split_lines(text);
        let masked = BTreeSet::from([1]);
        let out = mask_lines(text, &lines, &masked, &lang);
        assert_eq!(out, "#!masked def f(\n    pass\n");
        assert_eq!(split_lines(&out).len(), lines.len());
        assert!(is_masked_line(split_lines(&out)[0], &lang));
        assert!(!is_masked_line("# plain comment", &lang));
    }

    #[test]
    fn test_mask_keeps_indentation() {
        assert_eq!(mask_line("    x = (", &py()), "    #!masked x = (");
        assert_eq!(mask_line("\tfoo", &LanguageConfig::mel()), "\t//!masked foo");
    }
}
