//! Masked-line neutralization.
//!
//! A masked line is a comment, but the statement it replaced may have opened a block or been the
//! only body of one. Before parsing, each masked line at bracket depth zero is swapped for a
//! stand-in statement with the same indentation so the surrounding structure stays valid:
//!
//! - a following line indented deeper than the masked line gets an `if True:` header;
//! - a masked line that was the whole body of a preceding `:` header becomes `pass`.
//!
//! Every other masked line stays a comment. The line count never changes.

use script_editor_core::text::{self, LineClass};
use script_editor_lang::LanguageConfig;
use std::borrow::Cow;

fn is_significant(line: &str, lang: &LanguageConfig) -> bool {
    matches!(
        text::classify_line(line, lang),
        LineClass::Code | LineClass::StringLiteral
    )
}

/// Rewrite masked lines in `source` into structure-preserving stand-ins.
pub(crate) fn neutralize<'a>(source: &'a str, lang: &LanguageConfig) -> Cow<'a, str> {
    let lines = text::split_lines(source);
    if !lines.iter().any(|l| text::is_masked_line(l, lang)) {
        return Cow::Borrowed(source);
    }

    let in_string = text::multiline_string_lines(&lines, lang);
    let mut depth = 0usize;
    let mut out: Vec<Cow<'_, str>> = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        if !text::is_masked_line(line, lang) {
            if !in_string[idx] {
                let (open, close) = text::bracket_counts(line, lang);
                depth = (depth + open).saturating_sub(close);
            }
            out.push(Cow::Borrowed(line));
            continue;
        }
        if depth > 0 || in_string[idx] {
            out.push(Cow::Borrowed(line));
            continue;
        }

        let indent = text::indent_width(line);
        let ws = text::leading_whitespace(line);
        let next = lines[idx + 1..]
            .iter()
            .find(|l| is_significant(l, lang))
            .copied();
        let prev = lines[..idx]
            .iter()
            .rev()
            .find(|l| is_significant(l, lang))
            .copied();

        let opens_block = next.is_some_and(|n| text::indent_width(n) > indent);
        let sole_body = prev.is_some_and(|p| {
            let header = text::indent_width(p);
            text::code_portion(p, lang).trim_end().ends_with(':')
                && indent > header
                && next.is_none_or(|n| text::indent_width(n) <= header)
        });

        if opens_block {
            out.push(Cow::Owned(format!("{ws}if True:")));
        } else if sole_body {
            out.push(Cow::Owned(format!("{ws}pass")));
        } else {
            out.push(Cow::Borrowed(line));
        }
    }

    let mut joined = out.join("\n");
    if source.ends_with('\n') {
        joined.push('\n');
    }
    Cow::Owned(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> String {
        neutralize(source, &LanguageConfig::python()).into_owned()
    }

    #[test]
    fn test_unmasked_source_is_borrowed() {
        let lang = LanguageConfig::python();
        assert!(matches!(
            neutralize("x = 1\n# note\n", &lang),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_masked_header_gets_stand_in() {
        assert_eq!(
            run("#!masked if True\n    x = 1\ndef\n"),
            "if True:\n    x = 1\ndef\n"
        );
    }

    #[test]
    fn test_masked_sole_body_becomes_pass() {
        assert_eq!(
            run("def f():\n    #!masked return (1 +\nx = 1\n"),
            "def f():\n    pass\nx = 1\n"
        );
    }

    #[test]
    fn test_masked_line_among_siblings_stays_a_comment() {
        let source = "def f():\n    a = 1\n    #!masked b = = 2\n    return a\n";
        assert_eq!(run(source), source);
    }

    #[test]
    fn test_masked_line_inside_brackets_stays_a_comment() {
        let source = "x = f(\n    #!masked 1 2\n        3)\n";
        assert_eq!(run(source), source);
    }

    #[test]
    fn test_line_count_is_preserved() {
        let source = "if x:\n        a\n#!masked oops\n    b";
        let out = run(source);
        assert_eq!(out, "if x:\n        a\nif True:\n    b");
        assert_eq!(text::split_lines(&out).len(), text::split_lines(source).len());
    }
}
