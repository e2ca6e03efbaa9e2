//! Re-localization of implausible compiler error lines.
//!
//! A compiler sometimes reports the line where parsing gave up rather than the line holding the
//! defect; the effect is strongest for unmatched closing brackets. When the reported line cannot
//! be the culprit (blank, comment, bare string literal) the resolver searches nearby lines with
//! bracket-balance and keyword heuristics. Results are best-effort, not guaranteed.

use crate::config::ResolverConfig;
use crate::error::CheckerError;
use crate::text::{self, LineClass};
use regex::Regex;
use script_editor_lang::LanguageConfig;
use std::cmp::Reverse;
use tracing::debug;

/// Maps a compiler-reported line to the line most likely responsible for the error.
#[derive(Debug, Clone)]
pub struct ErrorLineResolver {
    lang: LanguageConfig,
    config: ResolverConfig,
    open_bracket: Regex,
    close_bracket: Regex,
    block_keyword: Regex,
    block_header: Regex,
}

fn compile(pattern: &str) -> Result<Regex, CheckerError> {
    Regex::new(pattern).map_err(|err| CheckerError::RegexCompile {
        pattern: pattern.to_string(),
        message: err.to_string(),
    })
}

impl ErrorLineResolver {
    /// Build a resolver for `lang`.
    pub fn new(lang: LanguageConfig, config: ResolverConfig) -> Result<Self, CheckerError> {
        let keywords = lang
            .incomplete_keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let header = regex::escape(&lang.block.opener().to_string());
        Ok(Self {
            open_bracket: compile(r"[(\[{]")?,
            close_bracket: compile(r"[)\]}]")?,
            block_keyword: compile(&format!(r"^\s*(?:{keywords})\b"))?,
            block_header: compile(&format!(r"{header}\s*$"))?,
            lang,
            config,
        })
    }

    /// Resolve `reported_line` (1-based) for an error with `message`.
    ///
    /// Always returns a line in `[1, lines.len()]` (or 1 for an empty buffer).
    pub fn resolve(&self, lines: &[&str], reported_line: usize, message: &str) -> usize {
        if lines.is_empty() {
            return 1;
        }
        let reported = reported_line.clamp(1, lines.len());

        if text::classify_line(lines[reported - 1], &self.lang) == LineClass::Code {
            return reported;
        }

        let message = message.to_lowercase();
        let unmatched = message.contains("unmatched");
        if unmatched {
            if let Some(line) = self.resolve_unmatched(lines, reported) {
                debug!(reported, line, "relocated unmatched bracket error");
                return line;
            }
        }

        let resolved = self.search_window(lines, reported, &message, unmatched);
        if resolved != reported {
            debug!(reported, line = resolved, "relocated error by window search");
        }
        resolved
    }

    /// Lines whose closing brackets outnumber their opening ones, with the excess.
    fn imbalanced<'a>(&'a self, lines: &'a [&str]) -> impl Iterator<Item = (usize, usize)> + 'a {
        lines.iter().enumerate().filter_map(|(idx, line)| {
            if text::classify_line(line, &self.lang) != LineClass::Code {
                return None;
            }
            let (open, close) = text::bracket_counts(line, &self.lang);
            (close > open).then_some((idx + 1, close - open))
        })
    }

    fn resolve_unmatched(&self, lines: &[&str], reported: usize) -> Option<usize> {
        let best = self
            .imbalanced(&lines[..reported])
            .max_by_key(|&(line, extra)| (extra, Reverse(line)))
            .map(|(line, _)| line);
        best.or_else(|| self.imbalanced(lines).next().map(|(line, _)| line))
    }

    fn patterns_for(&self, message: &str) -> Vec<&Regex> {
        let mut patterns = Vec::new();
        if message.contains("unmatched") || message.contains("does not match") {
            patterns.push(&self.close_bracket);
        }
        if message.contains("never closed") {
            patterns.push(&self.open_bracket);
        }
        if message.contains("indent") {
            patterns.push(&self.block_header);
        } else if message.contains("expected") {
            patterns.push(&self.block_keyword);
        }
        patterns
    }

    fn search_window(&self, lines: &[&str], reported: usize, message: &str, after_bias: bool) -> usize {
        let window = self.config.window;
        let patterns = self.patterns_for(message);
        let lo = reported.saturating_sub(window).max(1);
        let hi = (reported + window).min(lines.len());

        let mut best: Option<(usize, usize)> = None;
        for line_no in lo..=hi {
            let line = lines[line_no - 1];
            if text::classify_line(line, &self.lang) != LineClass::Code {
                continue;
            }

            let distance = line_no.abs_diff(reported);
            let closeness = window + 1 - distance.min(window);
            let proximity = if after_bias && line_no < reported {
                closeness / 2
            } else {
                closeness
            };

            let mut score = 1 + proximity;
            if patterns.iter().any(|p| p.is_match(line)) {
                score += 10;
            }
            if text::has_bracket(line, &self.lang) {
                score += 3;
            }

            if best.is_none_or(|(top, _)| score > top) {
                best = Some((score, line_no));
            }
        }

        best.map_or(reported, |(_, line)| line)
    }
}
