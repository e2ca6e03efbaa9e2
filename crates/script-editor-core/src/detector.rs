//! Multi-pass syntax error discovery.
//!
//! A single compile only surfaces the first syntax error. The detector masks each reported line as
//! an inert comment (keeping the line count intact) and compiles again, so independent errors
//! further down the buffer are found too. A final lone-keyword check catches truncated
//! statements that the compiler attributed elsewhere after masking.

use crate::compiler::{CompileError, Compiler};
use crate::config::DetectorConfig;
use crate::diagnostics::{ErrorKind, ErrorRecord};
use crate::text::{self, LineClass};
use script_editor_lang::LanguageConfig;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Working state of one [`MultiPassErrorDetector::detect_pass`] invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionPass {
    /// Number of compile attempts performed.
    pub attempt: usize,
    /// 1-based lines masked so far.
    pub masked_lines: BTreeSet<usize>,
    /// Records found, in discovery order.
    pub found: Vec<ErrorRecord>,
}

/// Finds several syntax errors per pass using a single-error [`Compiler`].
#[derive(Debug, Clone)]
pub struct MultiPassErrorDetector<C> {
    compiler: C,
    lang: LanguageConfig,
    config: DetectorConfig,
}

impl<C: Compiler> MultiPassErrorDetector<C> {
    /// Create a detector around `compiler`.
    pub fn new(compiler: C, lang: LanguageConfig, config: DetectorConfig) -> Self {
        Self {
            compiler,
            lang,
            config,
        }
    }

    /// The wrapped compiler.
    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    /// The language used for masking and line classification.
    pub fn language(&self) -> &LanguageConfig {
        &self.lang
    }

    /// Detect errors in `text`. Always returns a list, possibly empty.
    pub fn detect(&mut self, text: &str) -> Vec<ErrorRecord> {
        self.detect_pass(text).found
    }

    /// Like [`detect`](Self::detect), but also reports attempts and masked lines.
    pub fn detect_pass(&mut self, text: &str) -> DetectionPass {
        let mut pass = DetectionPass::default();
        if text.trim().is_empty() {
            return pass;
        }

        let lines = text::split_lines(text);
        let line_count = lines.len();
        let mut working = text.to_string();

        while pass.attempt < self.config.max_attempts {
            pass.attempt += 1;
            match self.compiler.compile(&working) {
                Ok(()) => {
                    debug!(attempt = pass.attempt, "compile succeeded");
                    break;
                }
                Err(CompileError::Syntax {
                    line,
                    column,
                    message,
                }) => {
                    let reported = line.unwrap_or(1);
                    let line = reported.clamp(1, line_count);
                    if line != reported {
                        warn!(reported, line_count, "compiler reported an out-of-range line");
                    }
                    if pass.masked_lines.contains(&line) {
                        debug!(line, "compiler repeated a masked line; stopping");
                        break;
                    }

                    let message = message.unwrap_or_else(|| "Syntax error".to_string());
                    debug!(attempt = pass.attempt, line, %message, "syntax error found");
                    pass.found.push(ErrorRecord::new(
                        line,
                        column.unwrap_or(1),
                        message,
                        ErrorKind::SyntaxError,
                    ));
                    pass.masked_lines.insert(line);
                    working = text::mask_lines(text, &lines, &pass.masked_lines, &self.lang);
                }
                Err(CompileError::Other(message)) => {
                    debug!(attempt = pass.attempt, %message, "non-syntax compile failure");
                    pass.found
                        .push(ErrorRecord::new(1, 1, message, ErrorKind::CompileError));
                    break;
                }
            }
        }

        self.pattern_pass(&lines, &mut pass);
        pass.found.truncate(self.config.max_records);
        pass
    }

    fn pattern_pass(&self, lines: &[&str], pass: &mut DetectionPass) {
        let in_string = text::multiline_string_lines(lines, &self.lang);
        for (idx, line) in lines.iter().enumerate() {
            let line_no = idx + 1;
            if pass.masked_lines.contains(&line_no) || in_string[idx] {
                continue;
            }
            if text::classify_line(line, &self.lang) != LineClass::Code {
                continue;
            }
            let trimmed = line.trim();
            if self.lang.is_incomplete_keyword(trimmed) {
                pass.found.push(ErrorRecord::new(
                    line_no,
                    text::leading_whitespace(line).chars().count() + 1,
                    format!("Incomplete statement: {trimmed}"),
                    ErrorKind::PatternWarning,
                ));
            }
        }
    }
}
