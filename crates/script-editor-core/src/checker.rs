//! The detection pipeline: multi-pass detection followed by line resolution.
//!
//! [`SyntaxChecker::check`] never fails. A panic inside a compiler or heuristic is caught at this
//! boundary, logged, and reported as "no errors this pass" so the editing surface stays usable.

use crate::compiler::Compiler;
use crate::config::CheckerConfig;
use crate::detector::MultiPassErrorDetector;
use crate::diagnostics::{ErrorKind, ErrorRecord};
use crate::error::CheckerError;
use crate::resolver::ErrorLineResolver;
use crate::text;
use script_editor_lang::LanguageConfig;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error};

/// Detector and resolver wired together.
#[derive(Debug, Clone)]
pub struct SyntaxChecker<C> {
    detector: MultiPassErrorDetector<C>,
    resolver: ErrorLineResolver,
}

impl<C: Compiler> SyntaxChecker<C> {
    /// Build a checker for `lang` around `compiler`.
    pub fn new(compiler: C, lang: LanguageConfig, config: &CheckerConfig) -> Result<Self, CheckerError> {
        config.validate()?;
        let resolver = ErrorLineResolver::new(lang.clone(), config.resolver)?;
        Ok(Self {
            detector: MultiPassErrorDetector::new(compiler, lang, config.detector),
            resolver,
        })
    }

    /// The underlying detector.
    pub fn detector(&self) -> &MultiPassErrorDetector<C> {
        &self.detector
    }

    /// The underlying resolver.
    pub fn resolver(&self) -> &ErrorLineResolver {
        &self.resolver
    }

    /// Run one detection pass over `text`.
    pub fn check(&mut self, text: &str) -> Vec<ErrorRecord> {
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.check_inner(text)));
        match result {
            Ok(records) => records,
            Err(payload) => {
                error!(
                    panic = panic_message(payload.as_ref()),
                    "syntax check failed; reporting no errors"
                );
                Vec::new()
            }
        }
    }

    fn check_inner(&mut self, text: &str) -> Vec<ErrorRecord> {
        let mut records = self.detector.detect(text);
        let lines = text::split_lines(text);
        for record in records
            .iter_mut()
            .filter(|r| r.kind == ErrorKind::SyntaxError)
        {
            let resolved = self.resolver.resolve(&lines, record.line, &record.message);
            if resolved != record.line {
                debug!(from = record.line, to = resolved, "moved error record");
                record.line = resolved;
            }
        }
        records
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::CompileError;

    struct Panicky;

    impl Compiler for Panicky {
        fn compile(&mut self, _source: &str) -> Result<(), CompileError> {
            panic!("compiler blew up");
        }
    }

    /// Reports `unmatched ')'` on the last line, like a front end that gave up at EOF.
    struct GivesUpAtEof;

    impl Compiler for GivesUpAtEof {
        fn compile(&mut self, source: &str) -> Result<(), CompileError> {
            let lines = text::split_lines(source);
            let open: usize = lines.iter().map(|l| l.matches('(').count()).sum();
            let close: usize = lines.iter().map(|l| l.matches(')').count()).sum();
            if close > open && !lines.iter().any(|l| l.contains("!masked")) {
                Err(CompileError::syntax(lines.len(), 1, "unmatched ')'"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_panic_is_contained() {
        let mut checker =
            SyntaxChecker::new(Panicky, LanguageConfig::python(), &CheckerConfig::default())
                .unwrap();
        assert!(checker.check("x = 1\n").is_empty());
        // The checker stays usable afterwards.
        assert!(checker.check("").is_empty());
    }

    #[test]
    fn test_implausible_line_is_resolved() {
        let mut checker =
            SyntaxChecker::new(GivesUpAtEof, LanguageConfig::python(), &CheckerConfig::default())
                .unwrap();
        let records = checker.check("def f():\n    x = g(1))\n    return x\n# end\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line, 2);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = CheckerConfig::default();
        config.detector.max_records = 0;
        assert!(SyntaxChecker::new(Panicky, LanguageConfig::python(), &config).is_err());
    }
}
