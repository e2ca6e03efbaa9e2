#![warn(missing_docs)]
//! `script-editor-python` - a single-error Python front end for `script-editor-core`.
//!
//! [`PythonCompiler`] parses with Tree-sitter's Python grammar and reports the first syntax
//! error, the way a one-shot compile of a script would. It plugs into the multi-pass detector
//! through the [`Compiler`](script_editor_core::Compiler) trait.
//!
//! ```rust
//! use script_editor_core::{CheckerConfig, SyntaxChecker};
//! use script_editor_lang::LanguageConfig;
//! use script_editor_python::PythonCompiler;
//!
//! let mut checker = SyntaxChecker::new(
//!     PythonCompiler::new().unwrap(),
//!     LanguageConfig::python(),
//!     &CheckerConfig::default(),
//! )
//! .unwrap();
//!
//! let records = checker.check("if True\n    x = 1\ndef\n");
//! let lines: Vec<usize> = records.iter().map(|r| r.line).collect();
//! assert_eq!(lines, vec![1, 3]);
//! ```

mod error;
mod masked;
mod syntax;

pub use error::{PyErrorClass, PySyntaxError, PythonError};

use script_editor_core::{CompileError, Compiler};
use script_editor_lang::LanguageConfig;
use tracing::trace;
use tree_sitter::Parser;

/// Python syntax front end backed by Tree-sitter.
pub struct PythonCompiler {
    parser: Parser,
    lang: LanguageConfig,
}

impl PythonCompiler {
    /// Create a compiler with the Python grammar loaded.
    pub fn new() -> Result<Self, PythonError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| PythonError::Language(e.to_string()))?;
        Ok(Self {
            parser,
            lang: LanguageConfig::python(),
        })
    }

    /// Check `source`, returning the first error in source order.
    ///
    /// Masked lines are rewritten into stand-in statements first, so a masked block header or
    /// block body does not surface as a new indentation error.
    pub fn check(&mut self, source: &str) -> Result<(), PythonError> {
        if source.contains('\0') {
            return Err(PythonError::NullBytes);
        }
        let prepared = masked::neutralize(source, &self.lang);
        let tree = self
            .parser
            .parse(prepared.as_ref(), None)
            .ok_or(PythonError::ParseAborted)?;
        trace!(
            has_error = tree.root_node().has_error(),
            bytes = prepared.len(),
            "parsed"
        );
        match syntax::first_error(&tree, &prepared) {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

impl Compiler for PythonCompiler {
    fn compile(&mut self, source: &str) -> Result<(), CompileError> {
        self.check(source).map_err(CompileError::from)
    }
}
