//! The single-error compiler seam.
//!
//! The detector drives any front end that stops at the first syntax error. Language crates
//! (`script-editor-*`) implement [`Compiler`]; tests can plug in scripted compilers.

use thiserror::Error;

/// Failure reported by a [`Compiler`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A syntax-level error, optionally carrying a 1-based position.
    #[error("{}", message.as_deref().unwrap_or("Syntax error"))]
    Syntax {
        /// 1-based line of the error, if known.
        line: Option<usize>,
        /// 1-based column of the error, if known.
        column: Option<usize>,
        /// Compiler message, if any.
        message: Option<String>,
    },

    /// A failure that is not a syntax error (encoding issues, invalid bytes, ...).
    #[error("compilation failed: {0}")]
    Other(String),
}

impl CompileError {
    /// Convenience constructor for a positioned syntax error.
    pub fn syntax(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line: Some(line),
            column: Some(column),
            message: Some(message.into()),
        }
    }
}

/// A compiler front end that reports at most one error per invocation.
///
/// Implementations must treat lines recognized by
/// [`is_masked_line`](crate::text::is_masked_line) as opaque: indentation changes directly after
/// such a line are accepted, and a block header whose body was masked is not an error.
pub trait Compiler {
    /// Compile `source` as a complete program.
    fn compile(&mut self, source: &str) -> Result<(), CompileError>;
}

impl<C: Compiler + ?Sized> Compiler for &mut C {
    fn compile(&mut self, source: &str) -> Result<(), CompileError> {
        (**self).compile(source)
    }
}

impl<C: Compiler + ?Sized> Compiler for Box<C> {
    fn compile(&mut self, source: &str) -> Result<(), CompileError> {
        (**self).compile(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_display() {
        assert_eq!(
            CompileError::syntax(2, 1, "unmatched ')'").to_string(),
            "unmatched ')'"
        );
        let bare = CompileError::Syntax {
            line: None,
            column: None,
            message: None,
        };
        assert_eq!(bare.to_string(), "Syntax error");
        assert_eq!(
            CompileError::Other("null bytes".into()).to_string(),
            "compilation failed: null bytes"
        );
    }
}
