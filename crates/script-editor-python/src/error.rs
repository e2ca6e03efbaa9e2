use script_editor_core::CompileError;
use thiserror::Error;

/// The exception class a Python front end would raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PyErrorClass {
    /// `SyntaxError`
    Syntax,
    /// `IndentationError`
    Indentation,
}

impl std::fmt::Display for PyErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax => f.write_str("SyntaxError"),
            Self::Indentation => f.write_str("IndentationError"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{class}: {message} (line {line}, column {column})")]
/// A positioned syntax error.
pub struct PySyntaxError {
    /// Exception class.
    pub class: PyErrorClass,
    /// Message text.
    pub message: String,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
}

impl PySyntaxError {
    pub(crate) fn syntax(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            class: PyErrorClass::Syntax,
            message: message.into(),
            line,
            column,
        }
    }

    pub(crate) fn indentation(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            class: PyErrorClass::Indentation,
            message: message.into(),
            line,
            column,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced by [`PythonCompiler`](crate::PythonCompiler).
pub enum PythonError {
    #[error(transparent)]
    /// A syntax or indentation error.
    Syntax(#[from] PySyntaxError),

    #[error("source code string cannot contain null bytes")]
    /// The source contains NUL characters.
    NullBytes,

    #[error("tree-sitter language error: {0}")]
    /// The Python grammar could not be loaded into the parser.
    Language(String),

    #[error("parser produced no tree")]
    /// Parsing was aborted before a tree was produced.
    ParseAborted,
}

impl From<PythonError> for CompileError {
    fn from(err: PythonError) -> Self {
        match err {
            PythonError::Syntax(e) => CompileError::Syntax {
                line: Some(e.line),
                column: Some(e.column),
                message: Some(e.message),
            },
            other => CompileError::Other(other.to_string()),
        }
    }
}
