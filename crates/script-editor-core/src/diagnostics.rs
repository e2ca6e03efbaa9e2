//! Error records produced by a detection pass.
//!
//! Records are derived state: the full list is replaced after every pass, never merged, so stale
//! records cannot survive an edit. Renderers use them for:
//! - gutter markers
//! - underline ranges and hover tooltips

use serde::{Deserialize, Serialize};

/// Where an error record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A syntax error reported by the compiler.
    SyntaxError,
    /// A non-syntax compilation failure (e.g. encoding problems).
    CompileError,
    /// A truncated statement found by the lone-keyword check.
    PatternWarning,
}

/// A single error annotated onto a buffer line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column; may be approximate.
    pub column: usize,
    /// Human readable message.
    pub message: String,
    /// Record source.
    pub kind: ErrorKind,
}

impl ErrorRecord {
    /// Create a new record. Line and column are raised to at least 1.
    pub fn new(line: usize, column: usize, message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            line: line.max(1),
            column: column.max(1),
            message: message.into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_positions_are_one_based() {
        let record = ErrorRecord::new(0, 0, "invalid syntax", ErrorKind::SyntaxError);
        assert_eq!(record.line, 1);
        assert_eq!(record.column, 1);
    }

    #[test]
    fn test_record_json_shape() {
        let record = ErrorRecord::new(3, 5, "expected ':'", ErrorKind::SyntaxError);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"line":3,"column":5,"message":"expected ':'","kind":"SyntaxError"}"#
        );
    }
}
