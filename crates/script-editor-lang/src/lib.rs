#![warn(missing_docs)]
//! `script-editor-lang` - data-driven language configuration helpers for `script-editor-core`.
//!
//! This crate intentionally stays lightweight and does **not** depend on any parser. It provides
//! small structs that the checker, the resolver and the fold index use to classify lines in a
//! language-aware way (Python scripts and MEL scripts inside the host application).

/// Comment tokens/config for a given language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentConfig {
    /// Line comment token (e.g. `//`, `#`).
    pub line: Option<String>,
    /// Block comment start token (e.g. `/*`).
    pub block_start: Option<String>,
    /// Block comment end token (e.g. `*/`).
    pub block_end: Option<String>,
}

impl CommentConfig {
    /// Create a config that supports only line comments.
    pub fn line(token: impl Into<String>) -> Self {
        Self {
            line: Some(token.into()),
            block_start: None,
            block_end: None,
        }
    }

    /// Create a config that supports both line and block comments.
    pub fn line_and_block(
        line: impl Into<String>,
        block_start: impl Into<String>,
        block_end: impl Into<String>,
    ) -> Self {
        Self {
            line: Some(line.into()),
            block_start: Some(block_start.into()),
            block_end: Some(block_end.into()),
        }
    }

    /// Returns `true` if a line comment token is configured.
    pub fn has_line(&self) -> bool {
        self.line.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Returns `true` if both block comment tokens are configured.
    pub fn has_block(&self) -> bool {
        self.block_start.as_deref().is_some_and(|s| !s.is_empty())
            && self.block_end.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Returns `true` if the trimmed line is a comment-only line.
    ///
    /// Block comments only count when the line starts with the opening token.
    pub fn is_comment_line(&self, trimmed: &str) -> bool {
        if let Some(token) = self.line.as_deref().filter(|t| !t.is_empty()) {
            if trimmed.starts_with(token) {
                return true;
            }
        }
        if self.has_block() {
            if let Some(start) = self.block_start.as_deref() {
                return trimmed.starts_with(start);
            }
        }
        false
    }
}

/// The delimiter that opens a nested block in a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockDelimiter {
    /// Indentation-delimited blocks opened by a trailing `:` (Python).
    Colon,
    /// Brace-delimited blocks opened by a trailing `{` (MEL, C-like languages).
    Brace,
}

impl BlockDelimiter {
    /// The character that ends a block-opening line.
    pub fn opener(self) -> char {
        match self {
            Self::Colon => ':',
            Self::Brace => '{',
        }
    }
}

/// Everything the line classifiers need to know about a scripting language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// Human readable language name.
    pub name: String,
    /// Comment tokens.
    pub comments: CommentConfig,
    /// Block-opening delimiter used by folding.
    pub block: BlockDelimiter,
    /// Whether `"""` / `'''` delimit multi-line string literals.
    pub triple_quoted_strings: bool,
    /// Keywords that, standing alone on a line, indicate a truncated statement.
    pub incomplete_keywords: Vec<String>,
}

impl LanguageConfig {
    /// Python, the primary scripting language.
    pub fn python() -> Self {
        Self {
            name: "python".to_string(),
            comments: CommentConfig::line("#"),
            block: BlockDelimiter::Colon,
            triple_quoted_strings: true,
            incomplete_keywords: [
                "def", "class", "if", "for", "while", "try", "else", "elif", "except", "finally",
                "import", "from",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }

    /// MEL, the host application's brace-delimited command language.
    pub fn mel() -> Self {
        Self {
            name: "mel".to_string(),
            comments: CommentConfig::line_and_block("//", "/*", "*/"),
            block: BlockDelimiter::Brace,
            triple_quoted_strings: false,
            incomplete_keywords: ["proc", "global", "if", "for", "while", "else", "switch"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// The token used to write line comments, falling back to `#`.
    pub fn line_comment_token(&self) -> &str {
        self.comments
            .line
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("#")
    }

    /// Returns `true` if `trimmed` is exactly one of the incomplete-statement keywords.
    pub fn is_incomplete_keyword(&self, trimmed: &str) -> bool {
        self.incomplete_keywords.iter().any(|k| k == trimmed)
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self::python()
    }
}
