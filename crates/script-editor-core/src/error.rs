use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while constructing the checking pipeline.
pub enum CheckerError {
    #[error("regex compile error for pattern '{pattern}': {message}")]
    /// A heuristic pattern failed to compile.
    RegexCompile {
        /// The regex pattern string.
        pattern: String,
        /// The compiler error message.
        message: String,
    },

    #[error("invalid configuration: {0}")]
    /// A configuration value is out of its usable range.
    InvalidConfig(&'static str),
}
