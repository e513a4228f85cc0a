//! Error types for the songsheet library
//!
//! The markup path itself is total over its input: malformed annotations pass
//! through as plain text. Errors only arise when building a pipeline from an
//! invalid pattern set, or when a song's metadata block fails to parse.

use thiserror::Error;

/// Pattern-compilation errors, raised at pipeline construction time
#[derive(Debug, Clone, Error)]
pub enum PatternError {
    /// A grammar definition is not a valid regular expression
    #[error("invalid `{name}` pattern: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: regex::Error,
    },
}

impl PatternError {
    /// Create an invalid-pattern error for a named grammar
    #[must_use]
    pub const fn invalid(name: &'static str, source: regex::Error) -> Self {
        Self::Invalid { name, source }
    }
}

/// Result type for pattern compilation
pub type PatternResult<T> = Result<T, PatternError>;

/// Song-level errors
#[derive(Debug, Error)]
pub enum SongError {
    /// The markup pipeline could not be built
    #[error("failed to build markup pipeline: {0}")]
    Pattern(#[from] PatternError),

    /// Metadata leader lines did not form a valid YAML mapping
    #[error("invalid metadata block: {0}")]
    Metadata(#[from] serde_yaml::Error),
}

/// Result type for song operations
pub type SongResult<T> = Result<T, SongError>;
