//! Error types for sequence generation.

use thiserror::Error;

/// Errors that can occur while generating a fizzbuzz sequence.
#[derive(Debug, Error)]
pub enum FizzbuzzError {
    /// Start of the range is not a positive number
    #[error("invalid from: {0}")]
    InvalidFrom(i64),

    /// End of the range is not a positive number
    #[error("invalid to: {0}")]
    InvalidTo(i64),

    /// A substitution rule uses a multiple that cannot divide anything
    #[error("invalid multiple for {rule}: {multiple}")]
    InvalidMultiple { rule: &'static str, multiple: i64 },

    /// The underlying writer failed
    #[error("writing {what}: {index}")]
    Write {
        what: &'static str,
        index: i64,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for sequence generation.
pub type Result<T> = std::result::Result<T, FizzbuzzError>;
