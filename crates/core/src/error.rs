//! Error types for the core deduplication engine

use thiserror::Error;

/// Core deduplication errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A caller-supplied argument is outside its accepted domain
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A consistency check failed; indicates a bug, not bad input
    #[error("Internal invariant violated: {0}")]
    InternalInvariantViolation(String),

    #[error("Row {row} has {found} values but the table has {expected} columns")]
    ArityMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
