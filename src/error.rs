use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the classifiers, metrics, and evaluation helpers in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Input slice is empty.
    #[error("empty input")]
    EmptyInput,

    /// Two vectors (or a vector and the training set) have different lengths.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// Minkowski order of the norm must be a positive integer.
    #[error("invalid norm order: p must be at least 1, got {0}")]
    InvalidNormOrder(i32),

    /// `predict` (or a query depending on it) was called before `train`.
    #[error("training data not set, call train() before predict()")]
    Untrained,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Reading feature data from disk failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File or directory being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
