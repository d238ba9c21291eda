//! Error types for pkgdeps-bitmap operations.

use thiserror::Error;

/// The error type for bit-matrix and key index operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A cell lies outside the matrix bounds.
    #[error("cell ({row}, {col}) is outside a {rows}x{cols} matrix")]
    OutOfRange {
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
        /// Number of rows in the matrix
        rows: usize,
        /// Number of columns in the matrix
        cols: usize,
    },

    /// Keys cannot be added once the matrix has been allocated.
    #[error("key index is already finalized")]
    Finalized,

    /// The matrix has not been allocated yet.
    #[error("key index has not been finalized")]
    NotFinalized,

    /// A key is not present in the index.
    #[error("unknown key")]
    UnknownKey,
}

/// A specialized Result type for pkgdeps-bitmap operations.
pub type Result<T> = std::result::Result<T, Error>;
