//! Error types for pkgdeps operations.
//!
//! Every store operation returns a distinguishable [`Error`]; nothing is
//! retried internally. Mapping errors to messages and exit codes is the
//! caller's job.

use thiserror::Error;

/// Result type for pkgdeps operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for pkgdeps operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying storage failed or holds unreadable data
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The package catalog could not be read
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),

    /// The named package is not in the dependency graph
    #[error("package '{0}' does not exist or the database needs a rebuild")]
    PackageNotFound(String),

    /// The named package has no rebuild entry
    #[error("package '{0}' is not on the rebuild list")]
    TodoNotFound(String),

    /// `open` was called on a store that is already open
    #[error("database is already open")]
    AlreadyOpen,

    /// `close` was called on a store that is already closed
    #[error("database is already closed")]
    AlreadyClosed,

    /// An operation was attempted on a closed store
    #[error("database is not open")]
    NotOpen,

    /// The package already has a pending rebuild entry
    #[error("package '{0}' is already pending a rebuild")]
    DuplicatePending(String),

    /// The rebuild entry is not in a state that allows the operation
    #[error("package '{name}' cannot be marked done: {reason}")]
    InvalidState {
        /// Package name
        name: String,
        /// Why the transition was refused
        reason: &'static str,
    },

    /// In-memory matrix backend failed
    #[error("matrix error: {0}")]
    Bitmap(#[from] pkgdeps_bitmap::Error),
}

impl Error {
    /// Returns `true` if a referenced package or rebuild entry is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PackageNotFound(_) | Self::TodoNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_groups_both_lookups() {
        assert!(Error::PackageNotFound("zlib".into()).is_not_found());
        assert!(Error::TodoNotFound("zlib".into()).is_not_found());
        assert!(!Error::DuplicatePending("zlib".into()).is_not_found());
        assert!(!Error::AlreadyOpen.is_not_found());
    }

    #[test]
    fn messages_name_the_package() {
        let err = Error::InvalidState {
            name: "curl".into(),
            reason: "already done",
        };
        assert_eq!(
            err.to_string(),
            "package 'curl' cannot be marked done: already done"
        );
        assert!(
            Error::PackageNotFound("curl".into())
                .to_string()
                .contains("'curl'")
        );
    }
}
