//! Error handling
//!
//! Provides typed errors for content operations with user-facing messages.
//! Mutation callers (the CLI, tests) catch these and display the message;
//! they never need to inspect the source chain to produce output.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, mutating or syncing content
#[derive(Error, Debug)]
pub enum Error {
    /// A required field was missing or malformed
    #[error("{0}")]
    Validation(String),

    /// A mutation was attempted without an admin session
    #[error("Unauthorized admin action.")]
    Unauthorized,

    /// Login was rejected
    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// No admin credentials exist in config or on disk
    #[error("Admin is not configured yet.")]
    AdminNotConfigured,

    /// A record lookup by id failed
    #[error("{0}")]
    NotFound(String),

    /// The remote endpoint rejected a request; carries the server's
    /// message when one could be parsed, else a per-operation fallback
    #[error("{0}")]
    Remote(String),

    /// A feature requiring remote configuration was called without it
    #[error("{0}")]
    NotConfigured(String),

    /// Local persistence is out of space
    #[error("Storage limit reached while writing '{path}'. Free up disk space and try again.")]
    StorageFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read file
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write file
    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// HTTP transport failure (connect, timeout, TLS)
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding of a collection failed
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create an error from an I/O error with path context
    ///
    /// Classifies the error based on its kind (permission, disk full, etc.)
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => Error::PermissionDenied {
                path,
                source: error,
            },
            _ if is_disk_full_error(&error) => Error::StorageFull {
                path,
                source: error,
            },
            _ => Error::WriteError {
                path,
                source: error,
            },
        }
    }

    /// Whether this error should be shown to the user as their own
    /// mistake rather than a system failure
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::Unauthorized
                | Error::InvalidCredentials
                | Error::AdminNotConfigured
                | Error::NotFound(_)
        )
    }
}

/// Check if an I/O error indicates a disk full condition
fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("quota exceeded")
        || msg.contains("not enough space")
}

/// Result type for content operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_classification() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::from_io(io_err, PathBuf::from("/test/path"));

        assert!(matches!(err, Error::PermissionDenied { .. }));
        assert!(err.to_string().contains("/test/path"));
    }

    #[test]
    fn test_disk_full_detection() {
        let io_err = io::Error::new(io::ErrorKind::Other, "No space left on device");
        let err = Error::from_io(io_err, PathBuf::from("/full/disk"));

        assert!(matches!(err, Error::StorageFull { .. }));
        assert!(err.to_string().contains("Storage limit reached"));
    }

    #[test]
    fn test_other_io_becomes_write_error() {
        let io_err = io::Error::new(io::ErrorKind::Other, "interrupted");
        let err = Error::from_io(io_err, PathBuf::from("/some/file"));

        assert!(matches!(err, Error::WriteError { .. }));
    }

    #[test]
    fn test_user_error_classification() {
        assert!(Error::Validation("Skill is required.".into()).is_user_error());
        assert!(Error::Unauthorized.is_user_error());
        assert!(Error::NotFound("Project not found.".into()).is_user_error());
        assert!(!Error::Remote("server exploded".into()).is_user_error());
    }

    #[test]
    fn test_unauthorized_message() {
        assert_eq!(Error::Unauthorized.to_string(), "Unauthorized admin action.");
    }
}
