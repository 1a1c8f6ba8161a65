//! Error types for cart persistence.
//!
//! Store operations never fail from the caller's point of view. These errors
//! exist so storage adapters can report what went wrong; the store logs them
//! and carries on with its in-memory state.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by [`CartStorage`](crate::storage::CartStorage) adapters and
/// snapshot encoding.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Persisted snapshot was written by an incompatible schema.
    #[error("Unsupported snapshot version {found} (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },

    /// A shared in-memory slot was poisoned by a panicking writer.
    #[error("Storage lock poisoned")]
    Poisoned,
}

impl StorageError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
