//! Error types for the sync module.

use thiserror::Error;

/// Errors that can occur during synchronization.
///
/// A dead-ended walk is NOT an error: it is the `incomplete = true`
/// outcome of `synchronize`, meaning the caller must fetch a missing
/// block from elsewhere before retrying. Only backend failures surface
/// here.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] lattice_store::StoreError),
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
