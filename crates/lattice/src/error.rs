//! Error types for the node facade.

use thiserror::Error;

/// Errors surfaced by [`Node`](crate::Node) operations.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] lattice_store::StoreError),

    /// Synchronization failed at the backend.
    #[error("sync error: {0}")]
    Sync(#[from] lattice_sync::SyncError),

    /// A block failed intake validation.
    #[error("validation error: {0}")]
    Validation(#[from] lattice_core::ValidationError),
}

/// Result type for node operations.
pub type Result<T> = std::result::Result<T, NodeError>;
