//! Error types for the lattice core.

use thiserror::Error;

/// Core errors that can occur during block operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid account key")]
    InvalidAccountKey,

    #[error("malformed block: {0}")]
    MalformedBlock(String),

    #[error("unknown block kind: {0}")]
    UnknownKind(u8),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Validation errors for block signatures and work.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("signature verification failed")]
    SignatureFailed,

    #[error("work below threshold: difficulty {difficulty:#018x} < {threshold:#018x}")]
    InsufficientWork { difficulty: u64, threshold: u64 },

    #[error("open block signed by {signer} but names account {named}")]
    AccountMismatch { signer: String, named: String },

    #[error("structural error: {0}")]
    StructuralError(String),
}

impl From<CoreError> for ValidationError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidSignature | CoreError::InvalidAccountKey => {
                ValidationError::SignatureFailed
            }
            CoreError::MalformedBlock(msg)
            | CoreError::EncodingError(msg)
            | CoreError::DecodingError(msg) => ValidationError::StructuralError(msg),
            CoreError::UnknownKind(k) => {
                ValidationError::StructuralError(format!("unknown block kind: {}", k))
            }
        }
    }
}
