//! # Lattice Core
//!
//! Pure primitives for the lattice ledger: blocks, hashes, and
//! canonicalization.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`Block`] - The polymorphic block entity: send, receive, open, change
//! - [`BlockHash`] - Content-addressed identifier (Blake3 hash); the
//!   all-zero value is the "no dependency" sentinel
//! - [`AccountId`] - An account's Ed25519 public key
//! - [`BlockKind`] - Discriminator for the four block shapes
//!
//! ## Canonicalization
//!
//! All blocks are encoded using deterministic CBOR. See [`canonical`]. The
//! hashable section defines block identity; signature and work trail it.

pub mod block;
pub mod canonical;
pub mod crypto;
pub mod error;
pub mod types;
pub mod validation;

pub use block::{Block, BlockKind, ChangeBlock, OpenBlock, ReceiveBlock, SendBlock};
pub use canonical::{canonical_bytes, canonical_hashable_bytes, decode_block};
pub use crypto::{
    work_difficulty, work_meets, AccountId, Ed25519Signature, Keypair, WORK_THRESHOLD,
};
pub use error::{CoreError, ValidationError};
pub use types::{Amount, BlockHash};
pub use validation::{validate_block, verify_signature, verify_work, verify_work_at};
