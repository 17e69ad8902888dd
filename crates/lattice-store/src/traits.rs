//! LedgerStore trait: the abstract interface for block persistence.
//!
//! This trait allows the resolvers to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).
//!
//! The store keeps three collections, all keyed by content hash:
//!
//! - **canonical** — blocks the node treats as integrated/true. Append-only
//!   from the resolvers' point of view.
//! - **staged** — blocks received out of order whose ancestry is not yet
//!   confirmed to reach canonical. Read-only to the resolvers.
//! - **unsynced** — marker set of canonical hashes not yet transmitted to a
//!   remote. The push resolver clears markers; collaborators re-add them.

use lattice_core::{Block, BlockHash};

use crate::error::Result;

/// Result of inserting a block into the canonical collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Block was inserted.
    Inserted,
    /// Block already exists (idempotent - not an error).
    AlreadyExists,
}

/// The LedgerStore trait: synchronous interface for block persistence.
///
/// All methods take `&self`; implementations provide interior mutability.
/// Mutations must be durably visible to presence checks made later in the
/// same thread of execution as soon as the call returns — the dependency
/// walk's exactly-once behavior on shared ancestors relies on it.
///
/// # Design Notes
///
/// - **Idempotent inserts**: Inserting the same block twice returns
///   `AlreadyExists`. Content addressing makes position conflicts
///   impossible: the key is the hash of the value.
/// - **No removal from canonical**: the resolvers only ever add.
pub trait LedgerStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Canonical collection
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a block into the canonical collection.
    fn canonical_put(&self, hash: &BlockHash, block: &Block) -> Result<InsertOutcome>;

    /// Get a canonical block by hash.
    fn canonical_get(&self, hash: &BlockHash) -> Result<Option<Block>>;

    /// Check canonical membership.
    fn canonical_contains(&self, hash: &BlockHash) -> Result<bool>;

    /// Number of canonical blocks.
    fn canonical_count(&self) -> Result<u64>;

    // ─────────────────────────────────────────────────────────────────────────
    // Staged collection
    // ─────────────────────────────────────────────────────────────────────────

    /// Stage an out-of-order block.
    fn staged_put(&self, hash: &BlockHash, block: &Block) -> Result<InsertOutcome>;

    /// Get a staged block by hash.
    fn staged_get(&self, hash: &BlockHash) -> Result<Option<Block>>;

    /// Check staged membership.
    fn staged_contains(&self, hash: &BlockHash) -> Result<bool>;

    /// Drop a staged block (after it has been integrated elsewhere).
    fn staged_remove(&self, hash: &BlockHash) -> Result<()>;

    /// Number of staged blocks.
    fn staged_count(&self) -> Result<u64>;

    // ─────────────────────────────────────────────────────────────────────────
    // Unsynced marker set
    // ─────────────────────────────────────────────────────────────────────────

    /// Mark a canonical hash as not yet transmitted.
    fn unsynced_mark(&self, hash: &BlockHash) -> Result<()>;

    /// Clear the marker for a transmitted hash.
    fn unsynced_clear(&self, hash: &BlockHash) -> Result<()>;

    /// Check marker membership.
    fn unsynced_contains(&self, hash: &BlockHash) -> Result<bool>;

    /// Number of marked hashes.
    fn unsynced_count(&self) -> Result<u64>;
}

impl<S: LedgerStore + ?Sized> LedgerStore for &S {
    fn canonical_put(&self, hash: &BlockHash, block: &Block) -> Result<InsertOutcome> {
        (**self).canonical_put(hash, block)
    }

    fn canonical_get(&self, hash: &BlockHash) -> Result<Option<Block>> {
        (**self).canonical_get(hash)
    }

    fn canonical_contains(&self, hash: &BlockHash) -> Result<bool> {
        (**self).canonical_contains(hash)
    }

    fn canonical_count(&self) -> Result<u64> {
        (**self).canonical_count()
    }

    fn staged_put(&self, hash: &BlockHash, block: &Block) -> Result<InsertOutcome> {
        (**self).staged_put(hash, block)
    }

    fn staged_get(&self, hash: &BlockHash) -> Result<Option<Block>> {
        (**self).staged_get(hash)
    }

    fn staged_contains(&self, hash: &BlockHash) -> Result<bool> {
        (**self).staged_contains(hash)
    }

    fn staged_remove(&self, hash: &BlockHash) -> Result<()> {
        (**self).staged_remove(hash)
    }

    fn staged_count(&self) -> Result<u64> {
        (**self).staged_count()
    }

    fn unsynced_mark(&self, hash: &BlockHash) -> Result<()> {
        (**self).unsynced_mark(hash)
    }

    fn unsynced_clear(&self, hash: &BlockHash) -> Result<()> {
        (**self).unsynced_clear(hash)
    }

    fn unsynced_contains(&self, hash: &BlockHash) -> Result<bool> {
        (**self).unsynced_contains(hash)
    }

    fn unsynced_count(&self) -> Result<u64> {
        (**self).unsynced_count()
    }
}
