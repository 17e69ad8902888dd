//! Push synchronization: locally-canonical blocks out to a remote.
//!
//! The push direction answers "send everything this target depends on
//! that a given remote has not yet seen". "Not yet seen" is tracked by
//! the unsynced marker set, populated by collaborators whenever a local
//! block is created; delivery clears the marker.

use lattice_core::{Block, BlockHash};
use lattice_store::LedgerStore;

use crate::error::Result;
use crate::walk::{resolve, Outcome, SyncConfig, WalkPolicy};

/// Push specialization of the dependency walk.
///
/// Satisfied = not marked unsynced; blocks come from the canonical
/// collection (push only ever walks blocks already trusted locally);
/// delivery clears the marker.
struct PushPolicy;

impl<S: LedgerStore + ?Sized> WalkPolicy<S> for PushPolicy {
    fn satisfied(&self, store: &S, hash: &BlockHash) -> Result<bool> {
        Ok(!store.unsynced_contains(hash)?)
    }

    fn lookup(&self, store: &S, hash: &BlockHash) -> Result<Option<Block>> {
        Ok(store.canonical_get(hash)?)
    }

    fn commit(&self, store: &S, hash: &BlockHash, _block: &Block) -> Result<()> {
        store.unsynced_clear(hash)?;
        Ok(())
    }
}

/// Resolves canonical-but-unbroadcast blocks into canonical order.
///
/// Mirror image of the pull resolver: same walk, same delivery contract,
/// with the unsynced marker set as the satisfaction predicate.
pub struct PushResolver<'a, S: LedgerStore + ?Sized, F: FnMut(&Block)> {
    store: &'a S,
    deliver: F,
    config: SyncConfig,
    missing: Option<BlockHash>,
}

impl<'a, S: LedgerStore + ?Sized, F: FnMut(&Block)> PushResolver<'a, S, F> {
    /// Create a resolver over the given store and delivery callback.
    pub fn new(store: &'a S, deliver: F) -> Self {
        Self {
            store,
            deliver,
            config: SyncConfig::default(),
            missing: None,
        }
    }

    /// Override the walk bounds.
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Deliver every unsynced block the target transitively depends on,
    /// then the target itself, clearing each marker as it goes.
    ///
    /// Returns `true` ("incomplete") when the target is the sentinel or
    /// when a marked hash is absent from the canonical collection — a
    /// store inconsistency the caller must repair before retrying.
    /// Returns `false` when the target is fully resolved. A block whose
    /// marker is already clear is never re-delivered.
    pub fn synchronize(&mut self, target: BlockHash) -> Result<bool> {
        self.missing = None;
        if target.is_zero() {
            return Ok(true);
        }

        let mut delivered = 0u64;
        let deliver = &mut self.deliver;
        let mut counting = |block: &Block| {
            delivered += 1;
            deliver(block);
        };

        let outcome = resolve(
            self.store,
            &PushPolicy,
            &mut counting,
            target,
            0,
            &self.config,
        )?;

        match outcome {
            Outcome::Satisfied => {
                tracing::debug!(%target, delivered, "push complete");
                Ok(false)
            }
            Outcome::Unresolvable(hash) => {
                tracing::warn!(%target, %hash, delivered, "push incomplete, marked block not canonical");
                self.missing = Some(hash);
                Ok(true)
            }
        }
    }

    /// The first missing hash from the last incomplete `synchronize`.
    pub fn missing(&self) -> Option<BlockHash> {
        self.missing
    }
}
