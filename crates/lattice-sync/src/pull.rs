//! Pull synchronization: staged blocks into canonical order.
//!
//! The pull direction answers "bring me up to date through this target":
//! a peer announced a block whose ancestry may be partially missing
//! locally, the missing blocks have been staged, and the resolver delivers
//! every staged ancestor in causally-correct order, inserting each into
//! the canonical collection as it goes.

use lattice_core::{Block, BlockHash};
use lattice_store::LedgerStore;

use crate::error::Result;
use crate::walk::{resolve, Outcome, SyncConfig, WalkPolicy};

/// Pull specialization of the dependency walk.
///
/// Satisfied = present in canonical; blocks come from the staged
/// collection; delivery inserts into canonical.
struct PullPolicy;

impl<S: LedgerStore + ?Sized> WalkPolicy<S> for PullPolicy {
    fn satisfied(&self, store: &S, hash: &BlockHash) -> Result<bool> {
        Ok(store.canonical_contains(hash)?)
    }

    fn lookup(&self, store: &S, hash: &BlockHash) -> Result<Option<Block>> {
        Ok(store.staged_get(hash)?)
    }

    fn commit(&self, store: &S, hash: &BlockHash, block: &Block) -> Result<()> {
        // The resolver owns this insert; a delivery callback that also
        // writes is harmless because the insert is idempotent.
        store.canonical_put(hash, block)?;
        Ok(())
    }
}

/// Resolves staged-but-unverified blocks into canonical order.
///
/// Constructed from a store handle and a delivery callback; the callback
/// fires once per resolved block, bottom-up.
pub struct PullResolver<'a, S: LedgerStore + ?Sized, F: FnMut(&Block)> {
    store: &'a S,
    deliver: F,
    config: SyncConfig,
    missing: Option<BlockHash>,
}

impl<'a, S: LedgerStore + ?Sized, F: FnMut(&Block)> PullResolver<'a, S, F> {
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

    /// Resolve everything the target transitively depends on, then the
    /// target itself.
    ///
    /// Returns `true` ("incomplete") when the target is the sentinel or
    /// when an ancestor is missing from both collections; the first
    /// missing hash is then available from [`missing`](Self::missing).
    /// Returns `false` when the target is fully resolved, however many
    /// blocks (zero or more) were delivered on the way. Safe to call
    /// again after staging more blocks: already-canonical ancestors are
    /// skipped silently.
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
            &PullPolicy,
            &mut counting,
            target,
            0,
            &self.config,
        )?;

        match outcome {
            Outcome::Satisfied => {
                tracing::debug!(%target, delivered, "pull complete");
                Ok(false)
            }
            Outcome::Unresolvable(hash) => {
                tracing::warn!(%target, %hash, delivered, "pull incomplete, missing block");
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

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_core::{Amount, AccountId, ReceiveBlock, SendBlock};
    use lattice_store::MemoryLedger;

    fn send(previous: BlockHash) -> Block {
        SendBlock::new(previous, AccountId::from_bytes([0xaa; 32]), Amount(1)).into()
    }

    #[test]
    fn test_sentinel_target_is_incomplete() {
        let store = MemoryLedger::new();
        let mut delivered = Vec::new();
        let mut sync = PullResolver::new(&store, |b: &Block| delivered.push(b.clone()));

        assert!(sync.synchronize(BlockHash::ZERO).unwrap());
        assert!(delivered.is_empty());
    }

    #[test]
    fn test_single_staged_block() {
        let store = MemoryLedger::new();
        let base = send(BlockHash::from_bytes([0x01; 32]));
        let next = send(base.hash());

        store.canonical_put(&base.hash(), &base).unwrap();
        store.staged_put(&next.hash(), &next).unwrap();

        let mut delivered = Vec::new();
        let mut sync = PullResolver::new(&store, |b: &Block| delivered.push(b.clone()));

        assert!(!sync.synchronize(next.hash()).unwrap());
        assert_eq!(delivered, vec![next.clone()]);
        assert!(store.canonical_contains(&next.hash()).unwrap());
    }

    #[test]
    fn test_already_canonical_target_delivers_nothing() {
        let store = MemoryLedger::new();
        let base = send(BlockHash::from_bytes([0x02; 32]));
        store.canonical_put(&base.hash(), &base).unwrap();

        let mut delivered = 0usize;
        let mut sync = PullResolver::new(&store, |_: &Block| delivered += 1);

        assert!(!sync.synchronize(base.hash()).unwrap());
        assert_eq!(delivered, 0);
    }

    #[test]
    fn test_missing_ancestor_reported() {
        let store = MemoryLedger::new();
        let orphan = send(BlockHash::from_bytes([0x03; 32]));
        store.staged_put(&orphan.hash(), &orphan).unwrap();

        let mut delivered = 0usize;
        let mut sync = PullResolver::new(&store, |_: &Block| delivered += 1);

        assert!(sync.synchronize(orphan.hash()).unwrap());
        assert_eq!(sync.missing(), Some(BlockHash::from_bytes([0x03; 32])));
        assert_eq!(delivered, 0);
        assert!(!store.canonical_contains(&orphan.hash()).unwrap());
    }

    #[test]
    fn test_partial_progress_preserved_on_failed_source() {
        let store = MemoryLedger::new();
        let base = send(BlockHash::from_bytes([0x04; 32]));
        let prev_chain = send(base.hash());
        let absent = BlockHash::from_bytes([0x05; 32]);
        let target: Block = ReceiveBlock::new(prev_chain.hash(), absent).into();

        store.canonical_put(&base.hash(), &base).unwrap();
        store.staged_put(&prev_chain.hash(), &prev_chain).unwrap();
        store.staged_put(&target.hash(), &target).unwrap();

        let mut delivered = Vec::new();
        let mut sync = PullResolver::new(&store, |b: &Block| delivered.push(b.hash()));

        assert!(sync.synchronize(target.hash()).unwrap());
        assert_eq!(sync.missing(), Some(absent));
        // The previous branch was delivered and stays delivered.
        assert_eq!(delivered, vec![prev_chain.hash()]);
        assert!(store.canonical_contains(&prev_chain.hash()).unwrap());
        // The target itself was not.
        assert!(!store.canonical_contains(&target.hash()).unwrap());
    }

    #[test]
    fn test_depth_bound_yields_incomplete() {
        let store = MemoryLedger::new();
        let base = send(BlockHash::from_bytes([0x06; 32]));
        store.canonical_put(&base.hash(), &base).unwrap();

        let mut chain = Vec::new();
        let mut previous = base.hash();
        for _ in 0..8 {
            let block = send(previous);
            previous = block.hash();
            store.staged_put(&block.hash(), &block).unwrap();
            chain.push(block);
        }

        let target = chain.last().unwrap().hash();

        let mut sync = PullResolver::new(&store, |_: &Block| {})
            .with_config(SyncConfig::with_max_depth(3));
        assert!(sync.synchronize(target).unwrap());

        let mut sync = PullResolver::new(&store, |_: &Block| {});
        assert!(!sync.synchronize(target).unwrap());
    }
}
