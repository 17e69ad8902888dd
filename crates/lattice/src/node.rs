//! The Node: unified API for the lattice ledger.
//!
//! Ties the store and the two resolvers together behind the operations a
//! node process actually performs: staging blocks that arrived out of
//! order, adopting locally-created blocks, catching up to an announced
//! target, and flushing unbroadcast blocks toward a remote.

use lattice_core::{verify_signature, verify_work_at, Block, BlockHash};
use lattice_store::LedgerStore;
use lattice_sync::{PullResolver, PushResolver, SyncConfig};

use crate::error::{NodeError, Result};

/// Configuration for the Node.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// Work threshold enforced on intake, if any. `None` leaves proof-of-work
    /// policing to the network layer.
    pub work_threshold: Option<u64>,
    /// Bounds applied to every synchronize call.
    pub sync: SyncConfig,
}

/// Outcome of one catch-up or flush call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSummary {
    /// Whether the walk dead-ended before reaching the target.
    pub incomplete: bool,
    /// Number of blocks delivered to the callback.
    pub delivered: u64,
    /// First hash the walk could not resolve, when incomplete.
    pub missing: Option<BlockHash>,
}

/// The main Node struct.
///
/// Provides a unified API for:
/// - Staging out-of-order blocks
/// - Adopting locally-created blocks
/// - Pull-resolving an announced target into the canonical ledger
/// - Push-resolving unbroadcast blocks toward a remote
pub struct Node<S: LedgerStore> {
    store: S,
    config: NodeConfig,
}

impl<S: LedgerStore> Node<S> {
    /// Create a new node over the given store.
    pub fn new(store: S, config: NodeConfig) -> Self {
        Self { store, config }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stage a block that arrived before its ancestry.
    ///
    /// Open blocks are checked against their own account's signature;
    /// other kinds name no account, so their signatures are checked when
    /// the surrounding ledger logic knows the chain owner. Work is checked
    /// only when the config carries a threshold.
    pub fn stage(&self, block: Block) -> Result<BlockHash> {
        self.check_intake(&block)?;

        let hash = block.hash();
        self.store.staged_put(&hash, &block)?;
        tracing::debug!(%hash, kind = ?block.kind(), "staged block");
        Ok(hash)
    }

    /// Adopt a locally-created block: canonical immediately, and marked
    /// unsynced so the next flush delivers it to the remote.
    pub fn adopt_local(&self, block: Block) -> Result<BlockHash> {
        self.check_intake(&block)?;

        let hash = block.hash();
        self.store.canonical_put(&hash, &block)?;
        self.store.unsynced_mark(&hash)?;
        tracing::debug!(%hash, kind = ?block.kind(), "adopted local block");
        Ok(hash)
    }

    /// Bring the canonical ledger up to date through `target`, delivering
    /// every newly integrated block bottom-up.
    ///
    /// An incomplete summary means a block must be fetched from a peer
    /// (see [`SyncSummary::missing`]), staged, and the call repeated.
    pub fn catch_up<F: FnMut(&Block)>(&self, target: BlockHash, mut deliver: F) -> Result<SyncSummary> {
        let mut delivered = 0u64;
        let mut sync = PullResolver::new(&self.store, |block: &Block| {
            delivered += 1;
            deliver(block);
        })
        .with_config(self.config.sync.clone());

        let incomplete = sync.synchronize(target)?;
        let missing = sync.missing();

        Ok(SyncSummary {
            incomplete,
            delivered,
            missing,
        })
    }

    /// Deliver every unsynced block `target` depends on, bottom-up,
    /// clearing markers as it goes.
    pub fn flush_unsynced<F: FnMut(&Block)>(
        &self,
        target: BlockHash,
        mut deliver: F,
    ) -> Result<SyncSummary> {
        let mut delivered = 0u64;
        let mut sync = PushResolver::new(&self.store, |block: &Block| {
            delivered += 1;
            deliver(block);
        })
        .with_config(self.config.sync.clone());

        let incomplete = sync.synchronize(target)?;
        let missing = sync.missing();

        Ok(SyncSummary {
            incomplete,
            delivered,
            missing,
        })
    }

    fn check_intake(&self, block: &Block) -> Result<()> {
        if let Block::Open(open) = block {
            verify_signature(block, &open.account).map_err(NodeError::Validation)?;
        }
        if let Some(threshold) = self.config.work_threshold {
            verify_work_at(block, threshold).map_err(NodeError::Validation)?;
        }
        Ok(())
    }
}
