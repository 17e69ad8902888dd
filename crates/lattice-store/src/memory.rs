//! In-memory implementation of the LedgerStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use lattice_core::{Block, BlockHash};

use crate::error::Result;
use crate::traits::{InsertOutcome, LedgerStore};

/// In-memory ledger implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryLedger {
    inner: RwLock<MemoryLedgerInner>,
}

struct MemoryLedgerInner {
    /// Integrated blocks, indexed by content hash.
    canonical: HashMap<BlockHash, Block>,

    /// Out-of-order blocks awaiting ancestry.
    staged: HashMap<BlockHash, Block>,

    /// Canonical hashes not yet transmitted.
    unsynced: HashSet<BlockHash>,
}

impl MemoryLedger {
    /// Create a new empty in-memory ledger.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryLedgerInner {
                canonical: HashMap::new(),
                staged: HashMap::new(),
                unsynced: HashSet::new(),
            }),
        }
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for MemoryLedger {
    fn canonical_put(&self, hash: &BlockHash, block: &Block) -> Result<InsertOutcome> {
        let mut inner = self.inner.write().unwrap();
        if inner.canonical.contains_key(hash) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        inner.canonical.insert(*hash, block.clone());
        Ok(InsertOutcome::Inserted)
    }

    fn canonical_get(&self, hash: &BlockHash) -> Result<Option<Block>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.canonical.get(hash).cloned())
    }

    fn canonical_contains(&self, hash: &BlockHash) -> Result<bool> {
        let inner = self.inner.read().unwrap();
        Ok(inner.canonical.contains_key(hash))
    }

    fn canonical_count(&self) -> Result<u64> {
        let inner = self.inner.read().unwrap();
        Ok(inner.canonical.len() as u64)
    }

    fn staged_put(&self, hash: &BlockHash, block: &Block) -> Result<InsertOutcome> {
        let mut inner = self.inner.write().unwrap();
        if inner.staged.contains_key(hash) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        inner.staged.insert(*hash, block.clone());
        Ok(InsertOutcome::Inserted)
    }

    fn staged_get(&self, hash: &BlockHash) -> Result<Option<Block>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.staged.get(hash).cloned())
    }

    fn staged_contains(&self, hash: &BlockHash) -> Result<bool> {
        let inner = self.inner.read().unwrap();
        Ok(inner.staged.contains_key(hash))
    }

    fn staged_remove(&self, hash: &BlockHash) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.staged.remove(hash);
        Ok(())
    }

    fn staged_count(&self) -> Result<u64> {
        let inner = self.inner.read().unwrap();
        Ok(inner.staged.len() as u64)
    }

    fn unsynced_mark(&self, hash: &BlockHash) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.unsynced.insert(*hash);
        Ok(())
    }

    fn unsynced_clear(&self, hash: &BlockHash) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.unsynced.remove(hash);
        Ok(())
    }

    fn unsynced_contains(&self, hash: &BlockHash) -> Result<bool> {
        let inner = self.inner.read().unwrap();
        Ok(inner.unsynced.contains(hash))
    }

    fn unsynced_count(&self) -> Result<u64> {
        let inner = self.inner.read().unwrap();
        Ok(inner.unsynced.len() as u64)
    }
}
