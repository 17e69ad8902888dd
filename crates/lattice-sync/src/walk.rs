//! The shared dependency walk.
//!
//! Both synchronization directions are the same depth-first recursion over
//! a block's dependency references; they differ only in what "already
//! satisfied" means, where unsatisfied blocks are fetched from, and what
//! is written back after a block is delivered. Those three choices are the
//! [`WalkPolicy`] seam.
//!
//! The walk is synchronous and purely sequential: every step either
//! returns immediately (sentinel, already-satisfied, or absent) or
//! recurses directly into a dependency before continuing. Recursion depth
//! equals the length of the longest unresolved chain being walked.

use std::num::NonZeroUsize;

use lattice_core::{Block, BlockHash};
use lattice_store::LedgerStore;

use crate::error::Result;

/// Result of resolving one hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The hash requires no further action in this direction.
    Satisfied,
    /// A hash needed to complete the chain exists in neither the
    /// satisfaction collection nor the block-source collection. Carries
    /// the first such hash encountered, for the caller to fetch.
    Unresolvable(BlockHash),
}

impl Outcome {
    /// Whether this outcome is `Satisfied`.
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Outcome::Satisfied)
    }
}

/// Bounds on a single `synchronize` call.
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    /// Maximum recursion depth before the walk gives up. Exceeding it
    /// yields `Unresolvable` at the offending frame. `None` means
    /// unbounded.
    pub max_depth: Option<NonZeroUsize>,
}

impl SyncConfig {
    /// A config with the given depth bound.
    pub fn with_max_depth(depth: usize) -> Self {
        Self {
            max_depth: NonZeroUsize::new(depth),
        }
    }
}

/// How one synchronization direction reads and commits blocks.
///
/// Implementations must make `commit` durably visible to a subsequent
/// `satisfied` check before returning: that is what makes a shared
/// ancestor reached via two different paths deliver exactly once.
pub trait WalkPolicy<S: LedgerStore + ?Sized> {
    /// Whether the hash already requires no further work.
    fn satisfied(&self, store: &S, hash: &BlockHash) -> Result<bool>;

    /// Fetch the block for an unsatisfied hash, if this direction has it.
    fn lookup(&self, store: &S, hash: &BlockHash) -> Result<Option<Block>>;

    /// Applied after delivery, before the recursive frame returns.
    fn commit(&self, store: &S, hash: &BlockHash, block: &Block) -> Result<()>;
}

/// Resolve a single hash, delivering unsatisfied ancestors bottom-up.
///
/// For a block carrying both references, the entire `previous` ancestry is
/// delivered before the entire `source` ancestry, which is delivered
/// before the block itself. An `Unresolvable` dependency short-circuits
/// the frame — the block is not delivered and `source` is never attempted
/// after a failed `previous` — but blocks already delivered by earlier,
/// independent branches stay delivered.
pub fn resolve<S, P, F>(
    store: &S,
    policy: &P,
    deliver: &mut F,
    hash: BlockHash,
    depth: usize,
    config: &SyncConfig,
) -> Result<Outcome>
where
    S: LedgerStore + ?Sized,
    P: WalkPolicy<S>,
    F: FnMut(&Block),
{
    if hash.is_zero() {
        return Ok(Outcome::Satisfied);
    }

    if policy.satisfied(store, &hash)? {
        return Ok(Outcome::Satisfied);
    }

    if let Some(max) = config.max_depth {
        if depth >= max.get() {
            tracing::warn!(%hash, depth, "depth bound exceeded, treating as unresolvable");
            return Ok(Outcome::Unresolvable(hash));
        }
    }

    let Some(block) = policy.lookup(store, &hash)? else {
        return Ok(Outcome::Unresolvable(hash));
    };

    if let Some(previous) = block.previous() {
        let outcome = resolve(store, policy, deliver, previous, depth + 1, config)?;
        if !outcome.is_satisfied() {
            return Ok(outcome);
        }
    }

    if let Some(source) = block.source() {
        let outcome = resolve(store, policy, deliver, source, depth + 1, config)?;
        if !outcome.is_satisfied() {
            return Ok(outcome);
        }
    }

    deliver(&block);
    // The commit must land before this frame returns so that any later
    // path reaching the same hash sees it satisfied and does not
    // re-deliver it.
    policy.commit(store, &hash, &block)?;
    tracing::trace!(%hash, kind = ?block.kind(), "delivered");

    Ok(Outcome::Satisfied)
}
