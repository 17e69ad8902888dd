//! # Lattice Sync
//!
//! Dependency resolution for the lattice ledger: given a target block
//! hash, reconstruct and deliver, in causally-correct order, every
//! ancestor the target transitively depends on that has not yet been
//! handled — once each, even across diamond-shaped dependency graphs.
//!
//! ## The two directions
//!
//! - [`PullResolver`] brings the local node up to date: staged blocks are
//!   delivered bottom-up and inserted into the canonical collection.
//! - [`PushResolver`] propagates local blocks outward: canonical blocks
//!   still marked unsynced are delivered bottom-up and their markers
//!   cleared.
//!
//! Both are the same depth-first walk over `previous`/`source` references
//! (see [`walk`]); they differ only in their [`WalkPolicy`].
//!
//! ## Key Properties
//!
//! - **Ordered**: a block's full `previous` ancestry is delivered before
//!   its full `source` ancestry, which is delivered before the block.
//! - **Exactly-once**: the post-delivery store effect lands before each
//!   recursive frame returns, so a shared ancestor reached again later in
//!   the same walk is seen as satisfied.
//! - **Restartable**: `synchronize` is safe to repeat after fetching a
//!   missing block; satisfied ancestors are skipped silently.
//!
//! ## Usage
//!
//! ```rust
//! use lattice_store::{LedgerStore, MemoryLedger};
//! use lattice_sync::PullResolver;
//! use lattice_core::{Amount, AccountId, Block, BlockHash, SendBlock};
//!
//! let store = MemoryLedger::new();
//! let base: Block =
//!     SendBlock::new(BlockHash::from_bytes([1; 32]), AccountId::from_bytes([9; 32]), Amount(5))
//!         .into();
//! let tip: Block =
//!     SendBlock::new(base.hash(), AccountId::from_bytes([9; 32]), Amount(4)).into();
//! store.canonical_put(&base.hash(), &base).unwrap();
//! store.staged_put(&tip.hash(), &tip).unwrap();
//!
//! let mut delivered = Vec::new();
//! let mut sync = PullResolver::new(&store, |block: &Block| delivered.push(block.hash()));
//! let incomplete = sync.synchronize(tip.hash()).unwrap();
//! assert!(!incomplete);
//! assert_eq!(delivered, vec![tip.hash()]);
//! ```

pub mod error;
pub mod pull;
pub mod push;
pub mod walk;

pub use error::{Result, SyncError};
pub use pull::PullResolver;
pub use push::PushResolver;
pub use walk::{Outcome, SyncConfig, WalkPolicy};
