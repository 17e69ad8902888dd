//! # Lattice
//!
//! Unified API for the lattice ledger: a content-addressed block store
//! with pull and push dependency resolution.
//!
//! ## Overview
//!
//! A lattice ledger is a set of per-account block chains linked by
//! send/receive references. Blocks can arrive in any order; the node's
//! job is to integrate them in causally-correct order. The [`Node`]
//! facade wires a [`LedgerStore`](lattice_store::LedgerStore) to the two
//! resolvers:
//!
//! - **catch up** (pull): resolve a staged target's ancestry into the
//!   canonical collection, delivering each block bottom-up.
//! - **flush** (push): deliver every canonical-but-unbroadcast ancestor
//!   of a target, clearing its unsynced marker.
//!
//! ## Usage
//!
//! ```rust
//! use lattice::{Node, NodeConfig};
//! use lattice_core::{Amount, AccountId, Block, BlockHash, SendBlock};
//! use lattice_store::{LedgerStore, MemoryLedger};
//!
//! let node = Node::new(MemoryLedger::new(), NodeConfig::default());
//!
//! let base: Block = SendBlock::new(
//!     BlockHash::from_bytes([1; 32]),
//!     AccountId::from_bytes([2; 32]),
//!     Amount(10),
//! )
//! .into();
//! let tip: Block = SendBlock::new(base.hash(), AccountId::from_bytes([2; 32]), Amount(9)).into();
//!
//! node.store().canonical_put(&base.hash(), &base).unwrap();
//! node.stage(tip.clone()).unwrap();
//!
//! let summary = node.catch_up(tip.hash(), |_block| {}).unwrap();
//! assert!(!summary.incomplete);
//! assert_eq!(summary.delivered, 1);
//! ```

pub mod error;
pub mod node;

pub use error::{NodeError, Result};
pub use node::{Node, NodeConfig, SyncSummary};
