//! # Lattice Store
//!
//! Storage abstraction for the lattice ledger. Provides a trait-based
//! interface for block persistence with SQLite and in-memory
//! implementations.
//!
//! ## Overview
//!
//! The store keeps the three collections the synchronization machinery
//! works against — canonical blocks, staged blocks, and the unsynced
//! marker set — behind the [`LedgerStore`] trait. The primary
//! implementation is [`SqliteLedger`], with [`MemoryLedger`] for tests.
//!
//! ## Key Types
//!
//! - [`LedgerStore`] - The synchronous trait for all storage operations
//! - [`SqliteLedger`] - SQLite-based persistent storage
//! - [`MemoryLedger`] - In-memory storage for tests
//! - [`InsertOutcome`] - Result of inserting a block
//!
//! ## Design Notes
//!
//! - **Idempotent inserts**: Inserting the same block twice returns
//!   `AlreadyExists`
//! - **Synchronous visibility**: a mutation is visible to the next lookup
//!   as soon as the call returns; the resolvers' exactly-once delivery on
//!   shared ancestors depends on it

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryLedger;
pub use sqlite::SqliteLedger;
pub use traits::{InsertOutcome, LedgerStore};
