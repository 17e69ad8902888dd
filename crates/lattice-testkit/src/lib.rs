//! # Lattice Testkit
//!
//! Testing utilities for the lattice ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: keypair-plus-store bundles and signed-block constructors
//!   for setting up ledger scenarios
//! - **Generators**: proptest strategies for property-based testing
//! - **Consistency vectors**: seeded, self-verifying encode/hash/sign
//!   cases for cross-implementation comparison
//!
//! ## Test Fixtures
//!
//! Quickly set up a scenario:
//!
//! ```rust
//! use lattice_testkit::fixtures::LedgerFixture;
//! use lattice_core::BlockHash;
//!
//! let fixture = LedgerFixture::new();
//! let base = fixture.make_send(BlockHash::from_bytes([1; 32]), fixture.account(), 100);
//! fixture.canonicalize(&base);
//! let chain = fixture.staged_chain(base.hash(), 4);
//! assert_eq!(chain.len(), 4);
//! ```
//!
//! ## Consistency Vectors
//!
//! ```rust
//! use lattice_testkit::vectors::{all_vectors, verify_all_vectors};
//!
//! verify_all_vectors().unwrap();
//! for vector in all_vectors() {
//!     println!("{}: {}", vector.name, vector.hash);
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{
    keypairs, signed_change, signed_open, signed_receive, signed_send, LedgerFixture,
};
pub use vectors::{all_vectors, verify_all_vectors, ConsistencyVector};
