//! Block: the atomic unit of the ledger lattice.
//!
//! A block is an immutable, signed event in one account's chain. Once
//! hashed, it cannot be edited; changes are represented as new blocks.
//!
//! There are four kinds. Each carries zero, one, or two dependency
//! references that must resolve before the block itself can be applied:
//!
//! | kind    | `previous`          | `source`                |
//! |---------|---------------------|-------------------------|
//! | send    | prior chain block   | —                       |
//! | receive | prior chain block   | the send being received |
//! | open    | — (chain root)      | the send being received |
//! | change  | prior chain block   | —                       |

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hashable_bytes;
use crate::crypto::{AccountId, Ed25519Signature, Keypair};
use crate::types::{Amount, BlockHash};

/// Discriminator for the four block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockKind {
    /// Debits the sender's chain toward a destination account.
    Send = 1,
    /// Credits a previously sent amount into an existing chain.
    Receive = 2,
    /// First block of an account chain, receiving its initial send.
    Open = 3,
    /// Rotates the chain's representative.
    Change = 4,
}

impl BlockKind {
    /// Convert to u8 for serialization.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Try to parse from u8.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Send),
            2 => Some(Self::Receive),
            3 => Some(Self::Open),
            4 => Some(Self::Change),
            _ => None,
        }
    }
}

/// A send: moves an amount out of this chain toward `destination`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendBlock {
    /// Hash of the prior block in this account chain.
    pub previous: BlockHash,
    /// The account being paid.
    pub destination: AccountId,
    /// The sender's balance after this send.
    pub balance: Amount,
    /// Ed25519 signature over the block hash.
    pub signature: Ed25519Signature,
    /// Work nonce against `previous`.
    pub work: u64,
}

/// A receive: credits a pending send into an existing chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveBlock {
    /// Hash of the prior block in this account chain.
    pub previous: BlockHash,
    /// Hash of the send block being received.
    pub source: BlockHash,
    /// Ed25519 signature over the block hash.
    pub signature: Ed25519Signature,
    /// Work nonce against `previous`.
    pub work: u64,
}

/// An open: the root of an account chain, receiving its first send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenBlock {
    /// Hash of the send block being received.
    pub source: BlockHash,
    /// The representative chosen for this chain.
    pub representative: AccountId,
    /// The account this chain belongs to.
    pub account: AccountId,
    /// Ed25519 signature over the block hash.
    pub signature: Ed25519Signature,
    /// Work nonce against `account` (there is no previous).
    pub work: u64,
}

/// A change: rotates the chain's representative without moving funds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeBlock {
    /// Hash of the prior block in this account chain.
    pub previous: BlockHash,
    /// The new representative.
    pub representative: AccountId,
    /// Ed25519 signature over the block hash.
    pub signature: Ed25519Signature,
    /// Work nonce against `previous`.
    pub work: u64,
}

/// A block of any kind.
///
/// A closed sum type rather than a trait object: the dependency walk only
/// needs the uniform `previous()`/`source()` accessor pair, and a tagged
/// enum keeps that shape static.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Block {
    Send(SendBlock),
    Receive(ReceiveBlock),
    Open(OpenBlock),
    Change(ChangeBlock),
}

impl Block {
    /// The kind discriminator.
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Send(_) => BlockKind::Send,
            Block::Receive(_) => BlockKind::Receive,
            Block::Open(_) => BlockKind::Open,
            Block::Change(_) => BlockKind::Change,
        }
    }

    /// Compute the block hash (Blake3 of the canonical hashable bytes).
    ///
    /// Signature and work never feed the hash, so identity is stable
    /// before signing.
    pub fn hash(&self) -> BlockHash {
        BlockHash::digest(&canonical_hashable_bytes(self))
    }

    /// The prior block in the same account chain, if this kind carries one.
    pub fn previous(&self) -> Option<BlockHash> {
        match self {
            Block::Send(b) => Some(b.previous),
            Block::Receive(b) => Some(b.previous),
            Block::Open(_) => None,
            Block::Change(b) => Some(b.previous),
        }
    }

    /// The external block being referenced, if this kind carries one.
    pub fn source(&self) -> Option<BlockHash> {
        match self {
            Block::Send(_) => None,
            Block::Receive(b) => Some(b.source),
            Block::Open(b) => Some(b.source),
            Block::Change(_) => None,
        }
    }

    /// The work root: `previous` for chained kinds, the account for open.
    pub fn root(&self) -> BlockHash {
        match self {
            Block::Open(b) => BlockHash(b.account.0),
            _ => self.previous().unwrap_or(BlockHash::ZERO),
        }
    }

    /// The block's signature.
    pub fn signature(&self) -> &Ed25519Signature {
        match self {
            Block::Send(b) => &b.signature,
            Block::Receive(b) => &b.signature,
            Block::Open(b) => &b.signature,
            Block::Change(b) => &b.signature,
        }
    }

    /// The block's work nonce.
    pub fn work(&self) -> u64 {
        match self {
            Block::Send(b) => b.work,
            Block::Receive(b) => b.work,
            Block::Open(b) => b.work,
            Block::Change(b) => b.work,
        }
    }

    /// Re-sign this block's hash with the given keypair.
    ///
    /// The hash does not cover the signature, so signing never changes
    /// identity.
    pub fn sign(&mut self, keypair: &Keypair) {
        let signature = keypair.sign(self.hash().as_bytes());
        match self {
            Block::Send(b) => b.signature = signature,
            Block::Receive(b) => b.signature = signature,
            Block::Open(b) => b.signature = signature,
            Block::Change(b) => b.signature = signature,
        }
    }
}

impl SendBlock {
    /// Create an unsigned send with zero work.
    pub fn new(previous: BlockHash, destination: AccountId, balance: Amount) -> Self {
        Self {
            previous,
            destination,
            balance,
            signature: Ed25519Signature::ZERO,
            work: 0,
        }
    }
}

impl ReceiveBlock {
    /// Create an unsigned receive with zero work.
    pub fn new(previous: BlockHash, source: BlockHash) -> Self {
        Self {
            previous,
            source,
            signature: Ed25519Signature::ZERO,
            work: 0,
        }
    }
}

impl OpenBlock {
    /// Create an unsigned open with zero work.
    pub fn new(source: BlockHash, representative: AccountId, account: AccountId) -> Self {
        Self {
            source,
            representative,
            account,
            signature: Ed25519Signature::ZERO,
            work: 0,
        }
    }
}

impl ChangeBlock {
    /// Create an unsigned change with zero work.
    pub fn new(previous: BlockHash, representative: AccountId) -> Self {
        Self {
            previous,
            representative,
            signature: Ed25519Signature::ZERO,
            work: 0,
        }
    }
}

impl From<SendBlock> for Block {
    fn from(b: SendBlock) -> Self {
        Block::Send(b)
    }
}

impl From<ReceiveBlock> for Block {
    fn from(b: ReceiveBlock) -> Self {
        Block::Receive(b)
    }
}

impl From<OpenBlock> for Block {
    fn from(b: OpenBlock) -> Self {
        Block::Open(b)
    }
}

impl From<ChangeBlock> for Block {
    fn from(b: ChangeBlock) -> Self {
        Block::Change(b)
    }
}
