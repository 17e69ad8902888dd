//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: a keypair-plus-store bundle
//! and signed-block constructors for all four kinds.

use lattice_core::{
    Amount, AccountId, Block, BlockHash, ChangeBlock, Keypair, OpenBlock, ReceiveBlock, SendBlock,
};
use lattice_store::{LedgerStore, MemoryLedger};

/// A test fixture with a keypair and memory ledger.
pub struct LedgerFixture {
    pub keypair: Keypair,
    pub store: MemoryLedger,
}

impl LedgerFixture {
    /// Create a new test fixture with a random keypair.
    pub fn new() -> Self {
        Self {
            keypair: Keypair::generate(),
            store: MemoryLedger::new(),
        }
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            keypair: Keypair::from_seed(&seed),
            store: MemoryLedger::new(),
        }
    }

    /// Get the fixture account.
    pub fn account(&self) -> AccountId {
        self.keypair.account()
    }

    /// Create a signed send block.
    pub fn make_send(&self, previous: BlockHash, destination: AccountId, balance: u128) -> Block {
        signed_send(&self.keypair, previous, destination, balance)
    }

    /// Create a signed receive block.
    pub fn make_receive(&self, previous: BlockHash, source: BlockHash) -> Block {
        signed_receive(&self.keypair, previous, source)
    }

    /// Create a signed open block for the fixture account.
    pub fn make_open(&self, source: BlockHash) -> Block {
        signed_open(&self.keypair, source)
    }

    /// Create a signed change block.
    pub fn make_change(&self, previous: BlockHash, representative: AccountId) -> Block {
        signed_change(&self.keypair, previous, representative)
    }

    /// Insert a block into the canonical collection.
    pub fn canonicalize(&self, block: &Block) -> BlockHash {
        let hash = block.hash();
        self.store.canonical_put(&hash, block).unwrap();
        hash
    }

    /// Insert a block into the staged collection.
    pub fn stage(&self, block: &Block) -> BlockHash {
        let hash = block.hash();
        self.store.staged_put(&hash, block).unwrap();
        hash
    }

    /// Mark a block's hash unsynced.
    pub fn mark_unsynced(&self, block: &Block) -> BlockHash {
        let hash = block.hash();
        self.store.unsynced_mark(&hash).unwrap();
        hash
    }

    /// Build and stage a linear chain of `len` sends above `base`.
    ///
    /// Returns the chain bottom-to-top; the last element is the tip.
    pub fn staged_chain(&self, base: BlockHash, len: usize) -> Vec<Block> {
        let mut chain = Vec::with_capacity(len);
        let mut previous = base;
        for _ in 0..len {
            let block = self.make_send(previous, self.account(), 0);
            previous = block.hash();
            self.stage(&block);
            chain.push(block);
        }
        chain
    }
}

impl Default for LedgerFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple deterministic keypairs for multi-account tests.
pub fn keypairs(count: usize) -> Vec<Keypair> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            seed[1] = 0x5a;
            Keypair::from_seed(&seed)
        })
        .collect()
}

/// Create a signed send block.
pub fn signed_send(
    keypair: &Keypair,
    previous: BlockHash,
    destination: AccountId,
    balance: u128,
) -> Block {
    let mut block: Block = SendBlock::new(previous, destination, Amount(balance)).into();
    block.sign(keypair);
    block
}

/// Create a signed receive block.
pub fn signed_receive(keypair: &Keypair, previous: BlockHash, source: BlockHash) -> Block {
    let mut block: Block = ReceiveBlock::new(previous, source).into();
    block.sign(keypair);
    block
}

/// Create a signed open block naming the keypair's own account.
pub fn signed_open(keypair: &Keypair, source: BlockHash) -> Block {
    let mut block: Block = OpenBlock::new(source, keypair.account(), keypair.account()).into();
    block.sign(keypair);
    block
}

/// Create a signed change block.
pub fn signed_change(keypair: &Keypair, previous: BlockHash, representative: AccountId) -> Block {
    let mut block: Block = ChangeBlock::new(previous, representative).into();
    block.sign(keypair);
    block
}
