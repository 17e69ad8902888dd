//! Proptest generators for property-based testing.

use proptest::prelude::*;

use lattice_core::{
    Amount, AccountId, Block, BlockHash, ChangeBlock, Keypair, OpenBlock, ReceiveBlock, SendBlock,
};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random non-sentinel BlockHash.
pub fn block_hash() -> impl Strategy<Value = BlockHash> {
    any::<[u8; 32]>()
        .prop_filter("sentinel hash never names a block", |b| b != &[0u8; 32])
        .prop_map(BlockHash::from_bytes)
}

/// Generate a random AccountId.
pub fn account_id() -> impl Strategy<Value = AccountId> {
    any::<[u8; 32]>().prop_map(AccountId::from_bytes)
}

/// Generate a random Amount.
pub fn amount() -> impl Strategy<Value = Amount> {
    any::<u128>().prop_map(Amount)
}

/// Generate a random unsigned block of any kind.
pub fn block() -> impl Strategy<Value = Block> {
    prop_oneof![
        (block_hash(), account_id(), amount())
            .prop_map(|(prev, dest, balance)| SendBlock::new(prev, dest, balance).into()),
        (block_hash(), block_hash())
            .prop_map(|(prev, source)| ReceiveBlock::new(prev, source).into()),
        (block_hash(), account_id(), account_id())
            .prop_map(|(source, rep, account)| OpenBlock::new(source, rep, account).into()),
        (block_hash(), account_id())
            .prop_map(|(prev, rep)| ChangeBlock::new(prev, rep).into()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{keypairs, signed_open, signed_receive, signed_send, LedgerFixture};
    use lattice_core::{canonical_bytes, decode_block};
    use lattice_store::LedgerStore;
    use lattice_sync::PullResolver;

    proptest! {
        #[test]
        fn prop_hash_deterministic_and_trailer_free(b in block()) {
            prop_assert_eq!(b.hash(), b.hash());

            // Signing must not change identity.
            let mut signed = b.clone();
            signed.sign(&Keypair::from_seed(&[7; 32]));
            prop_assert_eq!(signed.hash(), b.hash());
        }

        #[test]
        fn prop_canonical_roundtrip(b in block()) {
            let decoded = decode_block(&canonical_bytes(&b)).unwrap();
            prop_assert_eq!(decoded, b);
        }

        #[test]
        fn prop_chain_delivers_in_order(seed in any::<[u8; 32]>(), depth in 1usize..=12) {
            let fixture = LedgerFixture::with_seed(seed);
            let base = fixture.make_send(BlockHash::from_bytes([0xfe; 32]), fixture.account(), 1);
            fixture.canonicalize(&base);

            let chain = fixture.staged_chain(base.hash(), depth);
            let expected: Vec<_> = chain.iter().map(|b| b.hash()).collect();
            let target = *expected.last().unwrap();

            let mut delivered = Vec::new();
            let mut sync = PullResolver::new(&fixture.store, |b: &Block| delivered.push(b.hash()));
            prop_assert!(!sync.synchronize(target).unwrap());
            prop_assert_eq!(&delivered, &expected);

            // Second run: everything already canonical.
            delivered.clear();
            let mut sync = PullResolver::new(&fixture.store, |b: &Block| delivered.push(b.hash()));
            prop_assert!(!sync.synchronize(target).unwrap());
            prop_assert!(delivered.is_empty());
        }

        #[test]
        fn prop_diamond_delivers_shared_ancestor_once(
            prev_len in 0usize..=4,
            src_len in 0usize..=4,
        ) {
            let kps = keypairs(2);
            let fixture = LedgerFixture::with_seed([0x21; 32]);
            let store = &fixture.store;

            // Canonical base, staged shared ancestor above it.
            let base = signed_send(&kps[0], BlockHash::from_bytes([0xfd; 32]), kps[1].account(), 9);
            store.canonical_put(&base.hash(), &base).unwrap();
            let shared = signed_send(&kps[0], base.hash(), kps[1].account(), 8);
            store.staged_put(&shared.hash(), &shared).unwrap();

            // Previous branch: first account keeps extending its chain.
            let mut prev_branch = Vec::new();
            let mut prev_top = shared.hash();
            for _ in 0..prev_len {
                let b = signed_send(&kps[0], prev_top, kps[1].account(), 7);
                prev_top = b.hash();
                store.staged_put(&b.hash(), &b).unwrap();
                prev_branch.push(b.hash());
            }

            // Source branch: second account opens from the shared send.
            let open = signed_open(&kps[1], shared.hash());
            store.staged_put(&open.hash(), &open).unwrap();
            let mut src_branch = vec![open.hash()];
            let mut src_top = open.hash();
            for _ in 0..src_len {
                let b = signed_send(&kps[1], src_top, kps[0].account(), 6);
                src_top = b.hash();
                store.staged_put(&b.hash(), &b).unwrap();
                src_branch.push(b.hash());
            }

            // Target: both branches converge on `shared`.
            let target = signed_receive(&kps[0], prev_top, src_top);
            store.staged_put(&target.hash(), &target).unwrap();

            let mut delivered = Vec::new();
            let mut sync = PullResolver::new(store, |b: &Block| delivered.push(b.hash()));
            prop_assert!(!sync.synchronize(target.hash()).unwrap());

            // Exactly once, and first: the shared ancestor.
            let shared_count = delivered.iter().filter(|h| **h == shared.hash()).count();
            prop_assert_eq!(shared_count, 1);
            prop_assert_eq!(delivered[0], shared.hash());

            // Every previous-branch block precedes every source-branch block,
            // and the target comes last.
            let pos = |h: &BlockHash| delivered.iter().position(|d| d == h).unwrap();
            for p in &prev_branch {
                for s in &src_branch {
                    prop_assert!(pos(p) < pos(s));
                }
            }
            prop_assert_eq!(*delivered.last().unwrap(), target.hash());
            prop_assert_eq!(delivered.len(), 1 + prev_branch.len() + src_branch.len() + 1);
        }
    }
}
