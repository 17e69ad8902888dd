//! Benchmark: pull-resolving a deep staged chain.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use lattice_core::{Block, BlockHash};
use lattice_store::MemoryLedger;
use lattice_sync::PullResolver;
use lattice_testkit::fixtures::LedgerFixture;

const CHAIN_DEPTH: usize = 200;

fn staged_chain_fixture() -> (LedgerFixture, BlockHash) {
    let fixture = LedgerFixture::with_seed([0x77; 32]);
    let base = fixture.make_send(BlockHash::from_bytes([0xfe; 32]), fixture.account(), 1);
    fixture.canonicalize(&base);
    let chain = fixture.staged_chain(base.hash(), CHAIN_DEPTH);
    let tip = chain.last().unwrap().hash();
    (fixture, tip)
}

fn bench_pull_resolve(c: &mut Criterion) {
    c.bench_function("pull_resolve_chain_200", |b| {
        b.iter_batched(
            staged_chain_fixture,
            |(fixture, tip)| {
                let store: &MemoryLedger = &fixture.store;
                let mut delivered = 0u64;
                let mut sync = PullResolver::new(store, |_: &Block| delivered += 1);
                let incomplete = sync.synchronize(tip).unwrap();
                assert!(!incomplete);
                assert_eq!(delivered, CHAIN_DEPTH as u64);
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_pull_resolve);
criterion_main!(benches);
