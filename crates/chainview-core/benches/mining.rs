use chainview_core::{mine::mine_block_parallel, pow::mine_block, Block, Transaction};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn demo_transactions() -> Vec<Transaction> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..10)
        .map(|i| Transaction {
            sender: format!("alice-{i}"),
            recipient: "bob".into(),
            amount: rng.gen_range(1..10),
        })
        .collect()
}

fn bench_mining(c: &mut Criterion) {
    let txs = demo_transactions();

    c.bench_function("mine_block_difficulty_3", |b| {
        let block = Block::new(1, txs.clone(), 1_600_000_000, "0".into());
        b.iter(|| mine_block(block.clone(), 3));
    });

    c.bench_function("mine_block_parallel_difficulty_3", |b| {
        b.iter(|| mine_block_parallel(1, txs.clone(), 1_600_000_000, "0".into(), 3));
    });
}

criterion_group!(benches, bench_mining);
criterion_main!(benches);
