use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use kouritsu_core::{
    calculate_shanten, BatchConfig, BatchEvaluator, DecisionRequest, HandCounts, PlayerHand,
    RevealedCounts, TileEfficiencyEngine, TileType,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic 14-tile deals with the next 20 wall tiles as discards.
fn deals(count: u64) -> Vec<DecisionRequest> {
    (0..count)
        .map(|seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut wall: Vec<TileType> = TileType::all()
                .flat_map(|t| std::iter::repeat(t).take(4))
                .collect();
            for i in (1..wall.len()).rev() {
                let j = rng.random_range(0..=i);
                wall.swap(i, j);
            }
            let hand = PlayerHand::closed(HandCounts::from_tiles(&wall[..14]).unwrap());
            let mut revealed = RevealedCounts::new();
            revealed.observe_hand(&hand).unwrap();
            for &t in &wall[14..34] {
                revealed.on_discard(t).unwrap();
            }
            DecisionRequest { hand, revealed }
        })
        .collect()
}

fn bench_shanten(c: &mut Criterion) {
    let hands: Vec<HandCounts> = deals(256).iter().map(|r| *r.hand.closed_counts()).collect();
    c.bench_function("shanten_256_hands_uncached", |b| {
        b.iter(|| {
            hands
                .iter()
                .map(|h| calculate_shanten(h, &[]).unwrap() as i32)
                .sum::<i32>()
        });
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let reqs = deals(16);
    c.bench_function("evaluate_discards_16_hands", |b| {
        b.iter_batched(
            TileEfficiencyEngine::new,
            |mut engine| {
                for r in &reqs {
                    engine.new_hand();
                    engine.evaluate_discards(&r.hand, &r.revealed).unwrap();
                }
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_batch(c: &mut Criterion) {
    let reqs = deals(64);
    let evaluator = BatchEvaluator::new(&BatchConfig::default()).unwrap();
    c.bench_function("batch_64_decisions", |b| {
        b.iter(|| evaluator.run_batch(&reqs));
    });
}

criterion_group!(benches, bench_shanten, bench_evaluate, bench_batch);
criterion_main!(benches);
