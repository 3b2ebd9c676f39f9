//! Benchmarks for the streak signal engine

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use poly_streak::market::RoundId;
use poly_streak::resolver::{Direction, Resolution, ResolutionMethod, ResolvedRound};
use poly_streak::signal::{
    compute_signals, dedupe_longest, latest_next_prediction, summarize, StreakRange,
};

/// Deterministic pseudo-random timeline with occasional unresolved rounds
fn timeline(len: usize) -> Vec<ResolvedRound> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    (0..len)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let id = RoundId::new("btc-updown-5m-", i as i64 * 300);
            let resolution = match state % 10 {
                0 => Resolution::unresolved(ResolutionMethod::PriceHistory, None, None),
                r if r < 5 => Resolution::settled(Direction::Up, ResolutionMethod::Direct, None, None),
                _ => Resolution::settled(Direction::Down, ResolutionMethod::Direct, None, None),
            };
            ResolvedRound::from_resolution(&id, resolution)
        })
        .collect()
}

fn benchmark_compute_signals(c: &mut Criterion) {
    let rounds = timeline(300);
    let range = StreakRange::new(1, 500);

    c.bench_function("compute_signals_300_rounds", |b| {
        b.iter(|| compute_signals(black_box(&rounds), range))
    });
}

fn benchmark_summary_pipeline(c: &mut Criterion) {
    let rounds = timeline(300);
    let range = StreakRange::new(3, 8);

    c.bench_function("signals_summary_next", |b| {
        b.iter(|| {
            let signals = compute_signals(black_box(&rounds), range);
            let by_n = summarize(&signals, range);
            let deduped = dedupe_longest(&signals);
            let next = latest_next_prediction(&rounds, range, 300);
            (by_n, deduped, next)
        })
    });
}

criterion_group!(benches, benchmark_compute_signals, benchmark_summary_pipeline);
criterion_main!(benches);
