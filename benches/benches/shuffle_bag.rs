// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use understory_shuffle_bag::{WeightedEntry, WeightedShuffleBag};

fn seeded_bag(len: u32, weight: u32) -> WeightedShuffleBag<u32> {
    let mut bag =
        WeightedShuffleBag::with_capacity_and_rng(len as usize, SmallRng::seed_from_u64(1));
    for key in 0..len {
        bag.add(key, weight).unwrap();
    }
    bag
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("shuffle_bag/add");

    for len in [128_u32, 1_024, 8_192] {
        group.throughput(Throughput::Elements(u64::from(len)));
        group.bench_with_input(BenchmarkId::new("distinct", len), &len, |b, &len| {
            b.iter_batched(
                || WeightedShuffleBag::with_rng(SmallRng::seed_from_u64(2)),
                |mut bag| {
                    for key in 0..len {
                        bag.add(key, 3).unwrap();
                    }
                    black_box(bag);
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("shuffle_bag/next_random");

    // Draw two full epochs so every iteration pays for one reshuffle.
    for len in [16_u32, 256, 4_096] {
        let draws = (len * 4 * 2) as usize;
        group.throughput(Throughput::Elements(draws as u64));
        group.bench_with_input(BenchmarkId::new("two_epochs", len), &len, |b, &len| {
            let mut bag = seeded_bag(len, 4);
            b.iter(|| {
                for _ in 0..draws {
                    black_box(bag.next_random());
                }
            });
        });
    }

    group.finish();
}

fn bench_remove_front(c: &mut Criterion) {
    let mut group = c.benchmark_group("shuffle_bag/remove_all_of");

    // Removing from the front shifts every later index in both the index and
    // the draw sequence.
    for len in [128_u32, 1_024, 4_096] {
        group.throughput(Throughput::Elements(u64::from(len)));
        group.bench_with_input(BenchmarkId::new("front", len), &len, |b, &len| {
            b.iter_batched(
                || seeded_bag(len, 2),
                |mut bag| {
                    for key in 0..len {
                        black_box(bag.remove_all_of(&key));
                    }
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("shuffle_bag/reconcile");

    for len in [128_u32, 1_024, 8_192] {
        // Every element appears twice, as after a careless merge of two saves.
        let registry: Vec<WeightedEntry<u32>> = (0..len)
            .chain(0..len)
            .map(|key| WeightedEntry::new(key, 2))
            .collect();
        group.throughput(Throughput::Elements(registry.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("with_duplicates", len),
            &registry,
            |b, registry| {
                b.iter_batched(
                    || {
                        WeightedShuffleBag::from_persistable(
                            registry.clone(),
                            SmallRng::seed_from_u64(3),
                        )
                    },
                    |mut bag| {
                        bag.reconcile();
                        black_box(bag);
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_add,
    bench_draw,
    bench_remove_front,
    bench_reconcile
);
criterion_main!(benches);
