// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use understory_list_set::ListSet;

fn bench_front_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_set/front");

    // Front edits are the worst case: every later position is re-indexed.
    for len in [128_u32, 1_024, 4_096] {
        group.throughput(Throughput::Elements(u64::from(len)));

        group.bench_with_input(BenchmarkId::new("insert_at", len), &len, |b, &len| {
            b.iter_batched(
                ListSet::<u32>::new,
                |mut set| {
                    for key in 0..len {
                        set.insert_at(0, key);
                    }
                    black_box(set);
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("remove_at", len), &len, |b, &len| {
            b.iter_batched(
                || (0..len).collect::<ListSet<u32>>(),
                |mut set| {
                    while !set.is_empty() {
                        black_box(set.remove_at(0).ok());
                    }
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_contains(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_set/contains");

    for len in [128_u32, 8_192, 131_072] {
        let set: ListSet<u32> = (0..len).collect();
        group.throughput(Throughput::Elements(u64::from(len)));
        group.bench_with_input(BenchmarkId::new("hit_all", len), &set, |b, set| {
            b.iter(|| {
                for key in 0..len {
                    black_box(set.contains(&key));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_front_edits, bench_contains);
criterion_main!(benches);
