//! Benchmarks for ShareableTree against a locked BTreeMap baseline.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use parking_lot::RwLock;
use rand::prelude::*;
use shareable_tree::ShareableTree;
use std::collections::BTreeMap;
use std::thread;

/// Random letter-only words; shuffled so plain inserts do not degenerate into a list.
fn generate_words(n: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let len = rng.gen_range(3..10);
            (0..len)
                .map(|_| {
                    let c = rng.gen_range(0..52u8);
                    if c < 26 {
                        (b'A' + c) as char
                    } else {
                        (b'a' + c - 26) as char
                    }
                })
                .collect()
        })
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [1_000, 10_000, 50_000].iter() {
        let words = generate_words(*size, 1);

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), size, |b, _| {
            b.iter(|| {
                let map: RwLock<BTreeMap<String, usize>> = RwLock::new(BTreeMap::new());
                for w in words.iter() {
                    *map.write().entry(w.clone()).or_insert(0) += 1;
                }
                black_box(map)
            });
        });

        group.bench_with_input(BenchmarkId::new("ShareableTree", size), size, |b, _| {
            b.iter(|| {
                let tree = ShareableTree::new();
                for w in words.iter() {
                    tree.insert(w).unwrap();
                }
                black_box(tree)
            });
        });

        group.bench_with_input(BenchmarkId::new("ShareableTree/bulk", size), size, |b, _| {
            b.iter(|| black_box(ShareableTree::from_words(words.iter()).unwrap()));
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in [1_000, 10_000, 50_000].iter() {
        let words = generate_words(*size, 2);
        let tree = ShareableTree::from_words(words.iter()).unwrap();

        group.bench_with_input(BenchmarkId::new("single_thread", size), size, |b, _| {
            b.iter(|| {
                let mut sum = 0usize;
                for w in words.iter() {
                    if let Some(c) = tree.count(w).unwrap() {
                        sum += c;
                    }
                }
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("four_readers", size), size, |b, _| {
            b.iter(|| {
                thread::scope(|s| {
                    for chunk in words.chunks(words.len() / 4 + 1) {
                        let tree = &tree;
                        s.spawn(move || {
                            let hits = chunk
                                .iter()
                                .filter(|w| tree.contains(w).unwrap())
                                .count();
                            black_box(hits)
                        });
                    }
                });
            });
        });
    }

    group.finish();
}

fn bench_rebalance(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebalance");

    for size in [1_000, 10_000].iter() {
        let words = generate_words(*size, 3);
        let tree = ShareableTree::new();
        for w in words.iter() {
            tree.insert(w).unwrap();
        }

        group.bench_with_input(BenchmarkId::new("ShareableTree", size), size, |b, _| {
            b.iter(|| {
                tree.rebalance();
                black_box(tree.height())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup, bench_rebalance);
criterion_main!(benches);
