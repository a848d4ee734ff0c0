// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Benchmarks for dense component storage
//!
//! These benchmarks measure:
//! - Insert throughput into a fresh store
//! - Random access (get) performance
//! - Swap-remove cost
//! - Bulk iteration over the dense array

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ecs_core::ecs::{Component, ComponentStore, Entity, MAX_ENTITIES};

#[derive(Clone, Copy)]
struct Position {
    x: f64,
    y: f64,
    z: f64,
}

impl Component for Position {}

fn position(i: usize) -> Position {
    Position {
        x: i as f64,
        y: i as f64 * 2.0,
        z: i as f64 * 3.0,
    }
}

fn filled(count: usize) -> ComponentStore<Position> {
    let mut store = ComponentStore::new();
    for i in 0..count {
        store.insert(Entity::new(i as u32), position(i)).unwrap();
    }
    store
}

const SIZES: [usize; 3] = [100, 500, MAX_ENTITIES];

/// Benchmark: Insert N components into a store
fn bench_store_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_insert");

    for count in SIZES.iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| black_box(filled(count)));
        });
    }

    group.finish();
}

/// Benchmark: Random access (get) performance
fn bench_store_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_get");

    for count in SIZES.iter() {
        let store = filled(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                let mut sum = 0.0;
                // Stride through ids to defeat sequential prefetching.
                for i in 0..count {
                    let id = (i * 7919) % count;
                    sum += store.get(Entity::new(id as u32)).unwrap().x;
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

/// Benchmark: Remove every other component
fn bench_store_swap_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_swap_remove");

    for count in SIZES.iter() {
        group.throughput(Throughput::Elements(*count as u64 / 2));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter_batched(
                || filled(count),
                |mut store| {
                    for i in (0..count).step_by(2) {
                        store.remove(Entity::new(i as u32)).unwrap();
                    }
                    store
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark: Sum over the dense array
fn bench_store_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_iterate");

    for count in SIZES.iter() {
        let store = filled(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| {
                let sum: f64 = store.values().iter().map(|p| p.x + p.y + p.z).sum();
                black_box(sum)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_store_insert,
    bench_store_get,
    bench_store_swap_remove,
    bench_store_iterate
);
criterion_main!(benches);
