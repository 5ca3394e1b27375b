// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Benchmarks for the points ledger.
//!
//! Run with: cargo bench
//!
//! Benchmarks include:
//! - Single-threaded credits and debits
//! - Parallel credits against one and many customers
//! - Read-heavy mixed workloads under the shared lock

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use loyalty_points::{Customer, CustomerId, Ledger};
use rayon::prelude::*;
use std::sync::Arc;

// =============================================================================
// Helper Functions
// =============================================================================

fn customer_ids(count: usize) -> Vec<CustomerId> {
    (0..count).map(|i| CustomerId(format!("cust-{i:06}"))).collect()
}

fn seeded_ledger(ids: &[CustomerId], points: i64) -> Ledger {
    let ledger = Ledger::new();
    for id in ids {
        ledger
            .register(Customer::new(id.clone()).with_points(points))
            .unwrap();
    }
    ledger
}

// =============================================================================
// Single-Threaded Benchmarks
// =============================================================================

fn bench_single_credit(c: &mut Criterion) {
    let ledger = Ledger::new();
    let id = CustomerId::from("cust-001");

    c.bench_function("single_credit", |b| {
        b.iter(|| {
            ledger.credit(black_box(&id), black_box(10), "bench").unwrap();
        })
    });
}

fn bench_single_debit(c: &mut Criterion) {
    let id = CustomerId::from("cust-001");
    let ledger = seeded_ledger(std::slice::from_ref(&id), i64::MAX / 2);

    c.bench_function("single_debit", |b| {
        b.iter(|| {
            ledger.debit(black_box(&id), black_box(1), "bench").unwrap();
        })
    });
}

fn bench_get_balance(c: &mut Criterion) {
    let ids = customer_ids(1_000);
    let ledger = seeded_ledger(&ids, 100);

    c.bench_function("get_balance", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 1) % ids.len();
            black_box(ledger.get_balance(&ids[i]).unwrap());
        })
    });
}

fn bench_credit_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("credit_throughput");

    for count in [100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let id = CustomerId::from("cust-001");
            b.iter(|| {
                let ledger = Ledger::new();
                for _ in 0..count {
                    ledger.credit(&id, 10, "bench").unwrap();
                }
                black_box(&ledger);
            })
        });
    }
    group.finish();
}

// =============================================================================
// Multi-Threaded Benchmarks
// =============================================================================

fn bench_parallel_credits_same_customer(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_credits_same_customer");

    for count in [1_000, 10_000, 100_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let id = CustomerId::from("cust-001");
            b.iter(|| {
                let ledger = Arc::new(Ledger::new());
                (0..count).into_par_iter().for_each(|_| {
                    ledger.credit(&id, 1, "bench").unwrap();
                });
                black_box(&ledger);
            })
        });
    }
    group.finish();
}

fn bench_parallel_credits_different_customers(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_credits_different_customers");
    let ids = customer_ids(10_000);

    for count in [1_000, 10_000, 100_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                let ledger = Arc::new(Ledger::new());
                (0..count).into_par_iter().for_each(|i| {
                    ledger.credit(&ids[i % ids.len()], 1, "bench").unwrap();
                });
                black_box(&ledger);
            })
        });
    }
    group.finish();
}

fn bench_parallel_read_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_read_heavy");
    let ids = customer_ids(100);

    // One write per `reads_per_write` lookups
    for reads_per_write in [1usize, 10, 100].iter() {
        let total_ops = 10_000u64;
        group.throughput(Throughput::Elements(total_ops));
        group.bench_with_input(
            BenchmarkId::from_parameter(reads_per_write),
            reads_per_write,
            |b, &reads_per_write| {
                b.iter(|| {
                    let ledger = seeded_ledger(&ids, 1_000);
                    (0..total_ops as usize).into_par_iter().for_each(|i| {
                        let id = &ids[i % ids.len()];
                        if i % (reads_per_write + 1) == 0 {
                            let _ = ledger.debit(id, 1, "bench");
                        } else {
                            black_box(ledger.get_balance(id).unwrap());
                        }
                    });
                    black_box(&ledger);
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    single_threaded,
    bench_single_credit,
    bench_single_debit,
    bench_get_balance,
    bench_credit_throughput,
);

criterion_group!(
    multi_threaded,
    bench_parallel_credits_same_customer,
    bench_parallel_credits_different_customers,
    bench_parallel_read_heavy,
);

criterion_main!(single_threaded, multi_threaded);
