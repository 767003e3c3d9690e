//! Lot engine performance benchmarks.
//!
//! Run with: cargo bench -p taxlot-core

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::NaiveDate;
use taxlot_core::{LotBook, TradeEvent};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Generate a stream of N buys followed by sells draining half the shares.
fn generate_stream(num_buys: usize) -> Vec<TradeEvent> {
    let mut events = Vec::with_capacity(num_buys * 2);

    for i in 0..num_buys {
        events.push(TradeEvent::Buy {
            date: date(2022, 1, 1 + (i % 28) as u32),
            quantity: 10.0,
            price: 100.0 + i as f64,
        });
    }
    for i in 0..num_buys {
        events.push(TradeEvent::Sell {
            date: date(2023, 1, 1 + (i % 28) as u32),
            quantity: 5.0,
            price: 150.0,
        });
    }

    events
}

fn bench_process_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_stream");

    for size in [10, 100, 1000] {
        let events = generate_stream(size);
        group.throughput(Throughput::Elements(events.len() as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &events, |b, events| {
            b.iter_batched(
                || LotBook::new("STOCK"),
                |mut book| {
                    let realized = book.process(events);
                    black_box((book, realized))
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_split_rescale(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_rescale");

    for size in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let mut book = LotBook::new("STOCK");
                    for i in 0..size {
                        book.apply(&TradeEvent::Buy {
                            date: date(2022, 1, 1 + (i % 28) as u32),
                            quantity: 10.0,
                            price: 100.0,
                        });
                    }
                    book
                },
                |mut book| {
                    book.apply(&TradeEvent::Split {
                        date: date(2023, 1, 1),
                        extra_shares: 10.0 * size as f64,
                    });
                    black_box(book)
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_oversell_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("oversell_drain");

    for size in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let mut book = LotBook::new("STOCK");
                    for i in 0..size {
                        book.apply(&TradeEvent::Buy {
                            date: date(2022, 1, 1 + (i % 28) as u32),
                            quantity: 10.0,
                            price: 100.0,
                        });
                    }
                    book
                },
                |mut book| {
                    // One sell that drains every lot and then some.
                    let realized = book.apply(&TradeEvent::Sell {
                        date: date(2023, 1, 1),
                        quantity: 10.0 * size as f64 + 1.0,
                        price: 150.0,
                    });
                    black_box((book, realized))
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_process_stream,
    bench_split_rescale,
    bench_oversell_drain,
);
criterion_main!(benches);
