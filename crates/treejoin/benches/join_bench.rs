//! Benchmarks for positional and keyed joins.
//!
//! Run with: cargo bench -p treejoin --bench join_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use treejoin::Selection;
use treejoin_dom::{Document, NodeId};

/// A `<ul>` holding `n` items with data `0..n`.
fn make_list(n: usize) -> (Document<u64>, Selection<Document<u64>>) {
    let mut doc = Document::new();
    let root = doc.root();
    let ul = doc.element(root, "ul");
    let items: Vec<NodeId> = (0..n)
        .map(|i| {
            let li = doc.element(ul, "li");
            doc.set_node_datum(li, Some(i as u64));
            li
        })
        .collect();
    (doc, Selection::from_nodes(Some(ul), items))
}

/// Data keeping every other key and adding as many new ones.
fn shifted(n: usize) -> Vec<u64> {
    (0..n as u64).map(|i| if i % 2 == 0 { i } else { i + n as u64 }).collect()
}

fn bench_join_positional(c: &mut Criterion) {
    let mut group = c.benchmark_group("join/positional");

    for n in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(n as u64));
        let (mut doc, sel) = make_list(n);
        let data = shifted(n);
        group.bench_with_input(BenchmarkId::new("join", n), &(), |b, _| {
            b.iter(|| black_box(sel.join(&mut doc, data.clone())))
        });
    }

    group.finish();
}

fn bench_join_keyed(c: &mut Criterion) {
    let mut group = c.benchmark_group("join/keyed");

    for n in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(n as u64));
        let (mut doc, sel) = make_list(n);
        let data = shifted(n);
        group.bench_with_input(BenchmarkId::new("join_by", n), &(), |b, _| {
            b.iter(|| {
                // Rebind the original keys so every iteration sees the same split.
                let _ = sel.join(&mut doc, (0..n as u64).collect::<Vec<_>>());
                black_box(sel.join_by(&mut doc, data.clone(), |d, _| *d))
            })
        });
    }

    group.finish();
}

fn bench_each_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("each/nested");

    for rows in [10, 100] {
        let mut doc = Document::<u64>::new();
        let root = doc.root();
        let table = doc.element(root, "table");
        for _ in 0..rows {
            let tr = doc.element(table, "tr");
            for _ in 0..10 {
                doc.element(tr, "td");
            }
        }
        let cells = Selection::select_all_root(&mut doc, "tr")
            .and_then(|rows| rows.select_all(&mut doc, "td"));
        let Ok(cells) = cells else {
            continue;
        };
        group.throughput(Throughput::Elements(rows as u64 * 10));
        group.bench_with_input(BenchmarkId::new("each", rows), &(), |b, _| {
            b.iter(|| {
                let mut sum = 0;
                cells.each(&mut doc, |_, _, ctx| sum += ctx.index());
                black_box(sum)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_join_positional, bench_join_keyed, bench_each_nested);
criterion_main!(benches);
