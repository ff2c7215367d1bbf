//! Benchmarks for the protocol front end and the demo search tree.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

use skirmish::game::GameRules;
use skirmish::nim::{NimRules, NimSearch};
use skirmish::tokenizer::tokenize;
use skirmish::{ExecMode, SearchCoordinator, SearchRequest};

fn bench_tokenizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenizer");

    let plain = "position startpos move 1 move 2 move 3 move 1 move 2";
    group.bench_function("plain", |b| b.iter(|| tokenize(black_box(plain))));

    let quoted = "setoption name \"soft time pct\" value 60 extra \"a b c d\"";
    group.bench_function("quoted", |b| b.iter(|| tokenize(black_box(quoted))));

    group.finish();
}

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    let rules = NimRules::default();
    let start = rules.start_position();

    for depth in [4u32, 8, 12] {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| rules.perft(black_box(&start), black_box(depth)))
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let coordinator: SearchCoordinator<u32> = SearchCoordinator::new(Arc::new(NimSearch), ExecMode::Inline);

    for depth in [4u32, 8] {
        let request = SearchRequest::depth(depth);
        group.bench_with_input(BenchmarkId::new("depth", depth), &request, |b, request| {
            b.iter(|| coordinator.run(black_box(&21), request))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tokenizer, bench_perft, bench_search);
criterion_main!(benches);
