//! Benchmarks for notation parsing and formatting
//!
//! Run with: cargo bench -p dirac-core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dirac_core::{FormatSpec, Value, notation};

/// Uniform superposition over `n` qubits written out term by term.
fn superposition(n: u32) -> String {
    (0..1_usize << n)
        .map(|i| format!("|{i:0width$b}>", width = n as usize))
        .collect::<Vec<_>>()
        .join(" + ")
}

/// Benchmark the text-to-expression rewrite alone
fn bench_to_expression(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_expression");

    for qubits in &[1, 3, 5] {
        let text = superposition(*qubits);
        group.bench_with_input(BenchmarkId::new("superposition", qubits), &text, |b, t| {
            b.iter(|| notation::to_expression(black_box(t)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark full parsing including evaluation
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    group.bench_function("inner_product", |b| {
        b.iter(|| Value::parse(black_box("<10|10>")).unwrap());
    });

    group.bench_function("projector", |b| {
        b.iter(|| Value::parse(black_box("(|0>+|1>)(<0|+<1|)")).unwrap());
    });

    for qubits in &[2, 4] {
        let text = superposition(*qubits);
        group.bench_with_input(BenchmarkId::new("superposition", qubits), &text, |b, t| {
            b.iter(|| Value::parse(black_box(t)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark formatting in each style
fn bench_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("format");
    let value = Value::parse(&superposition(4))
        .unwrap()
        .normalize()
        .unwrap()
        .clone();

    for (name, spec) in [
        ("ascii", FormatSpec::ascii()),
        ("unicode", FormatSpec::unicode()),
        ("tex", FormatSpec::tex()),
        ("html", FormatSpec::html()),
    ] {
        group.bench_with_input(BenchmarkId::new("style", name), &spec, |b, s| {
            b.iter(|| value.format(black_box(s)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_to_expression, bench_parse, bench_format);
criterion_main!(benches);
