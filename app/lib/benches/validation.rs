use std::fs;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tabconv::detect::{signature, structure};
use tabconv::FormatValidator;

// Rows of equal width so the consistency check walks every line
fn generate_csv(rows: usize) -> String {
    let mut csv = String::from("id,name,score,active\n");
    for i in 0..rows {
        csv.push_str(&format!("{},name{},{}.5,{}\n", i, i % 97, i % 10, i % 2 == 0));
    }
    csv
}

fn bench_line_consistency(c: &mut Criterion) {
    let mut group = c.benchmark_group("CSV line consistency");

    for rows in [100, 10_000, 100_000] {
        let csv = generate_csv(rows);
        let lines: Vec<&str> = csv.lines().collect();
        group.throughput(Throughput::Bytes(csv.len() as u64));

        group.bench_with_input(BenchmarkId::new("signature", rows), &csv, |b, csv| {
            b.iter(|| signature::matches(black_box(csv.as_bytes())))
        });
        group.bench_with_input(BenchmarkId::new("structure", rows), &lines, |b, lines| {
            b.iter(|| structure::check_line_consistency(black_box(lines)))
        });
    }

    group.finish();
}

fn bench_validator(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("temp dir");
    let csv_path = dir.path().join("bench.csv");
    fs::write(&csv_path, generate_csv(10_000)).expect("write bench file");
    let json_path = dir.path().join("bench.json");
    fs::write(&json_path, "[]").expect("write bench file");

    let validator = FormatValidator::new();
    let mut group = c.benchmark_group("FormatValidator");
    group.bench_function("csv 10k rows", |b| {
        b.iter(|| validator.is_valid(black_box("csv"), &csv_path))
    });
    group.bench_function("json mime", |b| {
        b.iter(|| validator.is_valid(black_box("json"), &json_path))
    });
    group.finish();
}

criterion_group!(benches, bench_line_consistency, bench_validator);
criterion_main!(benches);
