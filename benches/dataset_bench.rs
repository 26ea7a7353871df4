//! Benchmarks for dataset loading and statistics
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use obesity_dash::dashboard::{gaussian_kde, histogram, HISTOGRAM_BINS};
use obesity_dash::dataset::{Column, Dataset};

fn create_test_csv(rows: usize) -> String {
    let mut csv = String::from("Age,Gender,Height,Weight,BMI,PhysicalActivityLevel,ObesityCategory\n");
    for i in 0..rows {
        let age = 18 + (i % 62);
        let height = 150.0 + (i % 40) as f64;
        let weight = 50.0 + (i % 55) as f64;
        let bmi = weight / (height / 100.0).powi(2);
        let gender = if i % 2 == 0 { "Male" } else { "Female" };
        csv.push_str(&format!(
            "{},{},{:.1},{:.1},{:.2},{},Normal weight\n",
            age,
            gender,
            height,
            weight,
            bmi,
            1 + i % 4
        ));
    }
    csv
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    for size in [100, 1000, 10000] {
        let csv = create_test_csv(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("from_csv_{}", size), |b| {
            b.iter(|| Dataset::from_csv_str(black_box(&csv)).unwrap())
        });
    }

    group.finish();
}

fn bench_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");

    for size in [1000, 10000] {
        let dataset = Dataset::from_csv_str(&create_test_csv(size)).unwrap();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("summarize_{}", size), |b| {
            b.iter(|| dataset.summarize(black_box(Column::Weight)).unwrap())
        });
    }

    group.finish();
}

fn bench_histogram(c: &mut Criterion) {
    let dataset = Dataset::from_csv_str(&create_test_csv(10000)).unwrap();
    let ages = dataset.values(Column::Age);

    c.bench_function("histogram_10000", |b| {
        b.iter(|| histogram(black_box(&ages), HISTOGRAM_BINS))
    });

    c.bench_function("kde_10000", |b| {
        b.iter(|| gaussian_kde(black_box(&ages), 18.0, 79.0, 200))
    });
}

criterion_group!(benches, bench_load, bench_statistics, bench_histogram);
criterion_main!(benches);
