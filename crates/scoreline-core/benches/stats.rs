use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use scoreline_core::model::{Test, TestCategory};
use scoreline_core::stats::{average, consistency, week_buckets};

fn make_tests(n: usize) -> Vec<Test> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..n)
        .map(|i| {
            let percentage = 40.0 + (i % 60) as f64;
            Test {
                id: format!("t{i}"),
                name: format!("Mock #{i}"),
                subject_id: format!("s{}", i % 5),
                category: TestCategory::Mock,
                score: percentage,
                total_marks: 100.0,
                percentage,
                date: start + chrono::Duration::days(i as i64 % 180),
                difficulty: None,
                time_spent_min: None,
                topics: vec![],
                notes: None,
            }
        })
        .collect()
}

fn bench_average(c: &mut Criterion) {
    let mut group = c.benchmark_group("average");
    for n in [10, 100, 500] {
        let tests = make_tests(n);
        group.bench_function(format!("n={n}"), |b| b.iter(|| average(black_box(&tests))));
    }
    group.finish();
}

fn bench_consistency(c: &mut Criterion) {
    let mut group = c.benchmark_group("consistency");
    for n in [10, 100, 500] {
        let tests = make_tests(n);
        group.bench_function(format!("n={n}"), |b| {
            b.iter(|| consistency(black_box(&tests)))
        });
    }
    group.finish();
}

fn bench_week_buckets(c: &mut Criterion) {
    let tests = make_tests(200);
    let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    c.bench_function("week_buckets/n=200,weeks=12", |b| {
        b.iter(|| week_buckets(black_box(&tests), black_box(end), black_box(12)))
    });
}

criterion_group!(benches, bench_average, bench_consistency, bench_week_buckets);
criterion_main!(benches);
