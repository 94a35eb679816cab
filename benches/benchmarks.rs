use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use order_insights::{
    analytics::{best_performing, best_sellers, by_city, by_state, rfm, worst_performing},
    config::ReportConfig,
    data::{filter, Dataset, OrderRecord},
    report::InsightsReport,
};

fn synthetic_dataset(rows: usize) -> Dataset {
    let start = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
    (0..rows)
        .map(|i| {
            let ts = (start + Duration::days((i % 700) as i64))
                .and_hms_opt((i % 24) as u32, 0, 0)
                .unwrap();
            OrderRecord::new(format!("o{}", i / 2), format!("c{}", i % 5_000), ts)
                .with_category(format!("category_{}", i % 70))
                .with_seller(format!("seller_{}", i % 900))
                .with_review((i % 5) as u8 + 1)
                .with_location(format!("S{}", i % 27), format!("city_{}", i % 400))
                .with_price((i % 500) as f64 + 0.99)
        })
        .collect()
}

fn benchmark_aggregates(c: &mut Criterion) {
    let full = synthetic_dataset(100_000);
    let start = NaiveDate::from_ymd_opt(2017, 6, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2018, 6, 1).unwrap();
    let window = filter(&full, start, end);

    c.bench_function("filter_100k", |b| {
        b.iter(|| filter(black_box(&full), start, end));
    });

    c.bench_function("products_100k", |b| {
        b.iter(|| {
            black_box(best_performing(&window));
            black_box(worst_performing(&window));
        });
    });

    c.bench_function("sellers_100k", |b| {
        b.iter(|| best_sellers(black_box(&window)));
    });

    c.bench_function("geography_100k", |b| {
        b.iter(|| {
            black_box(by_state(&window));
            black_box(by_city(&window));
        });
    });

    c.bench_function("rfm_100k", |b| {
        b.iter(|| rfm(black_box(&full)));
    });
}

fn benchmark_report(c: &mut Criterion) {
    let full = synthetic_dataset(100_000);
    let config = ReportConfig::default();

    c.bench_function("report_100k", |b| {
        b.iter(|| InsightsReport::build_full(black_box(&full), &config));
    });
}

criterion_group!(benches, benchmark_aggregates, benchmark_report);
criterion_main!(benches);
