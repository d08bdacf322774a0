//! Feature derivation benchmark: single record and batches.

use churn_scorer::features::{derive_batch, derive_features, CustomerRecord};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn make_records(n: usize) -> Vec<CustomerRecord> {
    (0..n)
        .map(|i| CustomerRecord {
            customer_age: 18 + (i % 80) as u32,
            months_on_book: (i % 121) as u32,
            total_trans_ct: (i % 200) as u32,
            avg_utilization_ratio: (i % 100) as f64 / 100.0,
            ..CustomerRecord::example()
        })
        .collect()
}

fn bench_derive_one(c: &mut Criterion) {
    let rec = CustomerRecord::example();
    c.bench_function("derive_one", |b| b.iter(|| derive_features(black_box(&rec))));
    c.bench_function("derive_one_to_row", |b| {
        b.iter(|| derive_features(black_box(&rec)).to_row())
    });
}

fn bench_derive_batch(c: &mut Criterion) {
    let mut g = c.benchmark_group("derive_batch");
    for n in [10, 100, 1000] {
        let records = make_records(n);
        g.bench_function(format!("records_{}", n).as_str(), |b| {
            b.iter(|| derive_batch(black_box(&records)))
        });
    }
    g.finish();
}

criterion_group!(benches, bench_derive_one, bench_derive_batch);
criterion_main!(benches);
