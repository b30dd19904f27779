use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Duration, TimeZone, Utc};
use pharmasafe_core::{Identity, ProductId};
use pharmasafe_integrity::{Fingerprint, encode_record, fingerprint_record};
use pharmasafe_products::{INITIAL_STAGE, Product, StageRecord};

fn product() -> Product {
    let manufactured = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Product {
        product_id: ProductId::parse("BENCH-1").unwrap(),
        product_type: "Amoxicillin 500mg".to_string(),
        batch_number: "LOT-2024-0001".to_string(),
        manufacturing_date: manufactured,
        expiry_date: manufactured + Duration::days(730),
        latest_stage: INITIAL_STAGE.to_string(),
    }
}

fn stages(count: usize) -> Vec<StageRecord> {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    let writer = Identity::parse("0x70997970c51812dc3a010c7d01b50e0d17dc79c8").unwrap();
    (0..count)
        .map(|i| StageRecord {
            product_id: ProductId::parse("BENCH-1").unwrap(),
            stage_name: format!("Stage {i}"),
            authenticator: writer.clone(),
            timestamp: start + Duration::minutes(i as i64),
        })
        .collect()
}

fn bench_canonical_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonical_encoding");
    let product = product();

    for count in [0usize, 6, 64, 512] {
        let log = stages(count);
        group.throughput(Throughput::Elements(count.max(1) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &log, |b, log| {
            b.iter(|| encode_record(black_box(&product), black_box(log)).unwrap());
        });
    }

    group.finish();
}

fn bench_fingerprint_and_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("fingerprint_and_verify");
    let product = product();
    let log = stages(6);
    let anchored = fingerprint_record(&product, &log).unwrap();

    group.bench_function("fingerprint_six_stages", |b| {
        b.iter(|| fingerprint_record(black_box(&product), black_box(&log)).unwrap());
    });

    group.bench_function("recompute_and_compare", |b| {
        b.iter(|| {
            let recomputed = fingerprint_record(black_box(&product), black_box(&log)).unwrap();
            Fingerprint::verify(&anchored, &recomputed)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_canonical_encoding, bench_fingerprint_and_verify);
criterion_main!(benches);
