use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ecopulse_analytics::{enrich, EnrichmentContext};
use ecopulse_types::{RawReading, ThresholdTable};

fn bench_enrich(c: &mut Criterion) {
    let thresholds = ThresholdTable::default();
    let prior: Vec<f64> = (0..100).map(|i| 50.0 + (i % 7) as f64).collect();
    let reading = RawReading {
        timestamp: "2026-03-01T09:30:00.250000".to_string(),
        aqi: 87.4,
        pm25: 22.1,
        co2: 431.0,
        temperature: 27.3,
        humidity: 48.0,
        wind_speed: 6.2,
        traffic_density: 34.5,
        industrial_index: 18.9,
    };

    c.bench_function("enrich_with_full_history", |b| {
        b.iter(|| {
            let context = EnrichmentContext::new(black_box(&prior), &thresholds);
            enrich(black_box(reading.clone()), &context)
        })
    });
}

criterion_group!(benches, bench_enrich);
criterion_main!(benches);
