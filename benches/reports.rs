use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use turnos::models::{DEFAULT_STORAGE_KEY, Specialty, TurnoRegistry};
use turnos::storage::MemoryKeyValueStore;

fn populated_registry(count: usize) -> TurnoRegistry<MemoryKeyValueStore> {
    let appointments: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "id": i + 1,
                "name": "Patient",
                "age": 1 + i % 90,
                "specialty": Specialty::ALL[i % Specialty::ALL.len()].name(),
                "registeredAt": "09:00:00",
            })
        })
        .collect();

    let raw = serde_json::to_string(&appointments).unwrap();
    let store = MemoryKeyValueStore::with_value(DEFAULT_STORAGE_KEY, &raw);
    TurnoRegistry::open(store, DEFAULT_STORAGE_KEY).unwrap()
}

fn bench_reports(c: &mut Criterion) {
    let registry = populated_registry(1_000);

    c.bench_function("wait_times_1000", |b| {
        b.iter(|| black_box(registry.wait_times()))
    });

    c.bench_function("statistics_1000", |b| {
        b.iter(|| black_box(registry.statistics()))
    });
}

criterion_group!(benches, bench_reports);
criterion_main!(benches);
