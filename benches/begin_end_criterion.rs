use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use region_profiler::{ManualClock, ProfileRegistry};
use std::hint::black_box;
use std::sync::Arc;

fn registry_with_names(count: usize) -> ProfileRegistry {
    let mut registry = ProfileRegistry::builder()
        .unbounded()
        .build()
        .expect("monotonic clock is available");
    for i in 0..count {
        let name = format!("region-{i}");
        registry.begin(&name).expect("unbounded registry accepts names");
        registry.end(&name);
    }
    registry
}

fn benchmark_begin_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("begin_end");

    for entries in [1usize, 64, 4096] {
        group.bench_with_input(BenchmarkId::new("monotonic", entries), &entries, |b, &n| {
            let mut registry = registry_with_names(n);
            let name = format!("region-{}", n - 1);
            b.iter(|| {
                registry.begin(black_box(&name)).expect("name already present");
                black_box(registry.end(black_box(&name)));
            });
        });
    }

    group.bench_function("manual_clock", |b| {
        let mut registry = ProfileRegistry::builder()
            .clock(Arc::new(ManualClock::new()))
            .build()
            .expect("manual clock is available");
        b.iter(|| {
            registry.begin(black_box("hot")).expect("single name fits");
            black_box(registry.end(black_box("hot")));
        });
    });

    group.bench_function("region_guard", |b| {
        let mut registry = registry_with_names(1);
        b.iter(|| {
            let _region = registry.region(black_box("region-0")).expect("name already present");
        });
    });

    group.finish();
}

fn benchmark_report(c: &mut Criterion) {
    let registry = registry_with_names(256);
    c.bench_function("report_render_256", |b| {
        b.iter(|| black_box(registry.report().to_string()));
    });
}

criterion_group!(benches, benchmark_begin_end, benchmark_report);
criterion_main!(benches);
