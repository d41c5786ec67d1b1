//! Criterion benchmarks for level generation.
//!
//! Benchmarks:
//!   - full `generate_level` at level 1 (6 platforms) and level 30 (12 platforms)
//!   - spacing relaxation alone on a deliberately crowded layout
//!
//! Run with: cargo bench -p skytaxi-logic --bench layout

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use skytaxi_logic::layout::{generate_level, Bounds, Occupancy, Platform};
use skytaxi_logic::spacing::resolve_spacing;
use skytaxi_logic::tuning::LayoutTuning;

// ---------------------------------------------------------------------------
// Benchmark: generate_level
// ---------------------------------------------------------------------------

fn bench_generate_level(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_level");
    let tuning = LayoutTuning::default();

    for level in [1u32, 30] {
        group.bench_function(format!("level_{}", level), |b| {
            b.iter(|| black_box(generate_level(black_box(level), Some(7), &tuning)));
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: spacing relaxation on a crowded cluster
// ---------------------------------------------------------------------------

fn crowded(count: usize) -> Vec<Platform> {
    (0..count)
        .map(|i| Platform {
            id: format!("Crowd-{:02}", i),
            x: 500.0 + (i % 4) as f32 * 10.0,
            y: 380.0 + (i / 4) as f32 * 10.0,
            arm_index: 0,
            platform_index: i,
            occupancy: Occupancy::default(),
        })
        .collect()
}

fn bench_resolve_spacing(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_spacing");
    let tuning = LayoutTuning::default();
    let bounds = Bounds::from_tuning(&tuning);
    let start = crowded(12);

    group.bench_function("crowded_12", |b| {
        b.iter(|| {
            let mut platforms = start.clone();
            black_box(resolve_spacing(
                &mut platforms,
                tuning.min_distance,
                tuning.max_iterations,
                &bounds,
            ))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_generate_level, bench_resolve_spacing);
criterion_main!(benches);
