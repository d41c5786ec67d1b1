//! Integration tests for level generation and spacing relaxation.
//!
//! Exercises: LevelConfig → place platforms on arms → spacing relaxation,
//! across many levels and seeds.

use std::collections::HashSet;

use skytaxi_logic::layout::{arm_count, generate_level, LevelConfig};
use skytaxi_logic::spacing::spacing_violations;
use skytaxi_logic::tuning::{GameTuning, LayoutTuning};

// ── Helpers ────────────────────────────────────────────────────────────

fn generous() -> LayoutTuning {
    LayoutTuning {
        max_iterations: 10_000,
        ..LayoutTuning::default()
    }
}

// ── Config derivation ──────────────────────────────────────────────────

#[test]
fn counts_non_decreasing_and_capped() {
    let tuning = LayoutTuning::default();
    let mut prev = LevelConfig::for_level(1, &tuning, Some(0));
    for level in 2..=60 {
        let cfg = LevelConfig::for_level(level, &tuning, Some(0));
        assert!(cfg.platform_count >= prev.platform_count, "level {}", level);
        assert!(cfg.passenger_count >= prev.passenger_count, "level {}", level);
        assert!(cfg.difficulty >= prev.difficulty, "level {}", level);
        assert!(cfg.platform_count <= tuning.max_platform_count);
        assert!(cfg.passenger_count <= tuning.max_passenger_count);
        assert!(cfg.difficulty <= tuning.max_difficulty);
        prev = cfg;
    }
    assert_eq!(prev.platform_count, tuning.max_platform_count);
    assert_eq!(prev.passenger_count, tuning.max_passenger_count);
}

#[test]
fn level_one_has_six_platforms_on_two_arms() {
    let level = generate_level(1, Some(42), &LayoutTuning::default());
    assert_eq!(level.platforms.len(), 6);
    assert_eq!(level.config.arm_count(), 2);
    let arms: HashSet<usize> = level.platforms.iter().map(|p| p.arm_index).collect();
    assert_eq!(arms.len(), 2);
    assert_eq!(level.config.passenger_count, 3);
}

#[test]
fn arm_count_stays_in_range() {
    for n in 1..=40 {
        let arms = arm_count(n);
        assert!((2..=4).contains(&arms), "{} platforms -> {} arms", n, arms);
    }
}

// ── Generated layouts ──────────────────────────────────────────────────

#[test]
fn generous_budget_resolves_spacing() {
    let tuning = generous();
    for level in 1..=30 {
        for seed in 0..10u64 {
            let data = generate_level(level, Some(seed), &tuning);
            let violations = spacing_violations(&data.platforms, tuning.min_distance);
            assert!(
                violations.is_empty(),
                "level {} seed {}: {:?}",
                level,
                seed,
                violations
            );
            assert!(data.spacing.converged);
        }
    }
}

#[test]
fn spacing_report_matches_layout() {
    let tuning = LayoutTuning::default();
    for level in 1..=30 {
        for seed in 0..10u64 {
            let data = generate_level(level, Some(seed), &tuning);
            let actual = spacing_violations(&data.platforms, tuning.min_distance).len();
            assert_eq!(data.spacing.violations, actual);
            assert_eq!(data.spacing.converged, actual == 0);
            assert!(data.spacing.iterations <= tuning.max_iterations);
        }
    }
}

#[test]
fn platform_ids_unique_per_level() {
    let tuning = LayoutTuning::default();
    for level in 1..=40 {
        let data = generate_level(level, Some(u64::from(level) * 7), &tuning);
        let ids: HashSet<&str> = data.platforms.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), data.platforms.len(), "level {}", level);
    }
}

#[test]
fn platforms_inside_viewport_margin() {
    let tuning = LayoutTuning::default();
    for seed in 0..20u64 {
        let data = generate_level(25, Some(seed), &tuning);
        for p in &data.platforms {
            assert!(p.x >= tuning.safety_margin && p.x <= tuning.viewport_width - tuning.safety_margin);
            assert!(p.y >= tuning.safety_margin && p.y <= tuning.viewport_height - tuning.safety_margin);
        }
    }
}

#[test]
fn same_seed_same_layout() {
    let tuning = GameTuning::default().layout;
    let a = generate_level(9, Some(1234), &tuning);
    let b = generate_level(9, Some(1234), &tuning);
    assert_eq!(a.platforms, b.platforms);
    let c = generate_level(9, Some(1235), &tuning);
    assert_ne!(a.platforms, c.platforms);
}
