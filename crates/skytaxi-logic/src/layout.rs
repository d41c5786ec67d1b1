//! Procedural level layout — platforms on radial arms around the station.
//!
//! Algorithm:
//! 1. Derive a [`LevelConfig`] from the level number (saturating counts)
//! 2. Split platforms evenly across 2–4 arms at fixed bearings
//! 3. Place each platform along its arm at increasing distance, with
//!    difficulty-scaled jitter on angle/distance and a larger vertical jitter
//! 4. Clamp into the viewport's safe area
//! 5. Relax spacing until every pair is at least `min_distance` apart
//!
//! Generation is pure: identical `(level, seed, tuning)` produce identical
//! output, and nothing here touches rendering or audio.

use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::names::PlatformIdAllocator;
use crate::spacing::{resolve_spacing, SpacingReport};
use crate::tuning::LayoutTuning;

/// Levels gained per extra platform.
const LEVELS_PER_PLATFORM: u32 = 3;
/// Levels gained per extra passenger.
const LEVELS_PER_PASSENGER: u32 = 2;
/// Platforms per arm before another arm is opened.
const PLATFORMS_PER_ARM: u32 = 4;
const MIN_ARMS: u32 = 2;
const MAX_ARMS: u32 = 4;

// ============================================================================
// LEVEL CONFIG
// ============================================================================

/// Per-level parameters derived from the level number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub level_number: u32,
    pub platform_count: u32,
    /// Missions that must be delivered to clear the level.
    pub passenger_count: u32,
    /// 0.0..=max_difficulty; scales placement jitter.
    pub difficulty: f32,
    pub seed: u64,
}

impl LevelConfig {
    /// Derive the config for `level_number` (levels start at 1; 0 is treated as 1).
    ///
    /// Counts are monotonic non-decreasing in the level number and saturate at
    /// the tuning caps.
    pub fn for_level(level_number: u32, tuning: &LayoutTuning, seed: Option<u64>) -> Self {
        let level_number = level_number.max(1);
        let steps = level_number - 1;
        let platform_count = (tuning.base_platform_count + steps / LEVELS_PER_PLATFORM)
            .min(tuning.max_platform_count);
        let passenger_count = (tuning.base_passenger_count + steps / LEVELS_PER_PASSENGER)
            .min(tuning.max_passenger_count);
        let difficulty = (level_number as f32 * tuning.difficulty_step).min(tuning.max_difficulty);

        Self {
            level_number,
            platform_count,
            passenger_count,
            difficulty,
            seed: seed.unwrap_or_else(rand::random),
        }
    }

    /// Number of arms for this level's platform count.
    pub fn arm_count(&self) -> u32 {
        arm_count(self.platform_count)
    }
}

/// `clamp(ceil(platform_count / 4), 2, 4)`.
pub fn arm_count(platform_count: u32) -> u32 {
    platform_count
        .div_ceil(PLATFORMS_PER_ARM)
        .clamp(MIN_ARMS, MAX_ARMS)
}

/// How many platforms land on each arm: an even split, with the remainder
/// going to the first arms.
pub fn arm_sizes(platform_count: u32) -> Vec<u32> {
    let arms = arm_count(platform_count);
    let base = platform_count / arms;
    let extra = platform_count % arms;
    (0..arms).map(|a| base + u32::from(a < extra)).collect()
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Safe area platforms must stay inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    /// Viewport minus the safety margin on every side.
    pub fn from_tuning(tuning: &LayoutTuning) -> Self {
        Self {
            min_x: tuning.safety_margin,
            min_y: tuning.safety_margin,
            max_x: tuning.viewport_width - tuning.safety_margin,
            max_y: tuning.viewport_height - tuning.safety_margin,
        }
    }

    pub fn clamp(&self, x: f32, y: f32) -> (f32, f32) {
        (x.clamp(self.min_x, self.max_x), y.clamp(self.min_y, self.max_y))
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }
}

// ============================================================================
// PLATFORMS
// ============================================================================

/// Transient per-platform flags, updated by mission and landing logic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupancy {
    /// The taxi is currently landed here.
    pub is_occupied: bool,
    /// A passenger is waiting for pickup here.
    pub passenger_waiting: bool,
}

/// A landing platform. Position is fixed once generation finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub arm_index: usize,
    pub platform_index: usize,
    pub occupancy: Occupancy,
}

impl Platform {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Everything a level needs: config, platforms, station center, and the
/// outcome of spacing relaxation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelData {
    pub config: LevelConfig,
    pub platforms: Vec<Platform>,
    pub station_center: Point,
    pub spacing: SpacingReport,
}

impl LevelData {
    pub fn platform(&self, id: &str) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }

    pub fn platform_mut(&mut self, id: &str) -> Option<&mut Platform> {
        self.platforms.iter_mut().find(|p| p.id == id)
    }

    pub fn platform_ids(&self) -> Vec<&str> {
        self.platforms.iter().map(|p| p.id.as_str()).collect()
    }
}

// ============================================================================
// GENERATION
// ============================================================================

/// Generate a level. `seed = None` draws a fresh random seed, recorded in
/// the returned config so the layout can be reproduced.
pub fn generate_level(level_number: u32, seed: Option<u64>, tuning: &LayoutTuning) -> LevelData {
    let config = LevelConfig::for_level(level_number, tuning, seed);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let bounds = Bounds::from_tuning(tuning);
    let center = Point::new(tuning.viewport_width / 2.0, tuning.viewport_height / 2.0);

    let mut platforms = place_platforms(&config, tuning, &bounds, center, &mut rng);
    let spacing = resolve_spacing(
        &mut platforms,
        tuning.min_distance,
        tuning.max_iterations,
        &bounds,
    );

    if spacing.converged {
        log::info!(
            "Level {} generated: {} platforms on {} arms, seed {} ({} spacing passes)",
            config.level_number,
            platforms.len(),
            config.arm_count(),
            config.seed,
            spacing.iterations
        );
    } else {
        log::warn!(
            "Level {} spacing unresolved after {} passes: {} pairs closer than {}",
            config.level_number,
            spacing.iterations,
            spacing.violations,
            tuning.min_distance
        );
    }

    LevelData {
        config,
        platforms,
        station_center: center,
        spacing,
    }
}

/// Place platforms along arms, before spacing relaxation.
fn place_platforms(
    config: &LevelConfig,
    tuning: &LayoutTuning,
    bounds: &Bounds,
    center: Point,
    rng: &mut impl Rng,
) -> Vec<Platform> {
    let sizes = arm_sizes(config.platform_count);
    let arm_total = sizes.len() as f32;
    let mut ids = PlatformIdAllocator::new();
    let mut platforms = Vec::with_capacity(config.platform_count as usize);

    for (arm_index, &count) in sizes.iter().enumerate() {
        let bearing = arm_index as f32 * TAU / arm_total;

        for platform_index in 0..count as usize {
            let t = (platform_index as f32 + 1.0) / (count as f32 + 1.0);
            let along = tuning.base_distance + (tuning.max_distance - tuning.base_distance) * t;

            let angle = bearing + rng.gen_range(-1.0f32..=1.0) * tuning.angle_jitter * config.difficulty;
            let distance =
                along + rng.gen_range(-1.0f32..=1.0) * tuning.distance_jitter * config.difficulty;
            let lift = rng.gen_range(-1.0f32..=1.0) * tuning.vertical_jitter;

            let (x, y) = bounds.clamp(
                center.x + angle.cos() * distance,
                center.y + angle.sin() * distance + lift,
            );
            let id = ids.allocate(arm_index, platform_index, rng);

            platforms.push(Platform {
                id,
                x,
                y,
                arm_index,
                platform_index,
                occupancy: Occupancy::default(),
            });
        }
    }

    platforms
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_config_level_one() {
        let tuning = LayoutTuning::default();
        let config = LevelConfig::for_level(1, &tuning, Some(1));
        assert_eq!(config.platform_count, 6);
        assert_eq!(config.passenger_count, 3);
        assert!((config.difficulty - 0.1).abs() < 1e-6);
        assert_eq!(config.arm_count(), 2);
    }

    #[test]
    fn test_config_saturates() {
        let tuning = LayoutTuning::default();
        let config = LevelConfig::for_level(500, &tuning, Some(1));
        assert_eq!(config.platform_count, tuning.max_platform_count);
        assert_eq!(config.passenger_count, tuning.max_passenger_count);
        assert_eq!(config.difficulty, tuning.max_difficulty);
    }

    #[test]
    fn test_level_zero_treated_as_one() {
        let tuning = LayoutTuning::default();
        assert_eq!(
            LevelConfig::for_level(0, &tuning, Some(9)),
            LevelConfig::for_level(1, &tuning, Some(9))
        );
    }

    #[test]
    fn test_arm_count_clamped() {
        assert_eq!(arm_count(2), 2);
        assert_eq!(arm_count(8), 2);
        assert_eq!(arm_count(9), 3);
        assert_eq!(arm_count(12), 3);
        assert_eq!(arm_count(16), 4);
        assert_eq!(arm_count(40), 4);
    }

    #[test]
    fn test_arm_sizes_even_split() {
        assert_eq!(arm_sizes(6), vec![3, 3]);
        assert_eq!(arm_sizes(7), vec![4, 3]);
        assert_eq!(arm_sizes(10), vec![4, 3, 3]);
        for n in 2..30 {
            let sizes = arm_sizes(n);
            assert_eq!(sizes.iter().sum::<u32>(), n);
            let spread = sizes.iter().max().unwrap() - sizes.iter().min().unwrap();
            assert!(spread <= 1);
        }
    }

    #[test]
    fn test_generation_deterministic() {
        let tuning = LayoutTuning::default();
        let a = generate_level(4, Some(77), &tuning);
        let b = generate_level(4, Some(77), &tuning);
        assert_eq!(a.platforms, b.platforms);
        assert_eq!(a.config, b.config);
    }

    #[test]
    fn test_platforms_inside_bounds() {
        let tuning = LayoutTuning::default();
        let bounds = Bounds::from_tuning(&tuning);
        for seed in 0..20 {
            let level = generate_level(10, Some(seed), &tuning);
            for p in &level.platforms {
                assert!(bounds.contains(p.x, p.y), "{} out of bounds", p.id);
            }
        }
    }

    #[test]
    fn test_distance_grows_along_arm_without_jitter() {
        let tuning = LayoutTuning {
            angle_jitter: 0.0,
            distance_jitter: 0.0,
            vertical_jitter: 0.0,
            min_distance: 1.0,
            ..LayoutTuning::default()
        };
        let level = generate_level(1, Some(5), &tuning);
        let center = level.station_center;
        for arm in 0..2 {
            let dists: Vec<f32> = level
                .platforms
                .iter()
                .filter(|p| p.arm_index == arm)
                .map(|p| p.position().distance(&center))
                .collect();
            assert_eq!(dists.len(), 3);
            assert!(dists.windows(2).all(|w| w[0] < w[1]), "{dists:?}");
        }
    }

    #[test]
    fn test_ids_unique_in_level() {
        let tuning = LayoutTuning::default();
        for seed in 0..50 {
            let level = generate_level(30, Some(seed), &tuning);
            let ids: HashSet<&str> = level.platform_ids().into_iter().collect();
            assert_eq!(ids.len(), level.platforms.len());
        }
    }

    #[test]
    fn test_random_seed_recorded() {
        let tuning = LayoutTuning::default();
        let level = generate_level(2, None, &tuning);
        let replay = generate_level(2, Some(level.config.seed), &tuning);
        assert_eq!(level.platforms, replay.platforms);
    }
}
