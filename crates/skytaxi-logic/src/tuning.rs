//! Game tuning — every adjustable constant in one serializable struct.
//!
//! Defaults reproduce the shipped game feel. A frontend or the headless
//! harness may load overrides from JSON; missing fields fall back to the
//! defaults.
//!
//! ```
//! use skytaxi_logic::tuning::{validate_tuning, GameTuning};
//!
//! let tuning = GameTuning::from_json(r#"{ "mission": { "leg_duration": 30.0 } }"#).unwrap();
//! assert_eq!(tuning.mission.leg_duration, 30.0);
//! assert_eq!(tuning.mission.dwell_time, 0.5);
//! assert!(validate_tuning(&tuning).is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

// ============================================================================
// LAYOUT
// ============================================================================

/// Procedural layout parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutTuning {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Platforms never sit closer than this to a viewport edge.
    pub safety_margin: f32,
    /// Platform count at level 1; +1 every 3 levels.
    pub base_platform_count: u32,
    pub max_platform_count: u32,
    /// Passenger count at level 1; +1 every 2 levels.
    pub base_passenger_count: u32,
    pub max_passenger_count: u32,
    /// Difficulty gained per level (0..=max_difficulty).
    pub difficulty_step: f32,
    pub max_difficulty: f32,
    /// Distance of the innermost slot from the station center.
    pub base_distance: f32,
    /// Distance the outermost slot approaches.
    pub max_distance: f32,
    /// Max angular jitter (radians) at full difficulty.
    pub angle_jitter: f32,
    /// Max radial jitter at full difficulty.
    pub distance_jitter: f32,
    /// Vertical jitter, applied regardless of difficulty.
    pub vertical_jitter: f32,
    /// Spacing invariant enforced by the relaxation pass.
    pub min_distance: f32,
    pub max_iterations: u32,
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self {
            viewport_width: 1024.0,
            viewport_height: 768.0,
            safety_margin: 50.0,
            base_platform_count: 6,
            max_platform_count: 12,
            base_passenger_count: 3,
            max_passenger_count: 8,
            difficulty_step: 0.1,
            max_difficulty: 1.0,
            base_distance: 120.0,
            max_distance: 330.0,
            angle_jitter: 0.35,
            distance_jitter: 40.0,
            vertical_jitter: 90.0,
            min_distance: 100.0,
            max_iterations: 200,
        }
    }
}

// ============================================================================
// MISSIONS
// ============================================================================

/// Mission cadence and scoring parameters. Times are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionTuning {
    /// Countdown for each pickup or delivery leg.
    pub leg_duration: f32,
    /// Continuous gear-down contact required before a pickup/delivery counts.
    pub dwell_time: f32,
    /// Points awarded for every delivery.
    pub base_score: u32,
    /// Bonus points per second left on the leg timer at delivery.
    pub time_bonus_per_second: f32,
    /// Cooldown between a delivery and the next passenger appearing.
    pub spawn_delay: f32,
    /// Remaining time at which the low-time cue fires.
    pub low_time_warning: f32,
}

impl Default for MissionTuning {
    fn default() -> Self {
        Self {
            leg_duration: 20.0,
            dwell_time: 0.5,
            base_score: 100,
            time_bonus_per_second: 5.0,
            spawn_delay: 1.0,
            low_time_warning: 5.0,
        }
    }
}

// ============================================================================
// GAME
// ============================================================================

/// Top-level tuning for a run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    pub layout: LayoutTuning,
    pub mission: MissionTuning,
    /// Last designed level; `None` plays forever.
    pub max_level: Option<u32>,
}

impl GameTuning {
    /// Parse a tuning from JSON. Missing fields take default values.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> String {
        // Plain struct of numbers; serialization cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Validate a tuning, returning all errors found.
pub fn validate_tuning(tuning: &GameTuning) -> Vec<TuningError> {
    let mut errors = Vec::new();
    let layout = &tuning.layout;
    let mission = &tuning.mission;

    if !(mission.leg_duration > 0.0) {
        errors.push(TuningError::NonPositiveLegDuration(mission.leg_duration));
    }
    if mission.dwell_time < 0.0 {
        errors.push(TuningError::NegativeDwellTime(mission.dwell_time));
    }
    if mission.spawn_delay < 0.0 {
        errors.push(TuningError::NegativeSpawnDelay(mission.spawn_delay));
    }

    if layout.viewport_width <= layout.safety_margin * 2.0
        || layout.viewport_height <= layout.safety_margin * 2.0
    {
        errors.push(TuningError::ViewportTooSmall {
            width: layout.viewport_width,
            height: layout.viewport_height,
            margin: layout.safety_margin,
        });
    }
    if layout.base_platform_count < 2 {
        errors.push(TuningError::TooFewPlatforms(layout.base_platform_count));
    }
    if layout.max_platform_count < layout.base_platform_count {
        errors.push(TuningError::CapBelowBase {
            field: "platform_count",
            base: layout.base_platform_count,
            cap: layout.max_platform_count,
        });
    }
    if layout.base_passenger_count == 0 {
        errors.push(TuningError::NoPassengers);
    }
    if layout.max_passenger_count < layout.base_passenger_count {
        errors.push(TuningError::CapBelowBase {
            field: "passenger_count",
            base: layout.base_passenger_count,
            cap: layout.max_passenger_count,
        });
    }
    if !(layout.difficulty_step > 0.0) || !(layout.max_difficulty > 0.0) {
        errors.push(TuningError::InvalidDifficulty {
            step: layout.difficulty_step,
            max: layout.max_difficulty,
        });
    }
    if layout.base_distance < 0.0 || layout.base_distance >= layout.max_distance {
        errors.push(TuningError::InvertedArmDistances {
            base: layout.base_distance,
            max: layout.max_distance,
        });
    }
    if !(layout.min_distance > 0.0) {
        errors.push(TuningError::NonPositiveMinDistance(layout.min_distance));
    }
    if layout.max_iterations == 0 {
        errors.push(TuningError::ZeroIterationBudget);
    }
    if tuning.max_level == Some(0) {
        errors.push(TuningError::ZeroMaxLevel);
    }

    errors
}
