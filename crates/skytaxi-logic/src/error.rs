//! Error types for configuration and game construction.
//!
//! Gameplay failures (rejected transitions, pickups with no waiting
//! passenger, etc.) are not errors; they return `false` or `None`.
//! Only problems a caller must fix before a game can run live here.

/// A single problem found while validating a [`GameTuning`](crate::tuning::GameTuning).
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// Leg countdown must be positive.
    NonPositiveLegDuration(f32),
    /// Dwell time cannot be negative.
    NegativeDwellTime(f32),
    /// Spawn delay cannot be negative.
    NegativeSpawnDelay(f32),
    /// Viewport is too small once the safety margin is removed.
    ViewportTooSmall { width: f32, height: f32, margin: f32 },
    /// Fewer than two platforms means no mission can ever be created.
    TooFewPlatforms(u32),
    /// A cap is below its base value.
    CapBelowBase { field: &'static str, base: u32, cap: u32 },
    /// At least one passenger per level.
    NoPassengers,
    /// Difficulty step/max must be positive.
    InvalidDifficulty { step: f32, max: f32 },
    /// Arm distances must satisfy `0 <= base < max`.
    InvertedArmDistances { base: f32, max: f32 },
    /// Minimum platform spacing must be positive.
    NonPositiveMinDistance(f32),
    /// The spacing resolver needs at least one pass.
    ZeroIterationBudget,
    /// A final level of zero would end the run before it starts.
    ZeroMaxLevel,
    /// JSON could not be parsed into a tuning.
    Parse(String),
}

impl std::fmt::Display for TuningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuningError::NonPositiveLegDuration(d) => {
                write!(f, "leg duration must be positive, got {}", d)
            }
            TuningError::NegativeDwellTime(d) => write!(f, "dwell time must be >= 0, got {}", d),
            TuningError::NegativeSpawnDelay(d) => write!(f, "spawn delay must be >= 0, got {}", d),
            TuningError::ViewportTooSmall {
                width,
                height,
                margin,
            } => write!(
                f,
                "viewport {}x{} leaves no room inside a {} margin",
                width, height, margin
            ),
            TuningError::TooFewPlatforms(n) => {
                write!(f, "need at least 2 platforms per level, got {}", n)
            }
            TuningError::CapBelowBase { field, base, cap } => {
                write!(f, "{}: cap {} is below base {}", field, cap, base)
            }
            TuningError::NoPassengers => write!(f, "passenger count must be at least 1"),
            TuningError::InvalidDifficulty { step, max } => write!(
                f,
                "difficulty step ({}) and max ({}) must be positive",
                step, max
            ),
            TuningError::InvertedArmDistances { base, max } => write!(
                f,
                "arm distances must satisfy 0 <= base < max, got base {} max {}",
                base, max
            ),
            TuningError::NonPositiveMinDistance(d) => {
                write!(f, "minimum platform distance must be positive, got {}", d)
            }
            TuningError::ZeroIterationBudget => write!(f, "spacing iteration budget is zero"),
            TuningError::ZeroMaxLevel => write!(f, "max level must be at least 1"),
            TuningError::Parse(msg) => write!(f, "tuning parse error: {}", msg),
        }
    }
}

impl std::error::Error for TuningError {}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e.to_string())
    }
}

/// Errors surfaced when constructing or querying a [`Game`](crate::game::Game).
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// Tuning failed validation; every problem is listed.
    InvalidTuning(Vec<TuningError>),
    /// A platform id does not exist in the current level.
    UnknownPlatform(String),
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::InvalidTuning(errors) => {
                write!(f, "invalid tuning ({} problems)", errors.len())?;
                for e in errors {
                    write!(f, "; {}", e)?;
                }
                Ok(())
            }
            GameError::UnknownPlatform(id) => write!(f, "unknown platform '{}'", id),
        }
    }
}

impl std::error::Error for GameError {}

impl From<Vec<TuningError>> for GameError {
    fn from(errors: Vec<TuningError>) -> Self {
        GameError::InvalidTuning(errors)
    }
}
