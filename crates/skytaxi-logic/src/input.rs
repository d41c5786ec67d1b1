//! Abstract input intents supplied once per tick by the input layer.

use serde::{Deserialize, Serialize};

use crate::flight::GearState;

/// Normalized thrust direction. Components are in `[-1, 1]` and the vector
/// never exceeds unit length, so diagonals are not faster than straights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThrustVector {
    x: f32,
    y: f32,
}

impl ThrustVector {
    pub const ZERO: ThrustVector = ThrustVector { x: 0.0, y: 0.0 };

    /// Clamp each component to `[-1, 1]`, then scale down to unit length
    /// if longer. Non-finite components are treated as zero.
    pub fn new(x: f32, y: f32) -> Self {
        let sanitize = |v: f32| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        let (x, y) = (sanitize(x), sanitize(y));
        let len = x.hypot(y);
        if len > 1.0 {
            Self {
                x: x / len,
                y: y / len,
            }
        } else {
            Self { x, y }
        }
    }

    /// Build from digital direction keys.
    pub fn from_keys(left: bool, right: bool, up: bool, down: bool) -> Self {
        let axis = |neg: bool, pos: bool| f32::from(u8::from(pos)) - f32::from(u8::from(neg));
        Self::new(axis(left, right), axis(up, down))
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn magnitude(&self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Any directional thrust requested.
    pub fn is_active(&self) -> bool {
        self.x != 0.0 || self.y != 0.0
    }
}

/// One tick of player intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    pub thrust: ThrustVector,
    /// Edge: gear toggle pressed this tick.
    pub toggle_gear: bool,
    /// Edge: pause toggle pressed this tick.
    pub toggle_pause: bool,
}

impl InputFrame {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn thrust(x: f32, y: f32) -> Self {
        Self {
            thrust: ThrustVector::new(x, y),
            ..Self::default()
        }
    }

    pub fn gear_toggle() -> Self {
        Self {
            toggle_gear: true,
            ..Self::default()
        }
    }

    pub fn pause_toggle() -> Self {
        Self {
            toggle_pause: true,
            ..Self::default()
        }
    }

    /// With the gear down the taxi can only move vertically, so horizontal
    /// thrust is dropped before it reaches the flight model.
    pub fn gear_locked(self, gear: GearState) -> Self {
        match gear {
            GearState::GearUp => self,
            GearState::GearDown => Self {
                thrust: ThrustVector::new(0.0, self.thrust.y),
                ..self
            },
        }
    }
}
