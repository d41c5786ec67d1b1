//! Taxi flight state — landing gear and engine mode.
//!
//! Two orthogonal machines held side by side:
//!
//! | Axis   | States               | Edges                                  | Trigger            |
//! |--------|----------------------|----------------------------------------|--------------------|
//! | gear   | `GearUp`, `GearDown` | up ⇄ down                              | explicit toggle    |
//! | engine | `Idle`, `Thrusting`  | idle → thrusting (input active), back  | per-tick input poll |
//!
//! Transitions never cross axes and requesting the current state is a
//! rejected no-op. Nothing here returns an error: callers may probe any
//! transition and get `false` back.

use serde::{Deserialize, Serialize};

// ============================================================================
// STATES
// ============================================================================

/// Landing gear position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GearState {
    GearUp,
    GearDown,
}

impl GearState {
    pub fn toggled(self) -> Self {
        match self {
            GearState::GearUp => GearState::GearDown,
            GearState::GearDown => GearState::GearUp,
        }
    }
}

/// Engine mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Idle,
    Thrusting,
}

/// Any flight state, on either axis. Used by the query contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightState {
    GearUp,
    GearDown,
    Idle,
    Thrusting,
}

impl From<GearState> for FlightState {
    fn from(g: GearState) -> Self {
        match g {
            GearState::GearUp => FlightState::GearUp,
            GearState::GearDown => FlightState::GearDown,
        }
    }
}

impl From<EngineState> for FlightState {
    fn from(e: EngineState) -> Self {
        match e {
            EngineState::Idle => FlightState::Idle,
            EngineState::Thrusting => FlightState::Thrusting,
        }
    }
}

impl FlightState {
    pub fn as_gear(self) -> Option<GearState> {
        match self {
            FlightState::GearUp => Some(GearState::GearUp),
            FlightState::GearDown => Some(GearState::GearDown),
            _ => None,
        }
    }

    pub fn as_engine(self) -> Option<EngineState> {
        match self {
            FlightState::Idle => Some(EngineState::Idle),
            FlightState::Thrusting => Some(EngineState::Thrusting),
            _ => None,
        }
    }
}

/// Static edge table. Only same-axis flips exist.
pub fn is_edge(from: FlightState, to: FlightState) -> bool {
    matches!(
        (from, to),
        (FlightState::GearUp, FlightState::GearDown)
            | (FlightState::GearDown, FlightState::GearUp)
            | (FlightState::Idle, FlightState::Thrusting)
            | (FlightState::Thrusting, FlightState::Idle)
    )
}

// ============================================================================
// HOOKS
// ============================================================================

/// Side effects fired synchronously on every accepted transition
/// (gear clunk sound, engine flame sprite, ...). The flight state only
/// invokes them.
pub trait FlightHooks {
    fn gear_changed(&mut self, _from: GearState, _to: GearState) {}
    fn engine_changed(&mut self, _from: EngineState, _to: EngineState) {}
}

/// No-op hooks.
impl FlightHooks for () {}

// ============================================================================
// STATE HOLDER
// ============================================================================

/// Gear and engine state for the player's taxi.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxiFlightState {
    gear: GearState,
    engine: EngineState,
    /// Last polled thrust input; gates the engine edges.
    thrust_input: bool,
}

impl Default for TaxiFlightState {
    fn default() -> Self {
        Self::new()
    }
}

impl TaxiFlightState {
    /// Gear up, engine idle.
    pub fn new() -> Self {
        Self {
            gear: GearState::GearUp,
            engine: EngineState::Idle,
            thrust_input: false,
        }
    }

    pub fn gear(&self) -> GearState {
        self.gear
    }

    pub fn engine(&self) -> EngineState {
        self.engine
    }

    pub fn thrust_input(&self) -> bool {
        self.thrust_input
    }

    pub fn is_in_state(&self, state: FlightState) -> bool {
        FlightState::from(self.gear) == state || FlightState::from(self.engine) == state
    }

    /// Whether `state` is reachable in one step from the current state on its axis.
    pub fn can_transition_to(&self, state: FlightState) -> bool {
        match state {
            FlightState::GearUp | FlightState::GearDown => {
                is_edge(self.gear.into(), state)
            }
            FlightState::Idle => self.engine == EngineState::Thrusting && !self.thrust_input,
            FlightState::Thrusting => self.engine == EngineState::Idle && self.thrust_input,
        }
    }

    /// Every state reachable in one step right now.
    pub fn valid_transitions(&self) -> Vec<FlightState> {
        [
            FlightState::GearUp,
            FlightState::GearDown,
            FlightState::Idle,
            FlightState::Thrusting,
        ]
        .into_iter()
        .filter(|s| self.can_transition_to(*s))
        .collect()
    }

    /// Request a transition. Returns `false` (and changes nothing) when the
    /// edge is not currently legal.
    pub fn request(&mut self, to: FlightState, hooks: &mut impl FlightHooks) -> bool {
        if !self.can_transition_to(to) {
            log::debug!(
                "Flight transition to {:?} rejected (gear {:?}, engine {:?})",
                to,
                self.gear,
                self.engine
            );
            return false;
        }

        if let Some(gear) = to.as_gear() {
            let from = self.gear;
            self.gear = gear;
            hooks.gear_changed(from, gear);
        } else if let Some(engine) = to.as_engine() {
            let from = self.engine;
            self.engine = engine;
            hooks.engine_changed(from, engine);
        }
        true
    }

    /// Request a specific gear position; `false` if already there.
    pub fn set_gear(&mut self, gear: GearState, hooks: &mut impl FlightHooks) -> bool {
        self.request(gear.into(), hooks)
    }

    /// Flip the gear. Always legal.
    pub fn toggle_gear(&mut self, hooks: &mut impl FlightHooks) -> bool {
        self.set_gear(self.gear.toggled(), hooks)
    }

    /// Record this tick's thrust input and move the engine to match.
    /// Returns whether the engine changed mode.
    pub fn poll_engine(&mut self, thrust_active: bool, hooks: &mut impl FlightHooks) -> bool {
        self.thrust_input = thrust_active;
        let desired = if thrust_active {
            FlightState::Thrusting
        } else {
            FlightState::Idle
        };
        if self.is_in_state(desired) {
            return false;
        }
        self.request(desired, hooks)
    }
}

// ============================================================================
// CONTACT CLASSIFICATION
// ============================================================================

/// What a taxi/platform collision means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactOutcome {
    /// Gear was up: the run ends.
    Crash,
    /// Gear was down: counts toward dwell for pickup/delivery.
    Landing,
}

pub fn classify_contact(gear: GearState) -> ContactOutcome {
    match gear {
        GearState::GearUp => ContactOutcome::Crash,
        GearState::GearDown => ContactOutcome::Landing,
    }
}
