//! Outbound events for the render, audio, and speech layers.
//!
//! The core pushes events as things happen and the frontend drains them
//! once per frame. Events are fire-and-forget: nothing in the core waits on
//! or reads back from the consumers.

use serde::{Deserialize, Serialize};

use crate::flight::{EngineState, FlightHooks, GearState};
use crate::game::{GameOverReason, GameStatus};
use crate::passenger::LineKind;

/// Something the frontend may want to react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// Speak one of a passenger's lines.
    Speech { passenger_id: u32, kind: LineKind },
    GearChanged { from: GearState, to: GearState },
    EngineChanged { from: EngineState, to: EngineState },
    MissionCreated {
        mission_id: u32,
        pickup_platform_id: String,
        destination_platform_id: String,
    },
    PassengerPickedUp { mission_id: u32, platform_id: String },
    PassengerDelivered {
        mission_id: u32,
        platform_id: String,
        score_gained: u32,
    },
    /// Leg timer crossed the low-time threshold.
    LowTime { remaining: f32 },
    LevelLoaded { level_number: u32 },
    LevelComplete { level_number: u32, score: u32 },
    GameOver { reason: GameOverReason },
    StatusChanged { from: GameStatus, to: GameStatus },
}

/// Ordered event buffer.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn speech(&mut self, passenger_id: u32, kind: LineKind) {
        self.push(GameEvent::Speech { passenger_id, kind });
    }

    /// Take every buffered event, oldest first.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn peek(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl FlightHooks for EventLog {
    fn gear_changed(&mut self, from: GearState, to: GearState) {
        self.push(GameEvent::GearChanged { from, to });
    }

    fn engine_changed(&mut self, from: EngineState, to: EngineState) {
        self.push(GameEvent::EngineChanged { from, to });
    }
}
