//! Missions — passengers, pickups, deliveries, scoring, and the leg timer.
//!
//! Lifecycle of one mission:
//!
//! ```text
//! create ──► Waiting ──pickup──► Active ──deliver──► Completed
//! ```
//!
//! Cadence is single-passenger: at most one mission waits at a time and at
//! most one is active (the taxi seats one passenger). Every failed
//! operation returns `false`/`None` and leaves all state untouched.
//!
//! Dwell time and gear position are checked by the caller before pickup or
//! delivery is attempted; this module trusts that the taxi has landed.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::layout::Platform;
use crate::passenger::Passenger;
use crate::timer::LegTimer;
use crate::tuning::MissionTuning;

// ============================================================================
// RECORDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    /// Passenger waiting at the pickup platform.
    Waiting,
    /// Passenger aboard the taxi.
    Active,
    /// Passenger delivered.
    Completed,
}

/// One passenger's trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: u32,
    pub passenger_id: u32,
    pub pickup_platform_id: String,
    pub destination_platform_id: String,
    pub status: MissionStatus,
    /// Game clock when the mission was created.
    pub start_time: f64,
}

/// What a successful pickup produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PickupOutcome {
    pub mission_id: u32,
    pub passenger_id: u32,
}

/// What a successful delivery produced.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryOutcome {
    pub mission_id: u32,
    pub passenger_id: u32,
    pub score_gained: u32,
    pub time_bonus: u32,
}

/// Bonus for time left on the leg: linear in remaining time, never negative.
pub fn time_bonus(remaining: f32, per_second: f32) -> u32 {
    (remaining.max(0.0) * per_second.max(0.0)).round() as u32
}

// ============================================================================
// MISSION STATE
// ============================================================================

/// Owns every passenger and mission record for the current level, the
/// running score, and the leg timer.
#[derive(Debug, Clone)]
pub struct MissionState {
    tuning: MissionTuning,
    missions: Vec<Mission>,
    passengers: Vec<Passenger>,
    next_mission_id: u32,
    next_passenger_id: u32,
    completed: u32,
    score: u32,
    timer: LegTimer,
}

impl MissionState {
    pub fn new(tuning: &MissionTuning) -> Self {
        Self {
            tuning: tuning.clone(),
            missions: Vec::new(),
            passengers: Vec::new(),
            next_mission_id: 1,
            next_passenger_id: 1,
            completed: 0,
            score: 0,
            timer: LegTimer::new(tuning.leg_duration),
        }
    }

    /// Drop the previous level's records. Score carries over; the completed
    /// count does not.
    pub fn clear_level(&mut self) {
        self.missions.clear();
        self.passengers.clear();
        self.completed = 0;
        self.timer.reset_held();
    }

    /// Create a mission between two distinct random platforms and start the
    /// leg timer. Refuses (returns `None`) with fewer than two platforms or
    /// while a passenger is already waiting or aboard.
    pub fn create_mission(
        &mut self,
        platforms: &mut [Platform],
        now: f64,
        rng: &mut impl Rng,
    ) -> Option<&Passenger> {
        if platforms.len() < 2 {
            log::warn!(
                "Cannot create mission: only {} platform(s) in level",
                platforms.len()
            );
            return None;
        }
        if self.missions.iter().any(|m| m.status != MissionStatus::Completed) {
            log::warn!("Cannot create mission: a passenger is already waiting or aboard");
            return None;
        }

        let pickup_idx = rng.gen_range(0..platforms.len());
        // Draw from the remaining n-1 and skip over the pickup slot.
        let mut dest_idx = rng.gen_range(0..platforms.len() - 1);
        if dest_idx >= pickup_idx {
            dest_idx += 1;
        }
        let pickup_id = platforms[pickup_idx].id.clone();
        let destination_id = platforms[dest_idx].id.clone();

        let passenger_id = self.next_passenger_id;
        self.next_passenger_id += 1;
        let mission_id = self.next_mission_id;
        self.next_mission_id += 1;

        let passenger = Passenger::generate(passenger_id, &pickup_id, &destination_id, rng);
        log::info!(
            "Mission {} created: {} ({:?}) {} -> {}",
            mission_id,
            passenger.name,
            passenger.personality.kind,
            pickup_id,
            destination_id
        );

        self.missions.push(Mission {
            id: mission_id,
            passenger_id,
            pickup_platform_id: pickup_id,
            destination_platform_id: destination_id,
            status: MissionStatus::Waiting,
            start_time: now,
        });
        self.passengers.push(passenger);
        platforms[pickup_idx].occupancy.passenger_waiting = true;
        self.timer.restart();

        self.passengers.last()
    }

    /// Board the passenger waiting at `platform_id`. Fails if someone is
    /// already aboard or nobody waits there.
    pub fn pickup(&mut self, platform_id: &str, platforms: &mut [Platform]) -> Option<PickupOutcome> {
        if self.active_mission().is_some() {
            log::warn!("Pickup at {} rejected: taxi already carrying a passenger", platform_id);
            return None;
        }
        let Some(mission) = self
            .missions
            .iter_mut()
            .find(|m| m.status == MissionStatus::Waiting && m.pickup_platform_id == platform_id)
        else {
            log::warn!("Pickup at {} rejected: no passenger waiting", platform_id);
            return None;
        };

        mission.status = MissionStatus::Active;
        let outcome = PickupOutcome {
            mission_id: mission.id,
            passenger_id: mission.passenger_id,
        };
        if let Some(p) = self.passengers.iter_mut().find(|p| p.id == outcome.passenger_id) {
            p.is_picked_up = true;
        }
        if let Some(platform) = platforms.iter_mut().find(|p| p.id == platform_id) {
            platform.occupancy.passenger_waiting = false;
        }
        self.timer.restart();

        log::info!("Mission {} picked up at {}", outcome.mission_id, platform_id);
        Some(outcome)
    }

    /// Drop off the passenger aboard at `platform_id`. Fails unless exactly
    /// one mission is active and it is bound for this platform.
    pub fn deliver(&mut self, platform_id: &str) -> Option<DeliveryOutcome> {
        let remaining = self.timer.remaining();
        let mut active = self
            .missions
            .iter_mut()
            .filter(|m| m.status == MissionStatus::Active);
        let mission = match (active.next(), active.next()) {
            (Some(m), None) if m.destination_platform_id == platform_id => m,
            (Some(_), None) => {
                log::warn!("Delivery at {} rejected: wrong destination", platform_id);
                return None;
            }
            (None, _) => {
                log::warn!("Delivery at {} rejected: no passenger aboard", platform_id);
                return None;
            }
            (Some(_), Some(_)) => {
                log::warn!("Delivery at {} rejected: more than one active mission", platform_id);
                return None;
            }
        };

        mission.status = MissionStatus::Completed;
        let bonus = time_bonus(remaining, self.tuning.time_bonus_per_second);
        let outcome = DeliveryOutcome {
            mission_id: mission.id,
            passenger_id: mission.passenger_id,
            score_gained: self.tuning.base_score + bonus,
            time_bonus: bonus,
        };
        if let Some(p) = self.passengers.iter_mut().find(|p| p.id == outcome.passenger_id) {
            p.is_delivered = true;
        }
        self.completed += 1;
        self.score += outcome.score_gained;
        // Refilled but held until the next passenger appears.
        self.timer.reset_held();

        log::info!(
            "Mission {} delivered at {}: +{} (bonus {}), score {}",
            outcome.mission_id,
            platform_id,
            outcome.score_gained,
            bonus,
            self.score
        );
        Some(outcome)
    }

    /// Advance the leg timer. Returns `true` on the tick it runs out.
    pub fn tick_timer(&mut self, dt: f32) -> bool {
        self.timer.tick(dt)
    }

    pub fn halt_timer(&mut self) {
        self.timer.halt();
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn mission(&self, id: u32) -> Option<&Mission> {
        self.missions.iter().find(|m| m.id == id)
    }

    pub fn passenger(&self, id: u32) -> Option<&Passenger> {
        self.passengers.iter().find(|p| p.id == id)
    }

    pub fn active_mission(&self) -> Option<&Mission> {
        self.missions.iter().find(|m| m.status == MissionStatus::Active)
    }

    pub fn waiting_missions(&self) -> impl Iterator<Item = &Mission> {
        self.missions.iter().filter(|m| m.status == MissionStatus::Waiting)
    }

    /// Passenger currently aboard the taxi.
    pub fn boarded_passenger(&self) -> Option<&Passenger> {
        self.active_mission().and_then(|m| self.passenger(m.passenger_id))
    }

    pub fn count_with_status(&self, status: MissionStatus) -> usize {
        self.missions.iter().filter(|m| m.status == status).count()
    }

    pub fn completed_count(&self) -> u32 {
        self.completed
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_remaining(&self) -> f32 {
        self.timer.remaining()
    }

    pub fn timer(&self) -> &LegTimer {
        &self.timer
    }
}
