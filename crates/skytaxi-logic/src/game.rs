//! Game orchestration for one run, from level 1 to game over.
//!
//! [`Game`] owns the level layout, mission state, taxi flight state and the
//! scheduler, and drives them from a single [`Game::tick`] per frame.
//!
//! # Status machine
//!
//! ```text
//! Loading ─► Ready ─► Playing ⇄ Paused
//!                       │  └──────────► GameOver   (timer expiry, crash)
//!                       ▼
//!                 LevelComplete ─advance─► Loading ─► Ready ─► Playing
//! ```
//!
//! # Tick order
//!
//! 1. pause edge
//! 2. gear edge, engine poll
//! 3. landing dwell
//! 4. pickup / delivery
//! 5. scheduled actions (spawn cooldown, low-time cue)
//! 6. leg timer, skipped on a tick where a pickup, delivery or spawn
//!    refilled it

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::events::{EventLog, GameEvent};
use crate::flight::{classify_contact, ContactOutcome, EngineState, GearState, TaxiFlightState};
use crate::input::InputFrame;
use crate::landing::LandingTracker;
use crate::layout::{generate_level, LevelData, Platform};
use crate::mission::{Mission, MissionState};
use crate::passenger::LineKind;
use crate::timer::{Scheduler, TimerHandle};
use crate::tuning::{validate_tuning, GameTuning};

/// Spreads per-level seeds derived from a run seed.
const LEVEL_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;
/// ChaCha stream used for mission randomness (layout uses stream 0).
const MISSION_STREAM: u64 = 1;

// ============================================================================
// STATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Loading,
    Ready,
    Playing,
    Paused,
    LevelComplete,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    TimeRanOut,
    Crashed,
}

impl std::fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOverReason::TimeRanOut => write!(f, "time ran out"),
            GameOverReason::Crashed => write!(f, "crashed"),
        }
    }
}

/// Read-only view of the run, for HUDs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub current_level: u32,
    pub score: u32,
    pub completed_missions: u32,
    pub total_missions: u32,
    pub game_status: GameStatus,
    pub time_remaining: f32,
    pub game_over_reason: Option<GameOverReason>,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub state: GameState,
    pub platforms: Vec<Platform>,
    pub missions: Vec<Mission>,
    pub boarded_passenger_id: Option<u32>,
    pub gear: GearState,
    pub engine: EngineState,
    pub landed_on: Option<String>,
}

/// Delayed actions owned by the current level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScheduledAction {
    SpawnMission,
    LowTimeWarning,
}

// ============================================================================
// GAME
// ============================================================================

/// One run of the game.
pub struct Game {
    tuning: GameTuning,
    run_seed: Option<u64>,
    status: GameStatus,
    over_reason: Option<GameOverReason>,
    level: Option<LevelData>,
    missions: MissionState,
    taxi: TaxiFlightState,
    landing: LandingTracker,
    scheduler: Scheduler<ScheduledAction>,
    low_time: Option<TimerHandle>,
    rng: ChaCha8Rng,
    events: EventLog,
}

impl Game {
    /// Create a run. `seed = Some(..)` makes every level and passenger
    /// reproducible; `None` randomizes each level.
    pub fn new(tuning: GameTuning, seed: Option<u64>) -> Result<Self, GameError> {
        let errors = validate_tuning(&tuning);
        if !errors.is_empty() {
            return Err(GameError::InvalidTuning(errors));
        }
        Ok(Self {
            missions: MissionState::new(&tuning.mission),
            tuning,
            run_seed: seed,
            status: GameStatus::Loading,
            over_reason: None,
            level: None,
            taxi: TaxiFlightState::new(),
            landing: LandingTracker::new(),
            scheduler: Scheduler::new(),
            low_time: None,
            rng: ChaCha8Rng::seed_from_u64(seed.unwrap_or(0)),
            events: EventLog::new(),
        })
    }

    /// Load level 1 and start playing. No-op unless still loading.
    pub fn start(&mut self) -> bool {
        if self.status != GameStatus::Loading || self.level.is_some() {
            return false;
        }
        self.load_level(1);
        self.begin_level();
        true
    }

    /// Move on from a completed level. Returns `false` if the level is not
    /// complete or it was the final designed level.
    pub fn advance_level(&mut self) -> bool {
        if self.status != GameStatus::LevelComplete || self.is_final_level() {
            return false;
        }
        let next = self.current_level() + 1;
        self.set_status(GameStatus::Loading);
        self.load_level(next);
        self.begin_level();
        true
    }

    /// Flip between playing and paused. Other states ignore the request.
    pub fn toggle_pause(&mut self) -> bool {
        match self.status {
            GameStatus::Playing => self.set_status(GameStatus::Paused),
            GameStatus::Paused => self.set_status(GameStatus::Playing),
            _ => return false,
        }
        true
    }

    /// Collision report from the physics layer: the taxi overlaps
    /// `platform_id` with the given gear position. Gear up is a crash;
    /// gear down counts toward the landing dwell for this tick.
    pub fn report_collision(&mut self, platform_id: &str, gear: GearState) {
        if self.status != GameStatus::Playing {
            return;
        }
        if let Err(e) = self.platform(platform_id) {
            log::warn!("Ignoring collision report: {}", e);
            return;
        }
        match classify_contact(gear) {
            ContactOutcome::Crash => {
                log::info!("Crashed into {} with gear up", platform_id);
                self.game_over(GameOverReason::Crashed);
            }
            ContactOutcome::Landing => self.landing.report_contact(platform_id),
        }
    }

    /// Advance the game by `dt` seconds with this frame's input.
    pub fn tick(&mut self, dt: f32, input: &InputFrame) {
        let dt = dt.max(0.0);

        if input.toggle_pause {
            self.toggle_pause();
        }
        if self.status != GameStatus::Playing {
            return;
        }

        if input.toggle_gear {
            self.taxi.toggle_gear(&mut self.events);
        }
        let effective = input.gear_locked(self.taxi.gear());
        self.taxi
            .poll_engine(effective.thrust.is_active(), &mut self.events);

        self.landing.advance(dt);
        self.sync_occupied();

        let mut leg_refilled = self.process_landing();
        if self.status != GameStatus::Playing {
            return;
        }

        for action in self.scheduler.advance(dt) {
            match action {
                ScheduledAction::SpawnMission => leg_refilled |= self.spawn_mission(),
                ScheduledAction::LowTimeWarning => {
                    self.low_time = None;
                    self.events.push(GameEvent::LowTime {
                        remaining: self.missions.time_remaining(),
                    });
                }
            }
        }

        if !leg_refilled && self.missions.tick_timer(dt) {
            self.game_over(GameOverReason::TimeRanOut);
        }
    }

    // ------------------------------------------------------------------
    // Level lifecycle
    // ------------------------------------------------------------------

    fn load_level(&mut self, level_number: u32) {
        self.scheduler.cancel_all();
        self.low_time = None;
        self.landing.reset();
        self.missions.clear_level();

        let seed = self
            .run_seed
            .map(|s| s.wrapping_add(u64::from(level_number).wrapping_mul(LEVEL_SEED_STRIDE)));
        let level = generate_level(level_number, seed, &self.tuning.layout);

        self.rng = ChaCha8Rng::seed_from_u64(level.config.seed);
        self.rng.set_stream(MISSION_STREAM);
        self.level = Some(level);

        self.events.push(GameEvent::LevelLoaded { level_number });
        self.set_status(GameStatus::Ready);
    }

    fn begin_level(&mut self) {
        self.set_status(GameStatus::Playing);
        if !self.spawn_mission() {
            log::warn!("Level {} started without a mission", self.current_level());
        }
    }

    fn complete_level(&mut self) {
        self.scheduler.cancel_all();
        self.low_time = None;
        self.missions.halt_timer();
        let level_number = self.current_level();
        let score = self.missions.score();
        log::info!("Level {} complete, score {}", level_number, score);
        self.events.push(GameEvent::LevelComplete {
            level_number,
            score,
        });
        self.set_status(GameStatus::LevelComplete);
    }

    fn game_over(&mut self, reason: GameOverReason) {
        self.scheduler.cancel_all();
        self.low_time = None;
        self.missions.halt_timer();
        self.over_reason = Some(reason);
        log::info!(
            "Game over on level {}: {} (score {})",
            self.current_level(),
            reason,
            self.missions.score()
        );
        self.events.push(GameEvent::GameOver { reason });
        self.set_status(GameStatus::GameOver);
    }

    fn set_status(&mut self, to: GameStatus) {
        let from = self.status;
        if from == to {
            return;
        }
        self.status = to;
        self.events.push(GameEvent::StatusChanged { from, to });
    }

    // ------------------------------------------------------------------
    // Missions
    // ------------------------------------------------------------------

    /// Create the next mission. Returns whether one was created (which
    /// restarts the leg timer).
    fn spawn_mission(&mut self) -> bool {
        let Some(level) = self.level.as_mut() else {
            return false;
        };
        let now = self.scheduler.now();
        let Some(passenger) = self
            .missions
            .create_mission(&mut level.platforms, now, &mut self.rng)
        else {
            return false;
        };
        let passenger_id = passenger.id;
        let pickup_platform_id = passenger.pickup_platform_id.clone();
        let destination_platform_id = passenger.destination_platform_id.clone();

        let mission_id = self
            .missions
            .missions()
            .iter()
            .rev()
            .find(|m| m.passenger_id == passenger_id)
            .map_or(0, |m| m.id);
        self.events.push(GameEvent::MissionCreated {
            mission_id,
            pickup_platform_id,
            destination_platform_id,
        });
        self.events.speech(passenger_id, LineKind::Greeting);
        self.arm_low_time_warning();
        true
    }

    /// Honor a pickup or delivery on the platform the taxi has settled on.
    /// Returns whether the leg timer was refilled.
    fn process_landing(&mut self) -> bool {
        let Some(platform_id) = self
            .landing
            .settled_on(self.tuning.mission.dwell_time)
            .map(str::to_string)
        else {
            return false;
        };

        let delivering = self
            .missions
            .active_mission()
            .is_some_and(|m| m.destination_platform_id == platform_id);
        if delivering {
            return self.deliver(&platform_id);
        }

        let waiting_here = self.missions.active_mission().is_none()
            && self
                .missions
                .waiting_missions()
                .any(|m| m.pickup_platform_id == platform_id);
        if waiting_here {
            return self.pickup(&platform_id);
        }
        false
    }

    fn pickup(&mut self, platform_id: &str) -> bool {
        let Some(level) = self.level.as_mut() else {
            return false;
        };
        let Some(outcome) = self.missions.pickup(platform_id, &mut level.platforms) else {
            return false;
        };
        self.events.push(GameEvent::PassengerPickedUp {
            mission_id: outcome.mission_id,
            platform_id: platform_id.to_string(),
        });
        self.events.speech(outcome.passenger_id, LineKind::Destination);
        let chatty = self
            .missions
            .passenger(outcome.passenger_id)
            .is_some_and(|p| p.dialogue.small_talk.is_some());
        if chatty {
            self.events.speech(outcome.passenger_id, LineKind::SmallTalk);
        }
        self.arm_low_time_warning();
        true
    }

    fn deliver(&mut self, platform_id: &str) -> bool {
        let Some(outcome) = self.missions.deliver(platform_id) else {
            return false;
        };
        self.events.push(GameEvent::PassengerDelivered {
            mission_id: outcome.mission_id,
            platform_id: platform_id.to_string(),
            score_gained: outcome.score_gained,
        });
        self.events.speech(outcome.passenger_id, LineKind::Farewell);
        self.disarm_low_time_warning();

        if self.missions.completed_count() >= self.total_missions() {
            self.complete_level();
        } else {
            self.scheduler
                .schedule(self.tuning.mission.spawn_delay, ScheduledAction::SpawnMission);
        }
        true
    }

    fn arm_low_time_warning(&mut self) {
        self.disarm_low_time_warning();
        let delay = self.tuning.mission.leg_duration - self.tuning.mission.low_time_warning;
        if delay > 0.0 {
            self.low_time = Some(
                self.scheduler
                    .schedule(delay, ScheduledAction::LowTimeWarning),
            );
        }
    }

    fn disarm_low_time_warning(&mut self) {
        if let Some(handle) = self.low_time.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn sync_occupied(&mut self) {
        let landed = self.landing.landed_on();
        if let Some(level) = self.level.as_mut() {
            for p in &mut level.platforms {
                p.occupancy.is_occupied = landed == Some(p.id.as_str());
            }
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.over_reason
    }

    pub fn current_level(&self) -> u32 {
        self.level.as_ref().map_or(0, |l| l.config.level_number)
    }

    pub fn total_missions(&self) -> u32 {
        self.level.as_ref().map_or(0, |l| l.config.passenger_count)
    }

    /// Whether the current level is the last designed one.
    pub fn is_final_level(&self) -> bool {
        self.tuning
            .max_level
            .is_some_and(|max| self.current_level() >= max)
    }

    pub fn state(&self) -> GameState {
        GameState {
            current_level: self.current_level(),
            score: self.missions.score(),
            completed_missions: self.missions.completed_count(),
            total_missions: self.total_missions(),
            game_status: self.status,
            time_remaining: self.missions.time_remaining(),
            game_over_reason: self.over_reason,
        }
    }

    pub fn level(&self) -> Option<&LevelData> {
        self.level.as_ref()
    }

    pub fn platform(&self, id: &str) -> Result<&Platform, GameError> {
        self.level
            .as_ref()
            .and_then(|l| l.platform(id))
            .ok_or_else(|| GameError::UnknownPlatform(id.to_string()))
    }

    pub fn missions(&self) -> &MissionState {
        &self.missions
    }

    pub fn taxi(&self) -> &TaxiFlightState {
        &self.taxi
    }

    pub fn landing(&self) -> &LandingTracker {
        &self.landing
    }

    pub fn tuning(&self) -> &GameTuning {
        &self.tuning
    }

    /// Actions still scheduled for the current level.
    pub fn pending_actions(&self) -> usize {
        self.scheduler.pending_count()
    }

    /// Take all events raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            state: self.state(),
            platforms: self
                .level
                .as_ref()
                .map(|l| l.platforms.clone())
                .unwrap_or_default(),
            missions: self.missions.missions().to_vec(),
            boarded_passenger_id: self.missions.boarded_passenger().map(|p| p.id),
            gear: self.taxi.gear(),
            engine: self.taxi.engine(),
            landed_on: self.landing.landed_on().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::MissionStatus;

    const DT: f32 = 0.1;

    fn started(seed: u64) -> Game {
        let mut game = Game::new(GameTuning::default(), Some(seed)).unwrap();
        assert!(game.start());
        game
    }

    fn gear_down(game: &mut Game) {
        game.tick(DT, &InputFrame::gear_toggle());
        assert_eq!(game.taxi().gear(), GearState::GearDown);
    }

    /// Sit on a platform for `ticks` frames.
    fn sit(game: &mut Game, platform_id: &str, ticks: usize) {
        for _ in 0..ticks {
            game.report_collision(platform_id, GearState::GearDown);
            game.tick(DT, &InputFrame::idle());
        }
    }

    fn waiting_pickup(game: &Game) -> String {
        game.missions()
            .waiting_missions()
            .next()
            .unwrap()
            .pickup_platform_id
            .clone()
    }

    #[test]
    fn test_start_reaches_playing_with_mission() {
        let mut game = started(1);
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.current_level(), 1);
        assert_eq!(game.missions().missions().len(), 1);
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::LevelLoaded { level_number: 1 }));
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::Speech { kind: LineKind::Greeting, .. })));
        assert!(!game.start());
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let mut tuning = GameTuning::default();
        tuning.layout.max_iterations = 0;
        assert!(matches!(
            Game::new(tuning, None),
            Err(GameError::InvalidTuning(_))
        ));
    }

    #[test]
    fn test_pickup_requires_dwell() {
        let mut game = started(2);
        gear_down(&mut game);
        let pickup = waiting_pickup(&game);

        sit(&mut game, &pickup, 3);
        assert!(game.missions().active_mission().is_none());

        // Lifting off resets the dwell.
        game.tick(DT, &InputFrame::idle());
        sit(&mut game, &pickup, 3);
        assert!(game.missions().active_mission().is_none());

        sit(&mut game, &pickup, 3);
        assert!(game.missions().active_mission().is_some());
        assert!(game.state().time_remaining > 19.8);
    }

    #[test]
    fn test_crash_ends_game() {
        let mut game = started(3);
        let id = game.level().unwrap().platforms[0].id.clone();
        game.report_collision(&id, GearState::GearUp);
        assert_eq!(game.status(), GameStatus::GameOver);
        assert_eq!(game.game_over_reason(), Some(GameOverReason::Crashed));
        assert_eq!(game.pending_actions(), 0);
        let remaining = game.state().time_remaining;
        game.tick(5.0, &InputFrame::idle());
        assert_eq!(game.state().time_remaining, remaining);
    }

    #[test]
    fn test_unknown_platform_ignored() {
        let mut game = started(4);
        game.report_collision("Nowhere-00", GearState::GearUp);
        assert_eq!(game.status(), GameStatus::Playing);
        assert!(matches!(
            game.platform("Nowhere-00"),
            Err(GameError::UnknownPlatform(_))
        ));
    }

    #[test]
    fn test_pause_freezes_timer() {
        let mut game = started(5);
        game.tick(1.0, &InputFrame::idle());
        let before = game.state().time_remaining;
        game.tick(1.0, &InputFrame::pause_toggle());
        assert_eq!(game.status(), GameStatus::Paused);
        for _ in 0..100 {
            game.tick(1.0, &InputFrame::idle());
        }
        assert_eq!(game.state().time_remaining, before);
        game.tick(0.0, &InputFrame::pause_toggle());
        assert_eq!(game.status(), GameStatus::Playing);
    }

    #[test]
    fn test_low_time_warning_fires_once_per_leg() {
        let mut game = started(6);
        game.drain_events();
        for _ in 0..16 {
            game.tick(1.0, &InputFrame::idle());
        }
        let warnings = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::LowTime { .. }))
            .count();
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_delivery_beats_expiry_same_tick() {
        let mut game = started(7);
        gear_down(&mut game);
        let pickup = waiting_pickup(&game);
        sit(&mut game, &pickup, 6);
        let dest = game
            .missions()
            .active_mission()
            .unwrap()
            .destination_platform_id
            .clone();

        // Leave 0.65s on the clock, touch down with 0.25s left, then let the
        // dwell complete on the very tick the timer would hit zero.
        game.tick(19.35, &InputFrame::idle());
        for _ in 0..4 {
            game.report_collision(&dest, GearState::GearDown);
            game.tick(DT, &InputFrame::idle());
        }
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.missions().completed_count(), 0);
        game.report_collision(&dest, GearState::GearDown);
        game.tick(1.0, &InputFrame::idle());

        assert_ne!(game.status(), GameStatus::GameOver);
        assert_eq!(game.missions().completed_count(), 1);
    }

    #[test]
    fn test_next_mission_after_cooldown() {
        let mut game = started(8);
        gear_down(&mut game);
        let pickup = waiting_pickup(&game);
        sit(&mut game, &pickup, 6);
        let dest = game
            .missions()
            .active_mission()
            .unwrap()
            .destination_platform_id
            .clone();
        sit(&mut game, &dest, 6);
        assert_eq!(game.missions().count_with_status(MissionStatus::Completed), 1);
        assert_eq!(game.missions().waiting_missions().count(), 0);
        assert!(!game.missions().timer().is_running());

        for _ in 0..11 {
            game.tick(DT, &InputFrame::idle());
        }
        assert_eq!(game.missions().waiting_missions().count(), 1);
        assert!(game.missions().timer().is_running());
    }

    #[test]
    fn test_occupancy_tracks_landing() {
        let mut game = started(9);
        gear_down(&mut game);
        let id = game.level().unwrap().platforms[1].id.clone();
        sit(&mut game, &id, 1);
        assert!(game.platform(&id).unwrap().occupancy.is_occupied);
        game.tick(DT, &InputFrame::idle());
        assert!(!game.platform(&id).unwrap().occupancy.is_occupied);
    }

    #[test]
    fn test_thrust_drives_engine_events() {
        let mut game = started(10);
        game.drain_events();
        game.tick(DT, &InputFrame::thrust(0.0, -1.0));
        game.tick(DT, &InputFrame::idle());
        let engine: Vec<_> = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::EngineChanged { .. }))
            .collect();
        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn test_advance_requires_level_complete() {
        let mut game = started(11);
        assert!(!game.advance_level());
        assert_eq!(game.current_level(), 1);
    }
}
