//! Game core for Sky Taxi.
//!
//! Everything here is engine-independent: level generation, the taxi's
//! flight state, passengers and missions, the leg timer and the level
//! orchestrator. Rendering, physics and audio live outside and talk to the
//! core through [`input::InputFrame`], [`game::Game::report_collision`] and
//! the drained [`events::GameEvent`] stream.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`error`] | Tuning validation and game construction errors |
//! | [`events`] | Outbound events for render, audio and speech layers |
//! | [`flight`] | Gear/engine state machine and contact classification |
//! | [`game`] | Level orchestration, status machine and tick loop |
//! | [`input`] | Per-tick player intent (thrust, gear, pause) |
//! | [`landing`] | Continuous-contact dwell tracking |
//! | [`layout`] | Star-shaped station generation per level |
//! | [`mission`] | Missions, pickup/delivery and scoring |
//! | [`names`] | Platform ids and passenger names |
//! | [`passenger`] | Personalities and dialogue lines |
//! | [`spacing`] | Iterative minimum-distance relaxation |
//! | [`timer`] | Leg countdown and generation-tagged scheduler |
//! | [`tuning`] | Tunable constants, JSON loading and validation |

pub mod error;
pub mod events;
pub mod flight;
pub mod game;
pub mod input;
pub mod landing;
pub mod layout;
pub mod mission;
pub mod names;
pub mod passenger;
pub mod spacing;
pub mod timer;
pub mod tuning;

pub use error::{GameError, TuningError};
pub use game::{Game, GameOverReason, GameSnapshot, GameState, GameStatus};
pub use tuning::GameTuning;
