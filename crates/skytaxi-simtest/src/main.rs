//! SkyTaxi Headless Gameplay Harness
//!
//! Validates level generation and full game runs without rendering, physics
//! or audio. An autopilot lands on platforms by reporting contacts directly.
//!
//! Usage:
//!   cargo run -p skytaxi-simtest
//!   cargo run -p skytaxi-simtest -- --verbose
//!   cargo run -p skytaxi-simtest -- --tuning path/to/tuning.json
//!
//! `RUST_LOG` overrides the log filter (default `warn`, `info` with `--verbose`).

use std::collections::HashSet;

use skytaxi_logic::events::GameEvent;
use skytaxi_logic::flight::{FlightState, GearState, TaxiFlightState};
use skytaxi_logic::input::InputFrame;
use skytaxi_logic::layout::{generate_level, Bounds, LevelConfig};
use skytaxi_logic::spacing::spacing_violations;
use skytaxi_logic::tuning::{validate_tuning, GameTuning};
use skytaxi_logic::{Game, GameOverReason, GameStatus};

// ── Bundled tuning (same JSON a frontend ships) ─────────────────────────
const TUNING_JSON: &str = include_str!("../../../data/default_tuning.json");

const DT: f32 = 1.0 / 60.0;
const LAYOUT_LEVELS: u32 = 30;
const LAYOUT_SEEDS: u64 = 8;
const AUTOPILOT_LEVELS: u32 = 3;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let tuning_path = args
        .iter()
        .position(|a| a == "--tuning")
        .and_then(|i| args.get(i + 1))
        .cloned();

    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    println!("=== SkyTaxi Gameplay Harness ===\n");

    let mut results = Vec::new();

    // 1. Tuning load & validation
    let tuning = match load_tuning(tuning_path.as_deref(), &mut results) {
        Some(t) => t,
        None => {
            report(&results, verbose);
            std::process::exit(1);
        }
    };

    // 2. Layout sweep over levels and seeds
    results.extend(validate_layouts(&tuning, verbose));

    // 3. Flight state machine edges
    results.extend(validate_flight());

    // 4. Autopilot through several levels
    results.extend(validate_autopilot(&tuning, verbose));

    // 5. Game-over paths
    results.extend(validate_game_over(&tuning));

    if report(&results, verbose) > 0 {
        std::process::exit(1);
    }
}

/// Print the summary and return the number of failures.
fn report(results: &[TestResult], verbose: bool) -> usize {
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    for r in results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed,
        results.len(),
        failed
    );
    failed
}

// ── 1. Tuning ───────────────────────────────────────────────────────────

fn load_tuning(path: Option<&str>, results: &mut Vec<TestResult>) -> Option<GameTuning> {
    println!("--- Tuning ---");

    let bundled = match GameTuning::from_json(TUNING_JSON) {
        Ok(t) => t,
        Err(e) => {
            results.push(TestResult {
                name: "tuning_parse".into(),
                passed: false,
                detail: format!("bundled tuning: {}", e),
            });
            return None;
        }
    };
    results.push(TestResult {
        name: "tuning_bundled_matches_defaults".into(),
        passed: bundled == GameTuning::default(),
        detail: "data/default_tuning.json vs built-in defaults".into(),
    });

    let tuning = match path {
        None => bundled,
        Some(path) => {
            let parsed = std::fs::read_to_string(path)
                .map_err(|e| e.to_string())
                .and_then(|json| GameTuning::from_json(&json).map_err(|e| e.to_string()));
            match parsed {
                Ok(t) => {
                    log::info!("Loaded tuning override from {}", path);
                    t
                }
                Err(e) => {
                    results.push(TestResult {
                        name: "tuning_parse".into(),
                        passed: false,
                        detail: format!("{}: {}", path, e),
                    });
                    return None;
                }
            }
        }
    };

    let errors = validate_tuning(&tuning);
    results.push(TestResult {
        name: "tuning_valid".into(),
        passed: errors.is_empty(),
        detail: if errors.is_empty() {
            "no validation errors".into()
        } else {
            errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        },
    });
    if !errors.is_empty() {
        return None;
    }
    Some(tuning)
}

// ── 2. Layouts ──────────────────────────────────────────────────────────

fn validate_layouts(tuning: &GameTuning, verbose: bool) -> Vec<TestResult> {
    println!("--- Layout Sweep ---");
    let layout = &tuning.layout;
    let bounds = Bounds::from_tuning(layout);
    let mut results = Vec::new();

    // Counts never shrink as levels go up.
    let mut monotone = true;
    let mut prev = LevelConfig::for_level(1, layout, Some(0));
    for level in 2..=LAYOUT_LEVELS {
        let cfg = LevelConfig::for_level(level, layout, Some(0));
        monotone &= cfg.platform_count >= prev.platform_count
            && cfg.passenger_count >= prev.passenger_count
            && cfg.platform_count <= layout.max_platform_count
            && cfg.passenger_count <= layout.max_passenger_count;
        prev = cfg;
    }
    results.push(TestResult {
        name: "layout_counts_monotone".into(),
        passed: monotone,
        detail: format!(
            "level {} → {} platforms, {} passengers",
            LAYOUT_LEVELS, prev.platform_count, prev.passenger_count
        ),
    });

    let mut generated = 0;
    let mut duplicate_ids = 0;
    let mut out_of_bounds = 0;
    let mut unconverged = 0;
    let mut misreported = 0;
    let mut max_passes = 0;

    for level in 1..=LAYOUT_LEVELS {
        for seed in 0..LAYOUT_SEEDS {
            let data = generate_level(level, Some(seed), layout);
            generated += 1;

            let ids: HashSet<&str> = data.platforms.iter().map(|p| p.id.as_str()).collect();
            if ids.len() != data.platforms.len() {
                duplicate_ids += 1;
            }
            out_of_bounds += data
                .platforms
                .iter()
                .filter(|p| !bounds.contains(p.x, p.y))
                .count();

            let actual = spacing_violations(&data.platforms, layout.min_distance).len();
            if actual != data.spacing.violations {
                misreported += 1;
            }
            if !data.spacing.converged {
                unconverged += 1;
                if verbose {
                    println!(
                        "    level {} seed {}: {} violations after {} passes",
                        level, seed, actual, data.spacing.iterations
                    );
                }
            }
            max_passes = max_passes.max(data.spacing.iterations);
        }
    }

    results.push(TestResult {
        name: "layout_unique_ids".into(),
        passed: duplicate_ids == 0,
        detail: format!("{} levels with duplicate ids out of {}", duplicate_ids, generated),
    });
    results.push(TestResult {
        name: "layout_within_bounds".into(),
        passed: out_of_bounds == 0,
        detail: format!("{} platforms outside the safe area", out_of_bounds),
    });
    results.push(TestResult {
        name: "layout_spacing_report_accurate".into(),
        passed: misreported == 0,
        detail: format!("{} levels with a wrong violation count", misreported),
    });
    results.push(TestResult {
        name: "layout_spacing_resolved".into(),
        passed: unconverged * 20 <= generated,
        detail: format!(
            "{}/{} levels converged (max {} passes)",
            generated - unconverged,
            generated,
            max_passes
        ),
    });

    results
}

// ── 3. Flight ───────────────────────────────────────────────────────────

fn validate_flight() -> Vec<TestResult> {
    println!("--- Flight State ---");
    let mut results = Vec::new();
    let mut taxi = TaxiFlightState::new();

    let gear_edges = taxi.valid_transitions();
    results.push(TestResult {
        name: "flight_gear_up_edges".into(),
        passed: gear_edges == vec![FlightState::GearDown],
        detail: format!("from gear up / idle: {:?}", gear_edges),
    });

    taxi.poll_engine(true, &mut ());
    let thrusting = taxi.engine();
    let edges = taxi.valid_transitions();
    results.push(TestResult {
        name: "flight_engine_follows_thrust".into(),
        passed: thrusting == skytaxi_logic::flight::EngineState::Thrusting
            && !edges.contains(&FlightState::Idle),
        detail: format!("engine {:?}, edges {:?}", thrusting, edges),
    });

    let rejected = !taxi.request(FlightState::GearUp, &mut ());
    taxi.toggle_gear(&mut ());
    results.push(TestResult {
        name: "flight_gear_toggle".into(),
        passed: rejected && taxi.gear() == GearState::GearDown,
        detail: format!("gear now {:?}", taxi.gear()),
    });

    results
}

// ── 4. Autopilot ────────────────────────────────────────────────────────

/// Sit on a platform until `done` holds (or a timeout). Returns whether it held.
fn land_until(game: &mut Game, platform_id: &str, done: impl Fn(&Game) -> bool) -> bool {
    let limit = (game.tuning().mission.dwell_time / DT) as usize + 30;
    for _ in 0..limit {
        game.report_collision(platform_id, GearState::GearDown);
        game.tick(DT, &InputFrame::idle());
        if done(game) {
            return true;
        }
    }
    false
}

/// Hover until a passenger is waiting (or the game leaves `Playing`).
fn wait_for_passenger(game: &mut Game) -> Option<String> {
    let limit = (game.tuning().mission.spawn_delay / DT) as usize + 30;
    for _ in 0..limit {
        if let Some(m) = game.missions().waiting_missions().next() {
            return Some(m.pickup_platform_id.clone());
        }
        if game.status() != GameStatus::Playing {
            return None;
        }
        game.tick(DT, &InputFrame::thrust(0.0, -0.5));
    }
    None
}

fn play_level(game: &mut Game) -> Result<(), String> {
    let total = game.state().total_missions;
    while game.status() == GameStatus::Playing {
        let Some(pickup) = wait_for_passenger(game) else {
            return Err("no passenger appeared".into());
        };
        game.tick(DT, &InputFrame::idle());
        if !land_until(game, &pickup, |g| g.missions().active_mission().is_some()) {
            return Err(format!("pickup at {} never completed", pickup));
        }
        let dest = game
            .missions()
            .active_mission()
            .map(|m| m.destination_platform_id.clone())
            .ok_or("passenger vanished")?;
        let done = game.state().completed_missions;
        game.tick(DT, &InputFrame::idle());
        if !land_until(game, &dest, |g| g.state().completed_missions > done) {
            return Err(format!("delivery at {} never completed", dest));
        }
        if game.state().completed_missions >= total {
            break;
        }
    }
    match game.status() {
        GameStatus::LevelComplete => Ok(()),
        other => Err(format!("ended level in {:?}", other)),
    }
}

fn validate_autopilot(tuning: &GameTuning, verbose: bool) -> Vec<TestResult> {
    println!("--- Autopilot ---");
    let mut results = Vec::new();

    let mut game = match Game::new(tuning.clone(), Some(2024)) {
        Ok(g) => g,
        Err(e) => {
            results.push(TestResult {
                name: "autopilot_new_game".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };
    game.start();
    game.tick(DT, &InputFrame::gear_toggle());

    let mut last_score = 0;
    for level in 1..=AUTOPILOT_LEVELS {
        let outcome = play_level(&mut game);
        let state = game.state();
        results.push(TestResult {
            name: format!("autopilot_level_{}", level),
            passed: outcome.is_ok() && state.score > last_score,
            detail: match &outcome {
                Ok(()) => format!(
                    "{}/{} delivered, score {}",
                    state.completed_missions, state.total_missions, state.score
                ),
                Err(e) => e.clone(),
            },
        });
        if outcome.is_err() {
            break;
        }
        last_score = state.score;

        let events = game.drain_events();
        let deliveries = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PassengerDelivered { .. }))
            .count();
        results.push(TestResult {
            name: format!("autopilot_level_{}_events", level),
            passed: deliveries == state.total_missions as usize,
            detail: format!("{} events, {} deliveries", events.len(), deliveries),
        });

        if verbose {
            match serde_json::to_string_pretty(&game.snapshot()) {
                Ok(json) => println!("{}", json),
                Err(e) => log::warn!("Snapshot serialization failed: {}", e),
            }
        }

        if level < AUTOPILOT_LEVELS && !game.advance_level() {
            results.push(TestResult {
                name: "autopilot_advance".into(),
                passed: false,
                detail: format!("could not advance past level {}", level),
            });
            break;
        }
    }

    results
}

// ── 5. Game over ────────────────────────────────────────────────────────

fn validate_game_over(tuning: &GameTuning) -> Vec<TestResult> {
    println!("--- Game Over ---");
    let mut results = Vec::new();

    let Ok(mut idle) = Game::new(tuning.clone(), Some(7)) else {
        return results;
    };
    idle.start();
    let limit = (tuning.mission.leg_duration / DT) as usize + 60;
    for _ in 0..limit {
        idle.tick(DT, &InputFrame::idle());
    }
    let state = idle.state();
    results.push(TestResult {
        name: "game_over_timeout".into(),
        passed: state.game_status == GameStatus::GameOver
            && state.game_over_reason == Some(GameOverReason::TimeRanOut),
        detail: format!(
            "{:?} ({})",
            state.game_status,
            state
                .game_over_reason
                .map_or("no reason".to_string(), |r| r.to_string())
        ),
    });

    let Ok(mut crash) = Game::new(tuning.clone(), Some(8)) else {
        return results;
    };
    crash.start();
    let target = crash
        .level()
        .and_then(|l| l.platforms.first())
        .map(|p| p.id.clone())
        .unwrap_or_default();
    crash.report_collision(&target, GearState::GearUp);
    let state = crash.state();
    results.push(TestResult {
        name: "game_over_crash".into(),
        passed: state.game_status == GameStatus::GameOver
            && state.game_over_reason == Some(GameOverReason::Crashed)
            && crash.pending_actions() == 0,
        detail: format!("{:?} with {:.1}s left", state.game_status, state.time_remaining),
    });

    results
}
