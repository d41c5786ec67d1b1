//! Spacing relaxation: nudges platforms apart until none are too close.
//!
//! Each pass visits every pair closer than `min_distance` and pushes the two
//! platforms in opposite directions along the line joining them, half the
//! deficit each (plus a small slack so pairs settle strictly outside the
//! limit). Positions are re-clamped after every push. No velocity carries
//! between passes. Stops early when a pass moves nothing.

use serde::{Deserialize, Serialize};

use crate::layout::{Bounds, Platform};

/// Extra separation added to each push so relaxed pairs clear the limit.
const SEPARATION_SLACK: f32 = 0.5;
/// Below this, two platforms are treated as coincident.
const COINCIDENT_EPSILON: f32 = 1e-4;
/// Movement smaller than this does not count as progress.
const MOVE_EPSILON: f32 = 1e-4;

/// Outcome of a relaxation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpacingReport {
    /// Passes performed (including the final no-movement pass).
    pub iterations: u32,
    /// Every pair is at least `min_distance` apart.
    pub converged: bool,
    /// Pairs still too close when relaxation stopped.
    pub violations: usize,
}

/// Relax platform positions in place. Best effort: if the iteration budget
/// runs out (or platforms are pinned against the bounds) the report says so.
pub fn resolve_spacing(
    platforms: &mut [Platform],
    min_distance: f32,
    max_iterations: u32,
    bounds: &Bounds,
) -> SpacingReport {
    let mut iterations = 0;

    while iterations < max_iterations {
        iterations += 1;
        if !relax_pass(platforms, min_distance, bounds) {
            break;
        }
    }

    let violations = spacing_violations(platforms, min_distance).len();
    SpacingReport {
        iterations,
        converged: violations == 0,
        violations,
    }
}

/// One pass over all pairs. Returns whether anything moved.
fn relax_pass(platforms: &mut [Platform], min_distance: f32, bounds: &Bounds) -> bool {
    let mut moved = false;
    let n = platforms.len();

    for i in 0..n {
        for j in (i + 1)..n {
            let dx = platforms[j].x - platforms[i].x;
            let dy = platforms[j].y - platforms[i].y;
            let dist = dx.hypot(dy);
            if dist >= min_distance {
                continue;
            }

            let (ux, uy) = if dist > COINCIDENT_EPSILON {
                (dx / dist, dy / dist)
            } else {
                separation_axis(i, j)
            };
            let push = (min_distance - dist) * 0.5 + SEPARATION_SLACK;

            moved |= nudge(&mut platforms[i], -ux * push, -uy * push, bounds);
            moved |= nudge(&mut platforms[j], ux * push, uy * push, bounds);
        }
    }

    moved
}

/// Move a platform and clamp it; returns whether its position changed.
fn nudge(platform: &mut Platform, dx: f32, dy: f32, bounds: &Bounds) -> bool {
    let (x, y) = bounds.clamp(platform.x + dx, platform.y + dy);
    let changed = (x - platform.x).abs() > MOVE_EPSILON || (y - platform.y).abs() > MOVE_EPSILON;
    platform.x = x;
    platform.y = y;
    changed
}

/// Deterministic push direction for coincident platforms.
fn separation_axis(i: usize, j: usize) -> (f32, f32) {
    let angle = ((i * 7 + j * 13) as f32 * 0.618_034).fract() * std::f32::consts::TAU;
    (angle.cos(), angle.sin())
}

/// All index pairs closer than `min_distance`.
pub fn spacing_violations(platforms: &[Platform], min_distance: f32) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for i in 0..platforms.len() {
        for j in (i + 1)..platforms.len() {
            if platforms[i].position().distance(&platforms[j].position()) < min_distance {
                out.push((i, j));
            }
        }
    }
    out
}
