//! Per-leg countdown and the delayed-action scheduler.
//!
//! Everything runs on the game's single tick timeline; nothing here sleeps
//! or spawns threads. Scheduled actions carry the generation they were
//! created in, and [`Scheduler::cancel_all`] bumps the generation so that
//! nothing scheduled for a torn-down level can ever fire.

use serde::{Deserialize, Serialize};

// ============================================================================
// LEG COUNTDOWN
// ============================================================================

/// Fixed countdown restarted on every pickup and delivery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegTimer {
    duration: f32,
    remaining: f32,
    running: bool,
}

impl LegTimer {
    /// A stopped timer showing the full duration.
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            remaining: duration,
            running: false,
        }
    }

    /// Refill to the full duration and start counting.
    pub fn restart(&mut self) {
        self.remaining = self.duration;
        self.running = true;
    }

    /// Refill to the full duration without counting.
    pub fn reset_held(&mut self) {
        self.remaining = self.duration;
        self.running = false;
    }

    /// Stop counting, keeping the current value.
    pub fn halt(&mut self) {
        self.running = false;
    }

    /// Advance by `dt`. Returns `true` exactly once, on the tick the
    /// countdown reaches zero; the timer stops itself at that point.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.running {
            return false;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        if self.remaining <= 0.0 {
            self.running = false;
            return true;
        }
        false
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.duration - self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

// ============================================================================
// SCHEDULER
// ============================================================================

/// Identifies one scheduled action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle {
    id: u64,
    generation: u64,
}

#[derive(Debug, Clone)]
struct Pending<A> {
    handle: TimerHandle,
    fire_at: f64,
    action: A,
}

/// Delayed actions on a single timeline, cancellable one at a time or as a
/// whole generation.
#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    now: f64,
    generation: u64,
    next_id: u64,
    pending: Vec<Pending<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            generation: 0,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Run `action` after `delay` seconds of advanced time.
    pub fn schedule(&mut self, delay: f32, action: A) -> TimerHandle {
        let handle = TimerHandle {
            id: self.next_id,
            generation: self.generation,
        };
        self.next_id += 1;
        self.pending.push(Pending {
            handle,
            fire_at: self.now + f64::from(delay.max(0.0)),
            action,
        });
        handle
    }

    /// Cancel one action. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    /// Drop everything pending and start a new generation. Returns how many
    /// actions were discarded.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.generation += 1;
        if dropped > 0 {
            log::debug!(
                "Scheduler generation {} cancelled {} pending actions",
                self.generation - 1,
                dropped
            );
        }
        dropped
    }

    /// Advance time and return every action now due, earliest first
    /// (ties in scheduling order).
    pub fn advance(&mut self, dt: f32) -> Vec<A> {
        self.now += f64::from(dt.max(0.0));
        let now = self.now;
        let generation = self.generation;

        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.fire_at <= now);
        self.pending = rest;

        due.retain(|p| p.handle.generation == generation);
        due.sort_by(|a, b| {
            a.fire_at
                .partial_cmp(&b.fire_at)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.handle.id.cmp(&b.handle.id))
        });
        due.into_iter().map(|p| p.action).collect()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn now(&self) -> f64 {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leg_timer_expires_once() {
        let mut t = LegTimer::new(2.0);
        assert!(!t.tick(1.0), "stopped timer never expires");
        t.restart();
        assert!(!t.tick(1.5));
        assert!((t.remaining() - 0.5).abs() < 1e-6);
        assert!(t.tick(1.0));
        assert_eq!(t.remaining(), 0.0);
        assert!(!t.tick(1.0));
        assert!(!t.is_running());
    }

    #[test]
    fn test_restart_refills() {
        let mut t = LegTimer::new(20.0);
        t.restart();
        t.tick(12.0);
        t.restart();
        assert_eq!(t.remaining(), 20.0);
        assert_eq!(t.elapsed(), 0.0);
    }

    #[test]
    fn test_held_timer_does_not_count() {
        let mut t = LegTimer::new(5.0);
        t.restart();
        t.tick(3.0);
        t.reset_held();
        assert!(!t.tick(10.0));
        assert_eq!(t.remaining(), 5.0);
    }

    #[test]
    fn test_scheduler_fires_in_order() {
        let mut s = Scheduler::new();
        s.schedule(2.0, "late");
        s.schedule(1.0, "early");
        s.schedule(1.0, "early-second");
        assert!(s.advance(0.5).is_empty());
        assert_eq!(s.advance(0.5), vec!["early", "early-second"]);
        assert_eq!(s.advance(5.0), vec!["late"]);
        assert_eq!(s.pending_count(), 0);
    }

    #[test]
    fn test_cancel_single() {
        let mut s = Scheduler::new();
        let a = s.schedule(1.0, 1);
        let _b = s.schedule(1.0, 2);
        assert!(s.cancel(a));
        assert!(!s.cancel(a));
        assert_eq!(s.advance(1.0), vec![2]);
    }

    #[test]
    fn test_cancel_all_prevents_stale_fire() {
        let mut s = Scheduler::new();
        let old = s.schedule(1.0, "old-level");
        assert_eq!(s.cancel_all(), 1);
        assert!(!s.is_pending(old));
        let fresh = s.schedule(1.0, "new-level");
        assert_eq!(s.generation(), 1);
        assert!(s.is_pending(fresh));
        assert_eq!(s.advance(2.0), vec!["new-level"]);
    }

    #[test]
    fn test_zero_delay_fires_next_advance() {
        let mut s = Scheduler::new();
        s.schedule(0.0, ());
        assert_eq!(s.advance(0.0).len(), 1);
    }
}
