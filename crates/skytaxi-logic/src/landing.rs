//! Landing dwell — how long the taxi has sat, gear down, on one platform.
//!
//! The collision layer reports a gear-down contact every tick the taxi
//! touches a platform. A tick without a report means the taxi lifted off,
//! which cancels the attempt; touching a different platform starts over.

/// Continuous-contact tracker for one taxi.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandingTracker {
    /// Platform currently landed on.
    platform: Option<String>,
    /// Continuous contact time on `platform`.
    dwell: f32,
    /// Contact reported since the last `advance`.
    reported: Option<String>,
}

impl LandingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a gear-down contact for the current tick.
    pub fn report_contact(&mut self, platform_id: &str) {
        self.reported = Some(platform_id.to_string());
    }

    /// Fold this tick's contact report into the dwell time.
    pub fn advance(&mut self, dt: f32) {
        match self.reported.take() {
            Some(id) if self.platform.as_deref() == Some(id.as_str()) => {
                self.dwell += dt;
            }
            Some(id) => {
                self.platform = Some(id);
                self.dwell = dt;
            }
            None => {
                if let Some(left) = self.platform.take() {
                    log::debug!("Lifted off {} after {:.2}s", left, self.dwell);
                }
                self.dwell = 0.0;
            }
        }
    }

    /// Platform the taxi is landed on, if any.
    pub fn landed_on(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    pub fn dwell(&self) -> f32 {
        self.dwell
    }

    /// The landed platform, once contact has lasted at least `min_dwell`.
    pub fn settled_on(&self, min_dwell: f32) -> Option<&str> {
        if self.dwell >= min_dwell {
            self.landed_on()
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
