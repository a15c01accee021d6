//! Mapping from current magnitude to indicator speed.

use serde::{Deserialize, Serialize};

use super::source::clamp_speed_scale;

/// How a current magnitude becomes an on-screen speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedProfile {
    /// Pixels per second per ampere
    pub gain: f64,
    /// Upper bound in pixels per second
    pub max_speed: f64,
    /// Floor applied whenever the current is above `min_current`
    pub min_visible_speed: f64,
    /// Currents at or below this are treated as no current (A)
    pub min_current: f64,
}

impl Default for SpeedProfile {
    fn default() -> Self {
        Self {
            gain: 120.0,
            max_speed: 600.0,
            min_visible_speed: 10.0,
            min_current: 1e-6,
        }
    }
}

impl SpeedProfile {
    /// Indicator speed in pixels per second.
    ///
    /// Any current above `min_current` moves at least `min_visible_speed`,
    /// never faster than `max_speed`. Anything else yields exactly 0.
    pub fn speed(&self, current: f64, speed_scale: f64) -> f64 {
        if current.is_nan() || current <= self.min_current {
            return 0.0;
        }
        let speed = self.gain * current * clamp_speed_scale(speed_scale);
        speed.min(self.max_speed).max(self.min_visible_speed)
    }
}

/// Indicator speed under the default [`SpeedProfile`].
pub fn animation_speed(current: f64, speed_scale: f64) -> f64 {
    SpeedProfile::default().speed(current, speed_scale)
}
