//! Per-frame progress along the flow path.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::path::FlowPath;
use crate::circuit::Wire;
use crate::geometry::Point;

/// Whether the indicator is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowState {
    Flowing,
    #[default]
    Frozen,
}

/// Moves a progress value around a [`FlowPath`] at a given speed.
///
/// The indicator loops forever: progress wraps modulo 1. Whenever the speed
/// drops to zero (or the path has fewer than two points) the indicator
/// freezes at the start of the path.
#[derive(Debug, Clone)]
pub struct FlowAnimator {
    path: FlowPath,
    fallback: Vec<Point>,
    /// Fraction of total path length, in [0, 1)
    progress: f64,
    state: FlowState,
    last_tick: Option<Duration>,
}

impl FlowAnimator {
    /// Create an animator over `wires`, using `fallback` when there are none.
    pub fn new(wires: &[Wire], fallback: Vec<Point>) -> Self {
        Self {
            path: FlowPath::from_wires(wires, &fallback),
            fallback,
            progress: 0.0,
            state: FlowState::Frozen,
            last_tick: None,
        }
    }

    /// Rebuild the path after the wire set changed. Progress restarts at 0.
    pub fn rebuild(&mut self, wires: &[Wire]) {
        self.path = FlowPath::from_wires(wires, &self.fallback);
        self.progress = 0.0;
        tracing::debug!(
            points = self.path.len(),
            length = self.path.total_length(),
            "flow path rebuilt"
        );
    }

    /// Set the reference time for the first tick.
    pub fn start(&mut self, now: Duration) {
        self.last_tick = Some(now);
    }

    /// Advance to `now` moving at `speed` pixels per second.
    ///
    /// The elapsed time is measured from the previous tick (or [`start`]);
    /// a clock that runs backwards counts as no elapsed time.
    ///
    /// [`start`]: Self::start
    pub fn tick(&mut self, now: Duration, speed: f64) -> FlowState {
        let elapsed = self
            .last_tick
            .map(|last| now.saturating_sub(last))
            .unwrap_or_default();
        self.last_tick = Some(now);

        let next = if speed > 0.0 && self.path.len() > 1 {
            let total = self.path.total_length();
            if total > 0.0 {
                let advance = speed * elapsed.as_secs_f64() / total;
                self.progress = (self.progress + advance).rem_euclid(1.0);
            }
            FlowState::Flowing
        } else {
            self.progress = 0.0;
            FlowState::Frozen
        };

        if next != self.state {
            tracing::debug!(from = ?self.state, to = ?next, speed, "flow state changed");
        }
        self.state = next;

        tracing::trace!(progress = self.progress, elapsed = ?elapsed, "tick");
        next
    }

    /// Current indicator position, or `None` when nothing is visible.
    pub fn position(&self) -> Option<Point> {
        self.path.point_at(self.progress)
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn is_flowing(&self) -> bool {
        self.state == FlowState::Flowing
    }

    pub fn path(&self) -> &FlowPath {
        &self.path
    }
}
