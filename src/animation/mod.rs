//! Current-flow animation.
//!
//! The wires are flattened into one [`FlowPath`] with cumulative arc lengths,
//! so a single progress value in [0, 1) maps to a point at constant speed no
//! matter how densely the wires are sampled. A [`FlowAnimator`] advances that
//! progress each frame at the speed derived from the analysed current, and a
//! [`TickLoop`] calls it on every frame of a [`FrameClock`].

mod animator;
mod clock;
mod path;

pub use animator::{FlowAnimator, FlowState};
pub use clock::{CancelHandle, FrameClock, ManualClock, SystemClock, TickLoop};
pub use path::{FlowPath, PathLocation, FALLBACK_PATH};

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// What the renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameOutput {
    /// Current magnitude in amperes
    pub current: f64,
    /// Indicator is moving
    pub flowing: bool,
    /// Where to draw the indicator, if anywhere
    pub position: Option<Point>,
    /// Fraction of the path travelled
    pub progress: f64,
}
