//! Circuit analysis.
//!
//! The circuit is treated as one series loop: component values are summed by
//! kind, regardless of where they sit on the canvas, and a single current
//! magnitude is derived from the active source.
//!
//! ## DC
//!
//! Steady state: capacitors block (current is 0 once any capacitance is
//! present), inductors conduct freely, and `I = V / R`.
//!
//! ## AC
//!
//! ```text
//! ω  = 2πf
//! Xl = ωL
//! Xc = 1 / (ωC)          (0 when there is no capacitance)
//! |Z| = sqrt(R² + (Xl - Xc)²)
//! I  = V / |Z|
//! ```
//!
//! Any open switch forces the result to 0. The result is clamped to
//! [0, [`MAX_DISPLAY_CURRENT`]] because it only drives an animation.

mod current;
mod source;
mod speed;

pub use current::{
    analyze, compute_current_magnitude, AnalysisResult, ComponentTotals, DEFAULT_CAPACITANCE,
    DEFAULT_INDUCTANCE, DEFAULT_RESISTANCE,
};
pub use source::{
    clamp_speed_scale, SourceKind, SourceParams, DEFAULT_FREQUENCY, DEFAULT_VOLTAGE,
    MAX_SPEED_SCALE, MIN_SPEED_SCALE,
};
pub use speed::{animation_speed, SpeedProfile};

/// Floor for resistance and impedance denominators.
pub const EPSILON: f64 = 1e-6;

/// Upper bound of the reported current (A).
pub const MAX_DISPLAY_CURRENT: f64 = 10.0;
