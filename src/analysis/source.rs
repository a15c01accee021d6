//! Power source parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::circuit::{parse_value, Component, ComponentKind};
use crate::error::{AmpflowError, Result};

/// Smallest speed-scale multiplier the slider allows.
pub const MIN_SPEED_SCALE: f64 = 0.1;
/// Largest speed-scale multiplier the slider allows.
pub const MAX_SPEED_SCALE: f64 = 2.0;
/// Mains frequency assumed for AC sources.
pub const DEFAULT_FREQUENCY: f64 = 50.0;
/// Voltage assumed when no usable source value exists.
pub const DEFAULT_VOLTAGE: f64 = 9.0;

/// Kind of the active power source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceKind {
    #[default]
    Dc,
    Ac,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Dc => write!(f, "DC"),
            SourceKind::Ac => write!(f, "AC"),
        }
    }
}

impl std::str::FromStr for SourceKind {
    type Err = AmpflowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DC" => Ok(SourceKind::Dc),
            "AC" => Ok(SourceKind::Ac),
            other => Err(AmpflowError::invalid_source(
                "kind",
                format!("expected DC or AC, got '{other}'"),
            )),
        }
    }
}

fn default_frequency() -> f64 {
    DEFAULT_FREQUENCY
}

fn default_speed_scale() -> f64 {
    1.0
}

/// The active power source and the user's speed slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceParams {
    pub kind: SourceKind,
    /// Voltage magnitude in volts
    pub voltage: f64,
    /// Frequency in Hz (AC only)
    #[serde(default = "default_frequency")]
    pub frequency: f64,
    /// Animation speed multiplier, kept within [MIN_SPEED_SCALE, MAX_SPEED_SCALE]
    #[serde(default = "default_speed_scale")]
    pub speed_scale: f64,
}

impl Default for SourceParams {
    fn default() -> Self {
        Self::dc(DEFAULT_VOLTAGE)
    }
}

impl SourceParams {
    /// A DC source.
    pub fn dc(voltage: f64) -> Self {
        Self {
            kind: SourceKind::Dc,
            voltage,
            frequency: DEFAULT_FREQUENCY,
            speed_scale: 1.0,
        }
    }

    /// An AC source at `frequency` Hz.
    pub fn ac(voltage: f64, frequency: f64) -> Self {
        Self {
            kind: SourceKind::Ac,
            voltage,
            frequency,
            speed_scale: 1.0,
        }
    }

    /// Set the speed multiplier, clamped into the slider range.
    pub fn with_speed_scale(mut self, scale: f64) -> Self {
        self.speed_scale = clamp_speed_scale(scale);
        self
    }

    /// Derive the source from the first DC or AC source component.
    ///
    /// The component's value string supplies the voltage. Without a source
    /// component, or when its value does not parse, a 9 V DC source is used.
    pub fn from_components(components: &[Component]) -> Self {
        let Some(source) = components.iter().find(|c| c.kind.is_source()) else {
            return Self::default();
        };

        let voltage = source
            .numeric_value
            .filter(|v| v.is_finite() && *v > 0.0)
            .or_else(|| parse_value(&source.value).map(|v| v.magnitude))
            .filter(|v| *v > 0.0)
            .unwrap_or(DEFAULT_VOLTAGE);

        match source.kind {
            ComponentKind::AcSource => Self::ac(voltage, DEFAULT_FREQUENCY),
            _ => Self::dc(voltage),
        }
    }

    /// Check that the parameters are usable by the analysis.
    ///
    /// The analysis itself never fails; this is for values arriving from
    /// outside (circuit files, CLI flags, JS).
    pub fn validate(&self) -> Result<()> {
        if !self.voltage.is_finite() || self.voltage < 0.0 {
            return Err(AmpflowError::invalid_source(
                "voltage",
                format!("must be a finite, non-negative number (got {})", self.voltage),
            ));
        }
        if self.kind == SourceKind::Ac && !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(AmpflowError::invalid_source(
                "frequency",
                format!("must be positive for AC sources (got {})", self.frequency),
            ));
        }
        if !self.speed_scale.is_finite() {
            return Err(AmpflowError::invalid_source("speed_scale", "must be finite"));
        }
        Ok(())
    }

    /// Frequency actually used by the analysis (non-positive falls back to 50 Hz).
    pub fn effective_frequency(&self) -> f64 {
        if self.frequency.is_finite() && self.frequency > 0.0 {
            self.frequency
        } else {
            DEFAULT_FREQUENCY
        }
    }
}

/// Clamp a speed multiplier into the slider range.
pub fn clamp_speed_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return 1.0;
    }
    scale.clamp(MIN_SPEED_SCALE, MAX_SPEED_SCALE)
}
