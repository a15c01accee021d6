//! Steady-state current magnitude for a single series loop.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::source::{SourceKind, SourceParams};
use super::{EPSILON, MAX_DISPLAY_CURRENT};
use crate::circuit::{Component, ComponentKind, Unit};

/// Resistance assumed for a resistor whose value does not parse (Ω).
pub const DEFAULT_RESISTANCE: f64 = 100.0;
/// Capacitance assumed for a capacitor whose value does not parse (F).
pub const DEFAULT_CAPACITANCE: f64 = 1e-6;
/// Inductance assumed for an inductor whose value does not parse (H).
pub const DEFAULT_INDUCTANCE: f64 = 0.01;

/// Component values summed by kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentTotals {
    /// Total resistance in ohms, including the epsilon seed
    pub resistance: f64,
    /// Total capacitance in farads
    pub capacitance: f64,
    /// Total inductance in henries
    pub inductance: f64,
}

impl ComponentTotals {
    /// Sum resistor, capacitor and inductor magnitudes across all components.
    ///
    /// Position in the list is irrelevant; everything is treated as one
    /// series loop.
    pub fn aggregate(components: &[Component]) -> Self {
        let mut totals = Self {
            resistance: EPSILON,
            capacitance: 0.0,
            inductance: 0.0,
        };

        for component in components {
            let (slot, default, unit) = match component.kind {
                ComponentKind::Resistor => (&mut totals.resistance, DEFAULT_RESISTANCE, Unit::Ohm),
                ComponentKind::Capacitor => (&mut totals.capacitance, DEFAULT_CAPACITANCE, Unit::Farad),
                ComponentKind::Inductor => (&mut totals.inductance, DEFAULT_INDUCTANCE, Unit::Henry),
                _ => continue,
            };
            *slot += component_magnitude(component, default, unit);
        }

        totals
    }

    /// Capacitance counts only above [`EPSILON`], so a lone 1 µF part
    /// (exactly 1e-6) is ignored.
    pub fn has_capacitance(&self) -> bool {
        self.capacitance > EPSILON
    }
}

fn component_magnitude(component: &Component, fallback: f64, expected: Unit) -> f64 {
    let Some(magnitude) = component.magnitude() else {
        tracing::warn!(
            component = %component.id,
            value = %component.value,
            fallback,
            "unparsable component value, using default"
        );
        return fallback;
    };

    if let Some(unit) = component.value_unit().filter(|u| *u != expected) {
        tracing::warn!(
            component = %component.id,
            value = %component.value,
            %unit,
            %expected,
            "value unit does not match component kind"
        );
    }
    magnitude
}

/// Outcome of one analysis pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Current magnitude in amperes, clamped to [0, MAX_DISPLAY_CURRENT]
    pub current: f64,
    /// Aggregated component values
    pub totals: ComponentTotals,
    /// Impedance magnitude used for the division (total resistance for DC),
    /// absent when no current can flow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impedance: Option<f64>,
    /// An open switch forced the result to zero
    pub open_circuit: bool,
    /// A capacitor blocked steady-state DC
    pub dc_blocked: bool,
}

impl AnalysisResult {
    fn open(totals: ComponentTotals) -> Self {
        Self {
            current: 0.0,
            totals,
            impedance: None,
            open_circuit: true,
            dc_blocked: false,
        }
    }
}

/// Analyse a component snapshot under `source`.
pub fn analyze(components: &[Component], source: &SourceParams) -> AnalysisResult {
    let totals = ComponentTotals::aggregate(components);

    if components.iter().any(Component::is_open_switch) {
        return AnalysisResult::open(totals);
    }

    let voltage = source.voltage;
    match source.kind {
        SourceKind::Dc => {
            // Ideal capacitor blocks DC at steady state
            if totals.has_capacitance() {
                return AnalysisResult {
                    current: 0.0,
                    totals,
                    impedance: None,
                    open_circuit: false,
                    dc_blocked: true,
                };
            }
            // Inductors are shorts at DC
            AnalysisResult {
                current: clamp_current(voltage / totals.resistance),
                totals,
                impedance: Some(totals.resistance),
                open_circuit: false,
                dc_blocked: false,
            }
        }
        SourceKind::Ac => {
            let omega = 2.0 * PI * source.effective_frequency();
            let xl = omega * totals.inductance;
            let xc = if totals.has_capacitance() {
                1.0 / (omega * totals.capacitance)
            } else {
                0.0
            };
            let impedance = totals.resistance.hypot(xl - xc).max(EPSILON);

            AnalysisResult {
                current: clamp_current(voltage / impedance),
                totals,
                impedance: Some(impedance),
                open_circuit: false,
                dc_blocked: false,
            }
        }
    }
}

/// Current magnitude in amperes for a component snapshot.
pub fn compute_current_magnitude(components: &[Component], source: &SourceParams) -> f64 {
    analyze(components, source).current
}

fn clamp_current(current: f64) -> f64 {
    if current.is_nan() {
        return 0.0;
    }
    current.clamp(0.0, MAX_DISPLAY_CURRENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::ComponentId;
    use crate::geometry::Point;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn part(kind: ComponentKind, value: &str) -> Component {
        Component::new(ComponentId::new(format!("{kind}")), kind, Point::default(), value)
    }

    fn open_switch() -> Component {
        part(ComponentKind::Switch, "OFF").with_switch_on(false)
    }

    #[test]
    fn test_ohms_law_scenario() {
        let components = [
            part(ComponentKind::DcSource, "9V"),
            part(ComponentKind::Resistor, "3Ω"),
        ];
        let current = compute_current_magnitude(&components, &SourceParams::dc(9.0));
        assert_relative_eq!(current, 3.0, max_relative = 1e-5);
    }

    #[test]
    fn test_ac_rl_scenario_is_clamped() {
        let components = [
            part(ComponentKind::AcSource, "120V"),
            part(ComponentKind::Resistor, "10Ω"),
            part(ComponentKind::Inductor, "10mH"),
        ];
        let result = analyze(&components, &SourceParams::ac(120.0, 50.0));
        assert_relative_eq!(result.totals.inductance, 0.01, max_relative = 1e-12);
        assert_relative_eq!(result.impedance.unwrap(), (100.0f64 + (PI).powi(2)).sqrt(), max_relative = 1e-6);
        assert_eq!(result.current, 10.0);
    }

    #[test]
    fn test_ac_rlc_below_cap() {
        let components = [
            part(ComponentKind::Resistor, "100Ω"),
            part(ComponentKind::Capacitor, "10µF"),
            part(ComponentKind::Inductor, "100mH"),
        ];
        let omega = 2.0 * PI * 60.0;
        let xl = omega * 0.1;
        let xc = 1.0 / (omega * 10e-6);
        let expected = 12.0 / (100.0f64.powi(2) + (xl - xc).powi(2)).sqrt();

        let current = compute_current_magnitude(&components, &SourceParams::ac(12.0, 60.0));
        assert_relative_eq!(current, expected, max_relative = 1e-6);
    }

    #[test]
    fn test_open_switch_nulls_current() {
        let components = [
            part(ComponentKind::DcSource, "9V"),
            part(ComponentKind::Resistor, "3Ω"),
            open_switch(),
        ];
        let result = analyze(&components, &SourceParams::dc(9.0));
        assert_eq!(result.current, 0.0);
        assert!(result.open_circuit);
    }

    #[test]
    fn test_closed_switch_conducts() {
        let components = [
            part(ComponentKind::Resistor, "3Ω"),
            part(ComponentKind::Switch, "ON"),
        ];
        let current = compute_current_magnitude(&components, &SourceParams::dc(9.0));
        assert_relative_eq!(current, 3.0, max_relative = 1e-5);
    }

    #[test]
    fn test_capacitor_blocks_dc() {
        let components = [
            part(ComponentKind::Resistor, "3Ω"),
            part(ComponentKind::Capacitor, "10µF"),
        ];
        let result = analyze(&components, &SourceParams::dc(9.0));
        assert_eq!(result.current, 0.0);
        assert!(result.dc_blocked);
        assert_eq!(result.impedance, None);
    }

    #[test]
    fn test_capacitance_at_epsilon_is_ignored() {
        let components = [
            part(ComponentKind::Resistor, "3Ω"),
            part(ComponentKind::Capacitor, "1µF"),
        ];
        let result = analyze(&components, &SourceParams::dc(9.0));
        assert!(!result.dc_blocked);
        assert_relative_eq!(result.current, 3.0, max_relative = 1e-5);

        // No Xc term either: 120 V over |10 + jωL| saturates
        let components = [
            part(ComponentKind::Resistor, "10Ω"),
            part(ComponentKind::Capacitor, "1µF"),
            part(ComponentKind::Inductor, "1mH"),
        ];
        let current = compute_current_magnitude(&components, &SourceParams::ac(120.0, 50.0));
        assert_eq!(current, MAX_DISPLAY_CURRENT);
    }

    #[test]
    fn test_result_json_roundtrip_without_impedance() {
        let components = [part(ComponentKind::Resistor, "3Ω"), open_switch()];
        let result = analyze(&components, &SourceParams::dc(9.0));
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("impedance"));
        let decoded: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, result);
    }

    #[test]
    fn test_inductor_is_short_at_dc() {
        let components = [
            part(ComponentKind::Resistor, "6Ω"),
            part(ComponentKind::Inductor, "1H"),
        ];
        let current = compute_current_magnitude(&components, &SourceParams::dc(12.0));
        assert_relative_eq!(current, 2.0, max_relative = 1e-5);
    }

    #[test]
    fn test_unparsable_values_use_defaults() {
        let components = [
            part(ComponentKind::Resistor, "big"),
            part(ComponentKind::Capacitor, ""),
            part(ComponentKind::Inductor, "coil"),
        ];
        let totals = ComponentTotals::aggregate(&components);
        assert_relative_eq!(totals.resistance, 100.0 + EPSILON);
        assert_relative_eq!(totals.capacitance, 1e-6);
        assert_relative_eq!(totals.inductance, 0.01);
    }

    #[test]
    fn test_no_resistor_saturates() {
        let current = compute_current_magnitude(&[], &SourceParams::dc(9.0));
        assert_eq!(current, MAX_DISPLAY_CURRENT);
    }

    #[test]
    fn test_zero_voltage_gives_zero_current() {
        let components = [part(ComponentKind::Resistor, "3Ω")];
        assert_eq!(compute_current_magnitude(&components, &SourceParams::dc(0.0)), 0.0);
    }

    fn magnitude(max: f64) -> impl Strategy<Value = f64> {
        1e-3..max
    }

    proptest! {
        #[test]
        fn prop_any_open_switch_gives_zero(
            r in magnitude(1e4),
            v in 0.0..500.0f64,
            ac in any::<bool>(),
            pos in 0usize..3,
        ) {
            let mut components = vec![
                part(ComponentKind::Resistor, "1Ω").with_numeric_value(r),
                part(ComponentKind::Inductor, "1mH"),
            ];
            components.insert(pos.min(components.len()), open_switch());
            let source = if ac { SourceParams::ac(v, 50.0) } else { SourceParams::dc(v) };
            prop_assert_eq!(compute_current_magnitude(&components, &source), 0.0);
        }

        #[test]
        fn prop_dc_with_capacitance_gives_zero(
            r in magnitude(1e4),
            c in 2e-6..1.0f64,
            v in 0.0..500.0f64,
        ) {
            let components = [
                part(ComponentKind::Resistor, "").with_numeric_value(r),
                part(ComponentKind::Capacitor, "").with_numeric_value(c),
            ];
            prop_assert_eq!(compute_current_magnitude(&components, &SourceParams::dc(v)), 0.0);
        }

        #[test]
        fn prop_dc_follows_ohms_law(r in magnitude(1e4), v in 0.0..500.0f64) {
            let components = [part(ComponentKind::Resistor, "").with_numeric_value(r)];
            let expected = (v / (r + EPSILON)).clamp(0.0, MAX_DISPLAY_CURRENT);
            let current = compute_current_magnitude(&components, &SourceParams::dc(v));
            prop_assert!((current - expected).abs() <= 1e-9 * expected.max(1.0));
        }

        #[test]
        fn prop_ac_matches_impedance_formula(
            r in magnitude(1e3),
            l in 0.0..1.0f64,
            c in prop::option::of(1e-5..1e-2f64),
            f in 1.0..1000.0f64,
            v in 0.0..500.0f64,
        ) {
            let mut components = vec![
                part(ComponentKind::Resistor, "").with_numeric_value(r),
                part(ComponentKind::Inductor, "").with_numeric_value(l),
            ];
            if let Some(c) = c {
                components.push(part(ComponentKind::Capacitor, "").with_numeric_value(c));
            }

            let omega = 2.0 * PI * f;
            let xc = c.map(|c| 1.0 / (omega * c)).unwrap_or(0.0);
            let z = ((r + EPSILON).powi(2) + (omega * l - xc).powi(2)).sqrt();
            let expected = (v / z).clamp(0.0, MAX_DISPLAY_CURRENT);

            let current = compute_current_magnitude(&components, &SourceParams::ac(v, f));
            prop_assert!((current - expected).abs() <= 1e-9 * expected.max(1.0));
        }
    }
}
