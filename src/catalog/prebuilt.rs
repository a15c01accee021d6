//! Built-in demo circuits.

use super::{template, CircuitTemplate};
use crate::analysis::SourceParams;
use crate::circuit::{Component, ComponentId, ComponentKind, Wire, WireId};
use crate::error::{AmpflowError, Result};
use crate::geometry::Point;

fn part(id: &str, kind: ComponentKind, x: f64, y: f64) -> Component {
    Component::new(
        ComponentId::new(id),
        kind,
        Point::new(x, y),
        template(kind).value,
    )
}

fn wire(id: &str, from: &str, to: &str, path: &[(f64, f64)]) -> Wire {
    Wire::new(
        WireId::new(id),
        ComponentId::new(from),
        ComponentId::new(to),
        path.iter().map(|&(x, y)| Point::new(x, y)).collect(),
    )
}

/// 9 V DC source, 10 Ω resistor and a switch.
pub fn dc_circuit() -> CircuitTemplate {
    CircuitTemplate {
        id: "dc-circuit".to_string(),
        name: "DC Circuit".to_string(),
        description: "Basic DC circuit with voltage source, resistor, and switch".to_string(),
        source: None,
        components: vec![
            part("dc-source", ComponentKind::DcSource, 100.0, 200.0),
            part("dc-resistor", ComponentKind::Resistor, 250.0, 200.0),
            part("dc-switch", ComponentKind::Switch, 400.0, 200.0),
        ],
        wires: vec![
            wire("dc-wire-1", "dc-source", "dc-resistor", &[(160.0, 215.0), (250.0, 215.0)]),
            wire("dc-wire-2", "dc-resistor", "dc-switch", &[(310.0, 215.0), (400.0, 215.0)]),
            wire(
                "dc-wire-3",
                "dc-switch",
                "dc-source",
                &[
                    (460.0, 215.0),
                    (500.0, 215.0),
                    (500.0, 300.0),
                    (100.0, 300.0),
                    (100.0, 230.0),
                ],
            ),
        ],
        description_position: None,
    }
}

/// 120 V / 50 Hz AC source driving a series RLC chain.
pub fn ac_circuit() -> CircuitTemplate {
    CircuitTemplate {
        id: "ac-circuit".to_string(),
        name: "AC Circuit".to_string(),
        description: "AC circuit with RLC components in series".to_string(),
        source: Some(SourceParams::ac(120.0, 50.0)),
        components: vec![
            part("ac-source", ComponentKind::AcSource, 100.0, 200.0),
            part("ac-resistor", ComponentKind::Resistor, 250.0, 200.0),
            part("ac-capacitor", ComponentKind::Capacitor, 400.0, 200.0),
            part("ac-inductor", ComponentKind::Inductor, 550.0, 200.0),
        ],
        wires: vec![
            wire("ac-wire-1", "ac-source", "ac-resistor", &[(160.0, 215.0), (250.0, 215.0)]),
            wire("ac-wire-2", "ac-resistor", "ac-capacitor", &[(310.0, 215.0), (400.0, 215.0)]),
            wire("ac-wire-3", "ac-capacitor", "ac-inductor", &[(460.0, 215.0), (550.0, 215.0)]),
            wire(
                "ac-wire-4",
                "ac-inductor",
                "ac-source",
                &[
                    (610.0, 215.0),
                    (650.0, 215.0),
                    (650.0, 300.0),
                    (100.0, 300.0),
                    (100.0, 230.0),
                ],
            ),
        ],
        description_position: None,
    }
}

/// 9 V across 3 Ω, for V = I × R.
pub fn ohms_law_circuit() -> CircuitTemplate {
    let mut resistor = part("ohm-resistor", ComponentKind::Resistor, 400.0, 200.0);
    resistor.value = "3Ω".to_string();

    CircuitTemplate {
        id: "ohms-law".to_string(),
        name: "Ohm's Law Demo".to_string(),
        description: "Simple circuit demonstrating V = I × R".to_string(),
        source: None,
        components: vec![
            part("ohm-source", ComponentKind::DcSource, 200.0, 200.0),
            resistor,
        ],
        wires: vec![
            wire("ohm-wire-1", "ohm-source", "ohm-resistor", &[(260.0, 215.0), (400.0, 215.0)]),
            wire(
                "ohm-wire-2",
                "ohm-resistor",
                "ohm-source",
                &[
                    (460.0, 215.0),
                    (500.0, 215.0),
                    (500.0, 300.0),
                    (200.0, 300.0),
                    (200.0, 230.0),
                ],
            ),
        ],
        description_position: None,
    }
}

/// All built-in circuits, in menu order.
pub fn prebuilt_circuits() -> Vec<CircuitTemplate> {
    vec![dc_circuit(), ac_circuit(), ohms_law_circuit()]
}

/// Look up a built-in circuit by id.
pub fn find_prebuilt(id: &str) -> Result<CircuitTemplate> {
    let circuits = prebuilt_circuits();
    let available = circuits
        .iter()
        .map(|c| c.id.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    circuits
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .ok_or_else(|| AmpflowError::UnknownCircuit {
            id: id.to_string(),
            available,
        })
}
