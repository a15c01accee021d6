//! Component palette and circuit templates.
//!
//! The palette lists one template per [`ComponentKind`] with the value a
//! freshly dropped component starts with. Circuit templates bundle
//! components, wires and a source preset; three are built in (see
//! [`prebuilt_circuits`]) and more can be read from JSON.
//!
//! # JSON format
//!
//! ```json
//! {
//!   "id": "my-circuit",
//!   "name": "My circuit",
//!   "description": "9 V across 3 Ω",
//!   "source": { "kind": "DC", "voltage": 9 },
//!   "components": [
//!     { "id": "src", "type": "voltage-source", "position": { "x": 200, "y": 200 }, "value": "9V" },
//!     { "id": "r1", "type": "resistor", "position": { "x": 400, "y": 200 }, "value": "3Ω" }
//!   ],
//!   "wires": [
//!     { "id": "w1", "startComponent": "src", "endComponent": "r1",
//!       "path": [{ "x": 260, "y": 215 }, { "x": 400, "y": 215 }] }
//!   ]
//! }
//! ```
//!
//! `source` is optional; without it the first source component decides.

mod prebuilt;

pub use prebuilt::{ac_circuit, dc_circuit, find_prebuilt, ohms_law_circuit, prebuilt_circuits};

use serde::{Deserialize, Serialize};

use crate::analysis::SourceParams;
use crate::circuit::{Circuit, Component, ComponentKind, Wire};
use crate::error::{AmpflowError, Result};
use crate::geometry::Point;

/// A palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentTemplate {
    pub kind: ComponentKind,
    pub name: &'static str,
    /// Value a dropped component starts with
    pub value: &'static str,
    pub symbol: &'static str,
    pub description: &'static str,
}

/// The palette, in display order.
pub static COMPONENT_TEMPLATES: [ComponentTemplate; 6] = [
    ComponentTemplate {
        kind: ComponentKind::Resistor,
        name: "Resistor",
        value: "10Ω",
        symbol: "R",
        description: "Resistor - 10 Ohms",
    },
    ComponentTemplate {
        kind: ComponentKind::Capacitor,
        name: "Capacitor",
        value: "1µF",
        symbol: "C",
        description: "Capacitor - 1 microFarad",
    },
    ComponentTemplate {
        kind: ComponentKind::Inductor,
        name: "Inductor",
        value: "1mH",
        symbol: "L",
        description: "Inductor - 1 milliHenry",
    },
    ComponentTemplate {
        kind: ComponentKind::Switch,
        name: "Switch",
        value: "ON",
        symbol: "S",
        description: "Switch - Open/Close",
    },
    ComponentTemplate {
        kind: ComponentKind::DcSource,
        name: "DC Source",
        value: "9V",
        symbol: "V",
        description: "DC Voltage Source - 9 Volts",
    },
    ComponentTemplate {
        kind: ComponentKind::AcSource,
        name: "AC Source",
        value: "120V",
        symbol: "~",
        description: "AC Voltage Source - 120V RMS",
    },
];

/// Palette entry for `kind`.
pub fn template(kind: ComponentKind) -> &'static ComponentTemplate {
    COMPONENT_TEMPLATES
        .iter()
        .find(|t| t.kind == kind)
        .unwrap_or(&COMPONENT_TEMPLATES[0])
}

/// Palette entry by display name or kind slug (case-insensitive).
pub fn template_by_name(name: &str) -> Result<&'static ComponentTemplate> {
    if let Some(kind) = ComponentKind::from_slug(name) {
        return Ok(template(kind));
    }
    COMPONENT_TEMPLATES
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| AmpflowError::UnknownTemplate {
            name: name.to_string(),
        })
}

/// A loadable circuit: parts, wiring and source preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceParams>,
    pub components: Vec<Component>,
    #[serde(default)]
    pub wires: Vec<Wire>,
    /// Where the description block is drawn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_position: Option<Point>,
}

impl CircuitTemplate {
    /// Decode a template from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let template: CircuitTemplate = serde_json::from_str(json)?;
        // Surface duplicate ids and bad source values at load time
        template.circuit()?;
        template.source_params().validate()?;
        Ok(template)
    }

    /// Encode as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The explicit source preset, or one derived from the components.
    pub fn source_params(&self) -> SourceParams {
        self.source
            .unwrap_or_else(|| SourceParams::from_components(&self.components))
    }

    /// A fresh, validated circuit holding copies of the parts.
    pub fn circuit(&self) -> Result<Circuit> {
        Circuit::from_parts(self.components.clone(), self.wires.clone())
    }
}

/// Read a circuit template from a JSON file.
#[cfg(feature = "cli")]
pub fn load_file(path: &std::path::Path) -> Result<CircuitTemplate> {
    let content = std::fs::read_to_string(path).map_err(|e| AmpflowError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    CircuitTemplate::from_json(&content)
}
