//! Core types for circuit representation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, unique identifier of a placed component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque, unique identifier of a wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireId(pub String);

impl WireId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The component palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    Resistor,
    Capacitor,
    Inductor,
    Switch,
    #[serde(rename = "voltage-source", alias = "dc-source")]
    DcSource,
    AcSource,
}

impl ComponentKind {
    /// All palette entries, in palette order.
    pub const ALL: [ComponentKind; 6] = [
        ComponentKind::Resistor,
        ComponentKind::Capacitor,
        ComponentKind::Inductor,
        ComponentKind::Switch,
        ComponentKind::DcSource,
        ComponentKind::AcSource,
    ];

    /// Identifier used in circuit files and generated component ids.
    pub fn slug(&self) -> &'static str {
        match self {
            ComponentKind::Resistor => "resistor",
            ComponentKind::Capacitor => "capacitor",
            ComponentKind::Inductor => "inductor",
            ComponentKind::Switch => "switch",
            ComponentKind::DcSource => "voltage-source",
            ComponentKind::AcSource => "ac-source",
        }
    }

    /// Parse a slug (case-insensitive). Accepts `dc-source` as well.
    pub fn from_slug(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "resistor" => Some(ComponentKind::Resistor),
            "capacitor" => Some(ComponentKind::Capacitor),
            "inductor" => Some(ComponentKind::Inductor),
            "switch" => Some(ComponentKind::Switch),
            "voltage-source" | "dc-source" => Some(ComponentKind::DcSource),
            "ac-source" => Some(ComponentKind::AcSource),
            _ => None,
        }
    }

    /// Check if this is a power source.
    pub fn is_source(&self) -> bool {
        matches!(self, ComponentKind::DcSource | ComponentKind::AcSource)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Where a component sits on a wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAttachment {
    pub wire_id: WireId,
    /// Normalized position along the matched wire segment (0..=1)
    pub t: f64,
}

/// Canvas extent used to keep placed components fully visible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}
