//! Placed components, wires and the editing operations on them.

use serde::{Deserialize, Serialize};

use super::types::{Bounds, ComponentId, ComponentKind, WireAttachment, WireId};
use super::value::{parse_value, ParsedValue, Unit};
use crate::catalog::ComponentTemplate;
use crate::error::{AmpflowError, Result};
use crate::geometry::{find_nearest_point, Point, SnapResult};

/// Default component footprint on the canvas.
pub const DEFAULT_COMPONENT_WIDTH: f64 = 60.0;
pub const DEFAULT_COMPONENT_HEIGHT: f64 = 30.0;

fn default_width() -> f64 {
    DEFAULT_COMPONENT_WIDTH
}

fn default_height() -> f64 {
    DEFAULT_COMPONENT_HEIGHT
}

fn default_true() -> bool {
    true
}

/// A circuit element placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: ComponentId,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    /// Top-left corner
    pub position: Point,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    /// Rotation in degrees
    #[serde(default)]
    pub rotation: f64,
    /// Human-readable value, e.g. "10Ω" or "1µF"
    #[serde(default)]
    pub value: String,
    /// Pre-parsed magnitude in SI base units; takes precedence over `value`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<f64>,
    /// Closed (conducting) state; only meaningful for switches
    #[serde(default = "default_true")]
    pub switch_on: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<WireAttachment>,
    #[serde(default)]
    pub selected: bool,
}

impl Component {
    /// Create a new component with the default footprint.
    pub fn new(
        id: ComponentId,
        kind: ComponentKind,
        position: Point,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind,
            position,
            width: DEFAULT_COMPONENT_WIDTH,
            height: DEFAULT_COMPONENT_HEIGHT,
            rotation: 0.0,
            value: value.into(),
            numeric_value: None,
            switch_on: true,
            attachment: None,
            selected: false,
        }
    }

    /// Set a pre-parsed magnitude.
    pub fn with_numeric_value(mut self, magnitude: f64) -> Self {
        self.numeric_value = Some(magnitude);
        self
    }

    /// Set the switch state.
    pub fn with_switch_on(mut self, on: bool) -> Self {
        self.switch_on = on;
        self
    }

    /// Centre of the component's footprint.
    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + self.width / 2.0,
            self.position.y + self.height / 2.0,
        )
    }

    /// Check if `p` lies inside the footprint (edges included).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.position.x
            && p.x <= self.position.x + self.width
            && p.y >= self.position.y
            && p.y <= self.position.y + self.height
    }

    /// Check if this is a switch in the open (non-conducting) state.
    pub fn is_open_switch(&self) -> bool {
        self.kind == ComponentKind::Switch && !self.switch_on
    }

    /// Magnitude in SI base units: the pre-parsed value if usable,
    /// otherwise the parsed value string.
    pub fn magnitude(&self) -> Option<f64> {
        self.numeric_value
            .filter(|v| v.is_finite())
            .or_else(|| self.parsed_value().map(|v| v.magnitude))
    }

    /// Parse the value string.
    pub fn parsed_value(&self) -> Option<ParsedValue> {
        parse_value(&self.value)
    }

    /// Unit written in the value string, unless a pre-parsed magnitude
    /// overrides it.
    pub fn value_unit(&self) -> Option<Unit> {
        if self.numeric_value.is_some_and(f64::is_finite) {
            return None;
        }
        self.parsed_value().and_then(|v| v.unit)
    }

    fn clamp_into(&mut self, bounds: Option<Bounds>) {
        if let Some(b) = bounds {
            self.position.x = self.position.x.min(b.width - self.width).max(0.0);
            self.position.y = self.position.y.min(b.height - self.height).max(0.0);
        }
    }

    fn centre_on(&mut self, p: Point) {
        self.position = Point::new(p.x - self.width / 2.0, p.y - self.height / 2.0);
    }
}

/// An ordered polyline between two component ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wire {
    pub id: WireId,
    pub start_component: ComponentId,
    pub end_component: ComponentId,
    #[serde(default)]
    pub start_port: String,
    #[serde(default)]
    pub end_port: String,
    /// Points in traversal order
    pub path: Vec<Point>,
}

impl Wire {
    /// Create a wire from `start` to `end` along `path` (right/left ports).
    pub fn new(id: WireId, start: ComponentId, end: ComponentId, path: Vec<Point>) -> Self {
        Self {
            id,
            start_component: start,
            end_component: end,
            start_port: "right".to_string(),
            end_port: "left".to_string(),
            path,
        }
    }

    /// A wire needs at least two points to be drawn or carry flow.
    pub fn is_drawable(&self) -> bool {
        self.path.len() >= 2
    }
}

/// Everything placed on the canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    pub components: Vec<Component>,
    pub wires: Vec<Wire>,
    /// Counter for generated component ids
    #[serde(skip)]
    next_serial: u64,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a circuit from existing parts, rejecting duplicate ids.
    pub fn from_parts(components: Vec<Component>, wires: Vec<Wire>) -> Result<Self> {
        let circuit = Self {
            components,
            wires,
            next_serial: 0,
        };
        super::validate_circuit(&circuit)?;
        Ok(circuit)
    }

    /// Find a component by id.
    pub fn component(&self, id: &ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| &c.id == id)
    }

    fn component_mut(&mut self, id: &ComponentId) -> Result<&mut Component> {
        self.components
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| AmpflowError::component_not_found(id.as_str()))
    }

    /// Find a wire by id.
    pub fn wire(&self, id: &WireId) -> Option<&Wire> {
        self.wires.iter().find(|w| &w.id == id)
    }

    /// Add a component. Its id must be unused.
    pub fn add_component(&mut self, component: Component) -> Result<()> {
        if self.component(&component.id).is_some() {
            return Err(AmpflowError::DuplicateComponent {
                id: component.id.0,
            });
        }
        self.components.push(component);
        Ok(())
    }

    /// Add a wire. Its id must be unused.
    pub fn add_wire(&mut self, wire: Wire) -> Result<()> {
        if self.wire(&wire.id).is_some() {
            return Err(AmpflowError::DuplicateWire { id: wire.id.0 });
        }
        self.wires.push(wire);
        Ok(())
    }

    /// Replace the whole wire set.
    ///
    /// Attachments to wires that no longer exist are cleared.
    pub fn set_wires(&mut self, wires: Vec<Wire>) {
        self.wires = wires;
        let wires = &self.wires;
        for component in &mut self.components {
            let stale = component
                .attachment
                .as_ref()
                .is_some_and(|a| !wires.iter().any(|w| w.id == a.wire_id));
            if stale {
                component.attachment = None;
            }
        }
    }

    /// Generate an id of the form `<kind>-<n>` that is not in use.
    fn next_id(&mut self, kind: ComponentKind) -> ComponentId {
        loop {
            self.next_serial += 1;
            let id = ComponentId::new(format!("{}-{}", kind.slug(), self.next_serial));
            if self.component(&id).is_none() {
                return id;
            }
        }
    }

    /// Place a new component from a palette template, centred on `at`.
    ///
    /// If a wire lies within `threshold` of `at`, the component is centred
    /// on the nearest wire point and attached to that wire.
    pub fn drop_component(
        &mut self,
        template: &ComponentTemplate,
        at: Point,
        bounds: Option<Bounds>,
        threshold: f64,
    ) -> (ComponentId, Option<SnapResult>) {
        let id = self.next_id(template.kind);
        let mut component = Component::new(id.clone(), template.kind, Point::default(), template.value);

        let snap = find_nearest_point(at, &self.wires, threshold);
        match &snap {
            Some(s) => {
                component.centre_on(s.point());
                component.attachment = Some(WireAttachment {
                    wire_id: s.wire_id.clone(),
                    t: s.t,
                });
                tracing::debug!(component = %id, wire = %s.wire_id, t = s.t, "component snapped to wire");
            }
            None => component.centre_on(at),
        }
        component.clamp_into(bounds);

        self.components.push(component);
        (id, snap)
    }

    /// Move a component so its top-left corner is at `top_left`, re-snapping
    /// its centre to the nearest wire.
    pub fn drag_component(
        &mut self,
        id: &ComponentId,
        top_left: Point,
        bounds: Option<Bounds>,
        threshold: f64,
    ) -> Result<Option<SnapResult>> {
        let idx = self
            .components
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| AmpflowError::component_not_found(id.as_str()))?;

        let (width, height) = (self.components[idx].width, self.components[idx].height);
        let centre = Point::new(top_left.x + width / 2.0, top_left.y + height / 2.0);
        let snap = find_nearest_point(centre, &self.wires, threshold);

        let component = &mut self.components[idx];
        match &snap {
            Some(s) => {
                component.centre_on(s.point());
                component.attachment = Some(WireAttachment {
                    wire_id: s.wire_id.clone(),
                    t: s.t,
                });
            }
            None => {
                component.position = top_left;
                component.attachment = None;
            }
        }
        component.clamp_into(bounds);

        Ok(snap)
    }

    /// Flip a switch. Returns the new state (`true` = closed).
    pub fn toggle_switch(&mut self, id: &ComponentId) -> Result<bool> {
        let component = self.component_mut(id)?;
        if component.kind != ComponentKind::Switch {
            return Err(AmpflowError::WrongComponentKind {
                id: id.0.clone(),
                kind: component.kind.to_string(),
                expected: ComponentKind::Switch.to_string(),
            });
        }
        component.switch_on = !component.switch_on;
        Ok(component.switch_on)
    }

    /// Flip the selection flag. Returns the new state.
    pub fn toggle_selection(&mut self, id: &ComponentId) -> Result<bool> {
        let component = self.component_mut(id)?;
        component.selected = !component.selected;
        Ok(component.selected)
    }

    /// Check if any component is selected.
    pub fn has_selection(&self) -> bool {
        self.components.iter().any(|c| c.selected)
    }

    /// Remove every selected component. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        let before = self.components.len();
        self.components.retain(|c| !c.selected);
        before - self.components.len()
    }

    /// Remove one component.
    pub fn remove_component(&mut self, id: &ComponentId) -> Result<Component> {
        let idx = self
            .components
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| AmpflowError::component_not_found(id.as_str()))?;
        Ok(self.components.remove(idx))
    }

    /// Remove all components and wires.
    pub fn clear(&mut self) {
        self.components.clear();
        self.wires.clear();
    }

    /// Topmost component under `p`. Later components are drawn on top.
    pub fn component_at(&self, p: Point) -> Option<&Component> {
        self.components.iter().rev().find(|c| c.contains(p))
    }
}
