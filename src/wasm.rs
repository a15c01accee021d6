//! WASM bindings for Ampflow Core.
//!
//! The browser owns the frame loop: it passes `requestAnimationFrame`
//! timestamps to [`WasmFlowEngine::tick`] and draws the indicator at the
//! returned position. Data-model values cross the boundary as JSON strings.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmFlowEngine } from 'ampflow_core';
//!
//! await init();
//!
//! const engine = WasmFlowEngine.prebuilt('ohms-law');
//! engine.set_speed_scale(1.5);
//!
//! let handle = requestAnimationFrame(function frame(ts) {
//!   engine.tick(ts);
//!   if (engine.position_x !== undefined) {
//!     drawIndicator(engine.position_x, engine.position_y);
//!   }
//!   if (engine.is_running()) handle = requestAnimationFrame(frame);
//! });
//! ```

use std::time::Duration;

use wasm_bindgen::prelude::*;

use crate::analysis::{SourceKind, SourceParams};
use crate::catalog::{self, CircuitTemplate};
use crate::circuit::{ComponentId, ComponentKind};
use crate::engine::{EngineConfig, FlowEngine};
use crate::error::AmpflowError;
use crate::geometry::Point;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn js_err(e: AmpflowError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_err(e.into()))
}

fn timestamp(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}

/// WASM-compatible flow engine.
///
/// Wraps the native [`FlowEngine`] with a JavaScript-friendly API. Ticks are
/// ignored after [`stop`](WasmFlowEngine::stop) until
/// [`resume`](WasmFlowEngine::resume) is called.
#[wasm_bindgen]
pub struct WasmFlowEngine {
    engine: FlowEngine,
    running: bool,
    started: bool,
}

impl WasmFlowEngine {
    fn from_template(template: &CircuitTemplate, config: EngineConfig) -> Result<WasmFlowEngine, JsValue> {
        let engine = FlowEngine::from_template(template, config).map_err(js_err)?;
        Ok(WasmFlowEngine {
            engine,
            running: true,
            started: false,
        })
    }
}

#[wasm_bindgen]
impl WasmFlowEngine {
    /// Create an engine from a circuit template in JSON.
    ///
    /// # Example
    /// ```javascript
    /// const engine = new WasmFlowEngine(JSON.stringify(circuit));
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(circuit_json: &str) -> Result<WasmFlowEngine, JsValue> {
        let template = CircuitTemplate::from_json(circuit_json).map_err(js_err)?;
        Self::from_template(&template, EngineConfig::default())
    }

    /// Create an engine from a built-in circuit (`dc-circuit`, `ac-circuit`,
    /// `ohms-law`).
    #[wasm_bindgen]
    pub fn prebuilt(id: &str) -> Result<WasmFlowEngine, JsValue> {
        let template = catalog::find_prebuilt(id).map_err(js_err)?;
        Self::from_template(&template, EngineConfig::default())
    }

    /// Create an empty engine with a custom snap threshold and canvas size.
    #[wasm_bindgen]
    pub fn with_config(snap_threshold: f64, width: f64, height: f64) -> WasmFlowEngine {
        let config = EngineConfig::new()
            .with_snap_threshold(snap_threshold)
            .with_bounds(crate::circuit::Bounds::new(width, height));
        WasmFlowEngine {
            engine: FlowEngine::new(config),
            running: true,
            started: false,
        }
    }

    /// Replace the circuit with a built-in one or a JSON template.
    ///
    /// Strings starting with `{` are parsed as JSON, anything else is taken
    /// as a built-in id.
    #[wasm_bindgen]
    pub fn load_circuit(&mut self, circuit: &str) -> Result<(), JsValue> {
        let template = if circuit.trim_start().starts_with('{') {
            CircuitTemplate::from_json(circuit)
        } else {
            catalog::find_prebuilt(circuit)
        }
        .map_err(js_err)?;
        self.engine.load_template(&template).map_err(js_err)
    }

    /// Advance to a `requestAnimationFrame` timestamp (milliseconds).
    ///
    /// Returns whether the indicator is moving.
    #[wasm_bindgen]
    pub fn tick(&mut self, timestamp_ms: f64) -> bool {
        if !self.running {
            return false;
        }
        let now = timestamp(timestamp_ms);
        if !self.started {
            self.engine.start(now);
            self.started = true;
        }
        self.engine.tick(now).flowing
    }

    /// Stop reacting to ticks.
    #[wasm_bindgen]
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Resume after [`stop`](Self::stop); the next tick restarts the clock.
    #[wasm_bindgen]
    pub fn resume(&mut self) {
        self.running = true;
        self.started = false;
    }

    #[wasm_bindgen]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current magnitude in amperes.
    #[wasm_bindgen(getter)]
    pub fn current(&self) -> f64 {
        self.engine.current()
    }

    #[wasm_bindgen(getter)]
    pub fn is_flowing(&self) -> bool {
        self.engine.animator().is_flowing()
    }

    /// Indicator x, or `undefined` when nothing is visible.
    #[wasm_bindgen(getter)]
    pub fn position_x(&self) -> Option<f64> {
        self.engine.position().map(|p| p.x)
    }

    /// Indicator y, or `undefined` when nothing is visible.
    #[wasm_bindgen(getter)]
    pub fn position_y(&self) -> Option<f64> {
        self.engine.position().map(|p| p.y)
    }

    /// Indicator speed in pixels per second.
    #[wasm_bindgen(getter)]
    pub fn speed(&self) -> f64 {
        self.engine.animation_speed()
    }

    /// Set the speed multiplier. Returns the clamped value applied.
    #[wasm_bindgen]
    pub fn set_speed_scale(&mut self, scale: f64) -> f64 {
        self.engine.set_speed_scale(scale)
    }

    /// Set the source: `kind` is "DC" or "AC"; `frequency` is ignored for DC.
    #[wasm_bindgen]
    pub fn set_source(&mut self, kind: &str, voltage: f64, frequency: f64) -> Result<(), JsValue> {
        let kind: SourceKind = kind.parse().map_err(js_err)?;
        let scale = self.engine.source().speed_scale;
        let source = match kind {
            SourceKind::Dc => SourceParams::dc(voltage),
            SourceKind::Ac => SourceParams::ac(voltage, frequency),
        };
        self.engine
            .set_source(source.with_speed_scale(scale))
            .map_err(js_err)
    }

    /// Nearest wire point within the snap threshold, as JSON, or `undefined`.
    #[wasm_bindgen]
    pub fn snap(&self, x: f64, y: f64) -> Result<Option<String>, JsValue> {
        self.engine
            .snap(Point::new(x, y))
            .map(|s| to_json(&s))
            .transpose()
    }

    /// Drop a palette component (kind slug, e.g. "resistor") at a canvas
    /// point. Returns the new component id.
    #[wasm_bindgen]
    pub fn drop_component(&mut self, kind: &str, x: f64, y: f64) -> Result<String, JsValue> {
        let template = catalog::template_by_name(kind).map_err(js_err)?;
        let (id, _) = self.engine.drop_component(template.kind, Point::new(x, y));
        Ok(id.0)
    }

    /// Move a component's top-left corner. Returns whether it snapped.
    #[wasm_bindgen]
    pub fn drag_component(&mut self, id: &str, x: f64, y: f64) -> Result<bool, JsValue> {
        self.engine
            .drag_component(&ComponentId::new(id), Point::new(x, y))
            .map(|snap| snap.is_some())
            .map_err(js_err)
    }

    /// Flip a switch. Returns the new state (`true` = closed).
    #[wasm_bindgen]
    pub fn toggle_switch(&mut self, id: &str) -> Result<bool, JsValue> {
        self.engine.toggle_switch(&ComponentId::new(id)).map_err(js_err)
    }

    #[wasm_bindgen]
    pub fn toggle_selection(&mut self, id: &str) -> Result<bool, JsValue> {
        self.engine
            .toggle_selection(&ComponentId::new(id))
            .map_err(js_err)
    }

    /// Remove every selected component. Returns how many were removed.
    #[wasm_bindgen]
    pub fn delete_selected(&mut self) -> usize {
        self.engine.delete_selected()
    }

    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.engine.clear();
    }

    /// Id of the topmost component under a canvas point.
    #[wasm_bindgen]
    pub fn component_at(&self, x: f64, y: f64) -> Option<String> {
        self.engine
            .circuit()
            .component_at(Point::new(x, y))
            .map(|c| c.id.0.clone())
    }

    /// The whole circuit (components and wires) as JSON.
    #[wasm_bindgen]
    pub fn circuit_json(&self) -> Result<String, JsValue> {
        to_json(self.engine.circuit())
    }

    /// The latest analysis result as JSON.
    #[wasm_bindgen]
    pub fn analysis_json(&self) -> Result<String, JsValue> {
        to_json(self.engine.analysis())
    }
}

/// The component palette as JSON.
#[wasm_bindgen]
pub fn component_templates() -> Result<String, JsValue> {
    to_json(&catalog::COMPONENT_TEMPLATES)
}

/// The built-in circuits as JSON.
#[wasm_bindgen]
pub fn prebuilt_circuits() -> Result<String, JsValue> {
    to_json(&catalog::prebuilt_circuits())
}

/// Slugs of all component kinds.
#[wasm_bindgen]
pub fn component_kinds() -> Vec<String> {
    ComponentKind::ALL.iter().map(|k| k.slug().to_string()).collect()
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_conversion() {
        assert_eq!(timestamp(1500.0), Duration::from_millis(1500));
        assert_eq!(timestamp(-3.0), Duration::ZERO);
        assert_eq!(timestamp(f64::NAN), Duration::ZERO);
        assert_eq!(timestamp(f64::MAX), Duration::MAX);
    }
}
