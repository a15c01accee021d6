//! Engine facade tying the circuit, analysis and animation together.
//!
//! [`FlowEngine`] is the single owner of all mutable state. Every edit goes
//! through it, so the analysis result is never stale: component and source
//! changes re-run the analysis, wire changes also rebuild the flow path.

use std::time::Duration;

use crate::analysis::{analyze, clamp_speed_scale, AnalysisResult, SourceParams, SpeedProfile};
use crate::animation::{FlowAnimator, FlowState, FrameOutput, FALLBACK_PATH};
use crate::catalog::{template, CircuitTemplate};
use crate::circuit::{Bounds, Circuit, ComponentId, ComponentKind, Wire};
use crate::error::Result;
use crate::geometry::{find_nearest_point, Point, SnapResult, DEFAULT_SNAP_THRESHOLD};

/// Configuration for the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Maximum distance for snapping a component onto a wire.
    pub snap_threshold: f64,
    /// Canvas size placed components are clamped into, if any.
    pub bounds: Option<Bounds>,
    /// Path the indicator follows when there are no wires.
    pub fallback_path: Vec<Point>,
    /// Current to speed mapping.
    pub speed: SpeedProfile,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            bounds: None,
            fallback_path: FALLBACK_PATH.to_vec(),
            speed: SpeedProfile::default(),
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the snap distance in canvas pixels.
    pub fn with_snap_threshold(mut self, threshold: f64) -> Self {
        self.snap_threshold = threshold;
        self
    }

    /// Clamp placed components into a `width` x `height` canvas.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Set the path used when the circuit has no wires.
    pub fn with_fallback_path(mut self, path: Vec<Point>) -> Self {
        self.fallback_path = path;
        self
    }

    /// Set the speed constants.
    pub fn with_speed_profile(mut self, speed: SpeedProfile) -> Self {
        self.speed = speed;
        self
    }
}

/// The circuit editor and flow animation state.
#[derive(Debug, Clone)]
pub struct FlowEngine {
    circuit: Circuit,
    source: SourceParams,
    analysis: AnalysisResult,
    config: EngineConfig,
    animator: FlowAnimator,
}

impl FlowEngine {
    /// Create an engine with an empty circuit and the default 9 V DC source.
    pub fn new(config: EngineConfig) -> Self {
        let circuit = Circuit::new();
        let source = SourceParams::default();
        let analysis = analyze(&circuit.components, &source);
        let animator = FlowAnimator::new(&circuit.wires, config.fallback_path.clone());
        Self {
            circuit,
            source,
            analysis,
            config,
            animator,
        }
    }

    /// Create an engine for an existing circuit.
    pub fn with_circuit(circuit: Circuit, source: SourceParams, config: EngineConfig) -> Result<Self> {
        source.validate()?;
        let source = source.with_speed_scale(source.speed_scale);
        let analysis = analyze(&circuit.components, &source);
        let animator = FlowAnimator::new(&circuit.wires, config.fallback_path.clone());
        tracing::debug!(
            components = circuit.components.len(),
            wires = circuit.wires.len(),
            current = analysis.current,
            "engine created"
        );
        Ok(Self {
            circuit,
            source,
            analysis,
            config,
            animator,
        })
    }

    /// Create an engine from a circuit template.
    pub fn from_template(template: &CircuitTemplate, config: EngineConfig) -> Result<Self> {
        Self::with_circuit(template.circuit()?, template.source_params(), config)
    }

    /// Replace the circuit and source with a template's.
    ///
    /// The current speed multiplier is kept.
    pub fn load_template(&mut self, template: &CircuitTemplate) -> Result<()> {
        let circuit = template.circuit()?;
        let source = template.source_params();
        source.validate()?;

        self.circuit = circuit;
        self.source = source.with_speed_scale(self.source.speed_scale);
        self.animator.rebuild(&self.circuit.wires);
        self.refresh();
        tracing::info!(template = %template.id, "template loaded");
        Ok(())
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn source(&self) -> &SourceParams {
        &self.source
    }

    /// Latest analysis result.
    pub fn analysis(&self) -> &AnalysisResult {
        &self.analysis
    }

    /// Latest current magnitude in amperes.
    pub fn current(&self) -> f64 {
        self.analysis.current
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn animator(&self) -> &FlowAnimator {
        &self.animator
    }

    /// Replace the source parameters wholesale.
    pub fn set_source(&mut self, source: SourceParams) -> Result<()> {
        source.validate()?;
        self.source = source.with_speed_scale(source.speed_scale);
        self.refresh();
        Ok(())
    }

    /// Set the speed multiplier. Returns the value actually applied.
    pub fn set_speed_scale(&mut self, scale: f64) -> f64 {
        self.source.speed_scale = clamp_speed_scale(scale);
        self.source.speed_scale
    }

    /// Nearest wire point within the configured snap threshold.
    pub fn snap(&self, point: Point) -> Option<SnapResult> {
        find_nearest_point(point, &self.circuit.wires, self.config.snap_threshold)
    }

    /// Drop a fresh component from the palette, centred on `at`.
    pub fn drop_component(&mut self, kind: ComponentKind, at: Point) -> (ComponentId, Option<SnapResult>) {
        let dropped = self.circuit.drop_component(
            template(kind),
            at,
            self.config.bounds,
            self.config.snap_threshold,
        );
        self.refresh();
        dropped
    }

    /// Move a component's top-left corner to `top_left`, re-snapping it.
    pub fn drag_component(&mut self, id: &ComponentId, top_left: Point) -> Result<Option<SnapResult>> {
        let snap = self.circuit.drag_component(
            id,
            top_left,
            self.config.bounds,
            self.config.snap_threshold,
        )?;
        self.refresh();
        Ok(snap)
    }

    /// Flip a switch. Returns the new state (`true` = closed).
    pub fn toggle_switch(&mut self, id: &ComponentId) -> Result<bool> {
        let on = self.circuit.toggle_switch(id)?;
        self.refresh();
        Ok(on)
    }

    pub fn toggle_selection(&mut self, id: &ComponentId) -> Result<bool> {
        self.circuit.toggle_selection(id)
    }

    /// Remove every selected component. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        let removed = self.circuit.delete_selected();
        if removed > 0 {
            self.refresh();
        }
        removed
    }

    pub fn remove_component(&mut self, id: &ComponentId) -> Result<()> {
        self.circuit.remove_component(id)?;
        self.refresh();
        Ok(())
    }

    /// Remove all components and wires.
    pub fn clear(&mut self) {
        self.circuit.clear();
        self.animator.rebuild(&self.circuit.wires);
        self.refresh();
    }

    pub fn add_wire(&mut self, wire: Wire) -> Result<()> {
        self.circuit.add_wire(wire)?;
        self.animator.rebuild(&self.circuit.wires);
        self.refresh();
        Ok(())
    }

    /// Replace the whole wire set.
    pub fn set_wires(&mut self, wires: Vec<Wire>) {
        self.circuit.set_wires(wires);
        self.animator.rebuild(&self.circuit.wires);
        self.refresh();
    }

    /// Indicator speed in pixels per second for the latest analysis.
    pub fn animation_speed(&self) -> f64 {
        self.config
            .speed
            .speed(self.analysis.current, self.source.speed_scale)
    }

    /// Set the reference time for the next tick.
    pub fn start(&mut self, now: Duration) {
        self.animator.start(now);
    }

    /// Advance the animation to `now`.
    pub fn tick(&mut self, now: Duration) -> FrameOutput {
        let state = self.animator.tick(now, self.animation_speed());
        FrameOutput {
            current: self.analysis.current,
            flowing: state == FlowState::Flowing,
            position: self.animator.position(),
            progress: self.animator.progress(),
        }
    }

    /// Indicator position without advancing.
    pub fn position(&self) -> Option<Point> {
        self.animator.position()
    }

    fn refresh(&mut self) {
        self.analysis = analyze(&self.circuit.components, &self.source);
        tracing::debug!(
            current = self.analysis.current,
            impedance = ?self.analysis.impedance,
            open = self.analysis.open_circuit,
            "analysis updated"
        );
    }
}

impl Default for FlowEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
