//! # Ampflow Core
//!
//! Current-flow visualisation for simple series circuits.
//!
//! This library provides:
//! - A circuit model with drag-and-drop placement and wire snapping
//! - Steady-state current analysis for a single series loop (DC and AC)
//! - An arc-length parametrized flow animation along the wires
//! - Built-in demo circuits and a JSON circuit format
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`geometry`] - Point/segment projection and nearest-wire search
//! - [`circuit`] - Components, wires, value parsing and placement operations
//! - [`analysis`] - Current magnitude and animation speed
//! - [`animation`] - Flow path, animator and the frame loop
//! - [`catalog`] - Component palette and circuit templates
//! - [`engine`] - [`FlowEngine`], which owns and ties everything together
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! ampflow --circuit ohms-law --frames 120 --json
//! ampflow --file my-circuit.json --source ac --frequency 60
//! ```
//!
//! ### Library
//!
//! ```
//! use std::time::Duration;
//! use ampflow_core::{catalog, EngineConfig, FlowEngine};
//!
//! let template = catalog::find_prebuilt("ohms-law")?;
//! let mut engine = FlowEngine::from_template(&template, EngineConfig::default())?;
//! engine.start(Duration::ZERO);
//! let frame = engine.tick(Duration::from_millis(16));
//! assert!(frame.flowing);
//! # Ok::<(), ampflow_core::AmpflowError>(())
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmFlowEngine } from 'ampflow_core';
//!
//! const engine = WasmFlowEngine.prebuilt('dc-circuit');
//! requestAnimationFrame(function frame(ts) {
//!     engine.tick(ts);
//!     draw(engine.position_x(), engine.position_y());
//!     requestAnimationFrame(frame);
//! });
//! ```
//!
//! ## Analysis Model
//!
//! Every component is assumed to sit on one series loop. Resistance,
//! capacitance and inductance are summed by kind, an open switch breaks the
//! loop, and the resulting magnitude is clamped to a displayable range. It
//! drives an animation; it is not a circuit simulation.

pub mod analysis;
pub mod animation;
pub mod catalog;
pub mod circuit;
pub mod engine;
pub mod error;
pub mod geometry;

// Re-export main types for convenience
pub use analysis::{AnalysisResult, SourceKind, SourceParams};
pub use animation::{FrameOutput, TickLoop};
pub use catalog::CircuitTemplate;
pub use circuit::{Circuit, Component, ComponentId, ComponentKind, Wire, WireId};
pub use engine::{EngineConfig, FlowEngine};
pub use error::{AmpflowError, Result};
pub use geometry::{Point, SnapResult};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmFlowEngine;
