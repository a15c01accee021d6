//! Circuit model: placed components, wires and their values.
//!
//! A [`Circuit`] is what the canvas shows. Components carry their value as
//! written by the user ("10Ω", "1µF"); [`parse_value`] turns that into an SI
//! magnitude for the analysis. The editing operations (drop, drag, toggle,
//! delete) snap components onto wires through [`crate::geometry`].

mod model;
mod types;
mod validate;
mod value;

pub use model::{Circuit, Component, Wire, DEFAULT_COMPONENT_HEIGHT, DEFAULT_COMPONENT_WIDTH};
pub use types::*;
pub use validate::validate_circuit;
pub use value::{parse_magnitude, parse_value, ParsedValue, Unit};
