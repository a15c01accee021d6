//! Circuit validation.

use std::collections::HashSet;

use crate::error::{AmpflowError, Result};

use super::Circuit;

/// Validate a circuit before it is handed to an engine.
///
/// Checks:
/// - No duplicate component or wire ids
/// - Every wire attachment refers to an existing wire
///
/// Wires whose endpoints name unknown components, and wires too short to
/// draw, are allowed but logged; neither affects the analysis.
pub fn validate_circuit(circuit: &Circuit) -> Result<()> {
    let mut component_ids = HashSet::new();
    for component in &circuit.components {
        if !component_ids.insert(&component.id) {
            return Err(AmpflowError::DuplicateComponent {
                id: component.id.0.clone(),
            });
        }
    }

    let mut wire_ids = HashSet::new();
    for wire in &circuit.wires {
        if !wire_ids.insert(&wire.id) {
            return Err(AmpflowError::DuplicateWire {
                id: wire.id.0.clone(),
            });
        }

        if !wire.is_drawable() {
            tracing::warn!(wire = %wire.id, points = wire.path.len(), "wire has fewer than two points");
        }
        for end in [&wire.start_component, &wire.end_component] {
            if !component_ids.contains(end) {
                tracing::warn!(wire = %wire.id, component = %end, "wire endpoint refers to unknown component");
            }
        }
    }

    for component in &circuit.components {
        if let Some(attachment) = &component.attachment {
            if !wire_ids.contains(&attachment.wire_id) {
                return Err(AmpflowError::wire_not_found(attachment.wire_id.as_str()));
            }
        }
    }

    Ok(())
}
