//! Error types for the Ampflow engine.
//!
//! The analysis, geometry and animation routines are total and never fail.
//! [`AmpflowError`] covers the operations around them that can: looking up
//! components and circuits by id, loading circuit files and validating
//! source parameters handed in by a host.

use thiserror::Error;

/// Result type alias using [`AmpflowError`].
pub type Result<T> = std::result::Result<T, AmpflowError>;

/// Unified error type for all Ampflow operations.
#[derive(Error, Debug)]
pub enum AmpflowError {
    // ============ Circuit Model Errors ============
    /// Component id not present in the circuit
    #[error("Component '{id}' not found in circuit")]
    ComponentNotFound { id: String },

    /// Wire id not present in the circuit
    #[error("Wire '{id}' not found in circuit")]
    WireNotFound { id: String },

    /// Duplicate component id
    #[error("Duplicate component id '{id}'")]
    DuplicateComponent { id: String },

    /// Duplicate wire id
    #[error("Duplicate wire id '{id}'")]
    DuplicateWire { id: String },

    /// Operation requires a different component kind
    #[error("Component '{id}' is a {kind}, expected a {expected}")]
    WrongComponentKind {
        id: String,
        kind: String,
        expected: String,
    },

    // ============ Catalog Errors ============
    /// Unknown pre-built circuit id
    #[error("Unknown circuit '{id}' (available: {available})")]
    UnknownCircuit { id: String, available: String },

    /// Unknown component template
    #[error("Unknown component template '{name}'")]
    UnknownTemplate { name: String },

    /// Circuit file could not be decoded
    #[error("Invalid circuit description: {source}")]
    InvalidCircuitJson {
        #[from]
        source: serde_json::Error,
    },

    // ============ Source Parameter Errors ============
    /// Source parameter outside its valid domain
    #[error("Invalid source parameter '{param}': {message}")]
    InvalidSourceParam { param: String, message: String },

    // ============ I/O Errors ============
    /// Error reading a circuit file
    #[error("Failed to read circuit file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing frame output
    #[error("Output error: {message}")]
    OutputError { message: String },
}

impl AmpflowError {
    /// Create a component-not-found error
    pub fn component_not_found(id: impl Into<String>) -> Self {
        Self::ComponentNotFound { id: id.into() }
    }

    /// Create a wire-not-found error
    pub fn wire_not_found(id: impl Into<String>) -> Self {
        Self::WireNotFound { id: id.into() }
    }

    /// Create an invalid source parameter error
    pub fn invalid_source(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSourceParam {
            param: param.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AmpflowError::component_not_found("resistor-1");
        assert_eq!(err.to_string(), "Component 'resistor-1' not found in circuit");

        let err = AmpflowError::invalid_source("frequency", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid source parameter 'frequency': must be positive"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: AmpflowError = json_err.into();
        assert!(matches!(err, AmpflowError::InvalidCircuitJson { .. }));
    }
}
