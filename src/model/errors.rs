//! Error types for the layered-model parameterization layer.
//!
//! These cover structural problems (empty models, mismatched flag arrays),
//! invalid physical parameter values, and flatten/scatter shape violations.
//! Higher layers convert them into `InversionError` via `From`.

/// Result alias for model-layer operations.
pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A model must contain at least one layer.
    EmptyModel,

    /// The free-flag array must have one entry per layer.
    LayerCountMismatch {
        layers: usize,
        flags: usize,
    },

    /// A physical layer parameter is non-finite or non-positive.
    InvalidParameterValue {
        layer: usize,
        quantity: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A dense parameter vector has the wrong length for this model.
    VectorLengthMismatch {
        expected: usize,
        found: usize,
    },

    /// A dense parameter vector entry is NaN or infinite.
    NonFiniteVectorEntry {
        index: usize,
        value: f64,
    },
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::EmptyModel => {
                write!(f, "Layered model must contain at least one layer")
            }
            ModelError::LayerCountMismatch { layers, flags } => {
                write!(f, "Free-flag count {flags} does not match layer count {layers}")
            }
            ModelError::InvalidParameterValue { layer, quantity, value, reason } => {
                write!(f, "Invalid {quantity} in layer {layer}: {value}: {reason}")
            }
            ModelError::VectorLengthMismatch { expected, found } => {
                write!(f, "Parameter vector length mismatch: expected {expected}, found {found}")
            }
            ModelError::NonFiniteVectorEntry { index, value } => {
                write!(f, "Parameter vector entry at index {index} is not finite: {value}")
            }
        }
    }
}
