//! inversion::errors — error taxonomy for the inversion core.
//!
//! Prior violations and misfit regressions are loop control flow, never
//! errors; everything here is either invalid configuration caught at
//! construction time, a malformed likelihood evaluation, an unrecoverable
//! numerical failure inside a step strategy, or a soft I/O failure at the
//! prediction-save boundary. Model-layer errors wrap via `From`.

use crate::model::errors::ModelError;

/// Result alias for inversion-core operations.
pub type InvResult<T> = Result<T, InversionError>;

#[derive(Debug, Clone, PartialEq)]
pub enum InversionError {
    // ---- Configuration ----
    /// Step size must be finite and strictly positive.
    InvalidEpsilon {
        value: f64,
        reason: &'static str,
    },
    /// At least one iteration is required.
    InvalidMaxIterations {
        value: usize,
        reason: &'static str,
    },
    /// Unknown step-strategy name.
    InvalidStepMode {
        name: String,
        reason: &'static str,
    },
    /// Damping standard deviations must be finite and non-negative.
    InvalidDamping {
        quantity: &'static str,
        value: f64,
        reason: &'static str,
    },
    /// Forward-solver scale must be strictly positive.
    InvalidScale {
        value: f64,
        reason: &'static str,
    },
    /// Spectral orders must be at least 1.
    InvalidOrder {
        name: &'static str,
        value: usize,
        reason: &'static str,
    },
    /// Frequency thinning must be finite and strictly positive.
    InvalidFrequencyThin {
        value: f64,
        reason: &'static str,
    },
    /// The solver threshold must be finite.
    InvalidThreshold {
        value: f64,
        reason: &'static str,
    },
    /// Prior bounds must be finite with min <= max per quantity.
    InvalidPriorBound {
        quantity: &'static str,
        min: f64,
        max: f64,
        reason: &'static str,
    },

    // ---- Likelihood evaluations ----
    /// The forward solver returned a non-finite misfit.
    NonFiniteMisfit {
        value: f64,
    },
    /// Jacobian shape disagrees with the residuals / free-parameter count.
    JacobianDimMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// Residual length disagrees with the Jacobian row count.
    ResidualDimMismatch {
        expected: usize,
        found: usize,
    },
    /// Gradient length disagrees with the free-parameter count.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },
    /// Gradient entries must be finite.
    NonFiniteGradient {
        index: usize,
        value: f64,
    },
    /// Covariance diagonal length disagrees with its expected dimension.
    CovarianceDimMismatch {
        expected: usize,
        found: usize,
    },
    /// Data-covariance entries must be finite and strictly positive.
    InvalidDataCovariance {
        index: usize,
        value: f64,
    },
    /// Mask length disagrees with the dense vector it annotates.
    MaskLengthMismatch {
        expected: usize,
        found: usize,
    },
    /// A named model-side vector disagrees with the free-parameter count.
    VectorDimMismatch {
        name: &'static str,
        expected: usize,
        found: usize,
    },

    // ---- Step strategies ----
    /// A step strategy hit an unrecoverable numerical failure.
    StepComputationFailed {
        strategy: &'static str,
        reason: &'static str,
    },

    // ---- Driver ----
    /// Working model and reference model must share layer/flag structure.
    StructureMismatch {
        reason: &'static str,
    },

    // ---- Boundary I/O ----
    /// Saving predictions failed; treated as soft by the driver.
    PredictionSave {
        path: String,
        reason: String,
    },

    // ---- Model layer ----
    /// Wrapped model-parameterization error.
    Model(ModelError),
}

impl std::error::Error for InversionError {}

impl std::fmt::Display for InversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            InversionError::InvalidEpsilon { value, reason } => {
                write!(f, "Invalid epsilon {value}: {reason}")
            }
            InversionError::InvalidMaxIterations { value, reason } => {
                write!(f, "Invalid maximum iterations {value}: {reason}")
            }
            InversionError::InvalidStepMode { name, reason } => {
                write!(f, "Invalid step mode '{name}': {reason}")
            }
            InversionError::InvalidDamping { quantity, value, reason } => {
                write!(f, "Invalid {quantity} damping {value}: {reason}")
            }
            InversionError::InvalidScale { value, reason } => {
                write!(f, "Invalid scale {value}: {reason}")
            }
            InversionError::InvalidOrder { name, value, reason } => {
                write!(f, "Invalid {name} {value}: {reason}")
            }
            InversionError::InvalidFrequencyThin { value, reason } => {
                write!(f, "Invalid frequency thinning {value}: {reason}")
            }
            InversionError::InvalidThreshold { value, reason } => {
                write!(f, "Invalid threshold {value}: {reason}")
            }
            InversionError::InvalidPriorBound { quantity, min, max, reason } => {
                write!(f, "Invalid {quantity} prior bounds [{min}, {max}]: {reason}")
            }

            // ---- Likelihood evaluations ----
            InversionError::NonFiniteMisfit { value } => {
                write!(f, "Non-finite misfit value: {value}")
            }
            InversionError::JacobianDimMismatch { expected, found } => {
                write!(f, "Jacobian dimension mismatch: expected {expected:?}, found {found:?}")
            }
            InversionError::ResidualDimMismatch { expected, found } => {
                write!(f, "Residual dimension mismatch: expected {expected}, found {found}")
            }
            InversionError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            InversionError::NonFiniteGradient { index, value } => {
                write!(f, "Gradient entry at index {index} is not finite: {value}")
            }
            InversionError::CovarianceDimMismatch { expected, found } => {
                write!(f, "Covariance dimension mismatch: expected {expected}, found {found}")
            }
            InversionError::InvalidDataCovariance { index, value } => {
                write!(
                    f,
                    "Data covariance entry at index {index} is {value}, must be finite and > 0"
                )
            }
            InversionError::MaskLengthMismatch { expected, found } => {
                write!(f, "Mask length mismatch: expected {expected}, found {found}")
            }
            InversionError::VectorDimMismatch { name, expected, found } => {
                write!(f, "{name} vector length mismatch: expected {expected}, found {found}")
            }

            // ---- Step strategies ----
            InversionError::StepComputationFailed { strategy, reason } => {
                write!(f, "Step computation failed in {strategy} step: {reason}")
            }

            // ---- Driver ----
            InversionError::StructureMismatch { reason } => {
                write!(f, "Model/reference structure mismatch: {reason}")
            }

            // ---- Boundary I/O ----
            InversionError::PredictionSave { path, reason } => {
                write!(f, "Failed to save predictions to '{path}': {reason}")
            }

            // ---- Model layer ----
            InversionError::Model(err) => write!(f, "{err}"),
        }
    }
}

impl From<ModelError> for InversionError {
    fn from(err: ModelError) -> Self {
        InversionError::Model(err)
    }
}
