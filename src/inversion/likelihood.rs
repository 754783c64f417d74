//! inversion::likelihood — boundary to the external spectral forward solver.
//!
//! Purpose
//! -------
//! Define the contract the driver consumes each iteration: given the current
//! model, the reference model, damping, and the fixed forward configuration,
//! produce the scalar misfit together with the derivative information the
//! step strategies need (Jacobian, gradient, residuals, data covariance).
//! The spectral mesh, the dispersion physics, and the data file format all
//! live behind this trait, outside this crate.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`Likelihood::evaluate`] must behave as a pure function of
//!   `(model, data, config)`: the driver evaluates the same model more than
//!   once per iteration (forward pass, backtrack re-evaluation) and requires
//!   identical results for identical models. No hidden iteration-dependent
//!   state.
//! - Every returned array is freshly computed for the supplied model; the
//!   driver never reuses an evaluation across model changes.
//! - `data` is mutable because evaluations attach predictions to it; those
//!   predictions are what [`Likelihood::save_predictions`] persists.
//!
//! Downstream usage
//! ----------------
//! - `inversion::driver::invert` is the only caller inside this crate.
//! - Tests implement the trait with small synthetic forward operators.

use crate::inversion::{
    errors::InvResult,
    options::{Damping, ForwardConfig},
    types::{DiagCovariance, GradientVec, Jacobian, Misfit, Residuals},
};
use crate::model::layer::LayeredModel;

/// Everything one forward/adjoint evaluation hands back to the driver.
///
/// Shapes (checked by `validation::validate_eval`):
/// - `jacobian`: (n_observations × n_free_parameters)
/// - `gradient`, and the model-side vectors elsewhere: n_free_parameters
/// - `residuals`, `data_covariance`: n_observations
#[derive(Debug, Clone, PartialEq)]
pub struct LikelihoodEval {
    /// Scalar misfit (negative log-likelihood) for the evaluated model.
    pub misfit: Misfit,
    /// Partial derivatives of predictions with respect to free parameters.
    pub jacobian: Jacobian,
    /// Gradient of the misfit with respect to free parameters (dL/dp).
    pub gradient: GradientVec,
    /// Observed minus predicted dispersion values.
    pub residuals: Residuals,
    /// Diagonal data covariance (variances per observation).
    pub data_covariance: DiagCovariance,
}

/// External forward-solver boundary.
///
/// Implementors wrap the spectral-element Love-wave solver (or, in tests, a
/// synthetic forward operator). `Data` carries the dispersion observations
/// and whatever per-run state the solver attaches to them.
pub trait Likelihood {
    /// Dispersion data plus solver-attached predictions.
    type Data;

    /// Evaluate misfit and derivatives for `model`.
    ///
    /// Must be deterministic for identical `(model, data, config)`; see the
    /// module-level invariants.
    ///
    /// # Errors
    /// Implementors should return a descriptive [`crate::inversion::errors::InversionError`]
    /// for solver failures rather than panicking.
    fn evaluate(
        &self, data: &mut Self::Data, model: &LayeredModel, reference: &LayeredModel,
        damping: &Damping, config: &ForwardConfig,
    ) -> InvResult<LikelihoodEval>;

    /// Persist the predictions currently attached to `data`.
    ///
    /// The driver calls this once, best-effort, right after the initial
    /// evaluation; a failure is logged, not fatal. The default implementation
    /// does nothing, for data layers with nothing to persist.
    fn save_predictions(&self, data: &Self::Data, path: &str) -> InvResult<()> {
        let _ = (data, path);
        Ok(())
    }
}
