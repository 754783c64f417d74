//! inversion::step — parameter-update strategies.
//!
//! Purpose
//! -------
//! Define the single capability the driver needs from an update rule —
//! "given the current evaluation, propose a new parameter vector scaled by
//! epsilon" — and the two implementations the loop alternates between:
//! a normalized damped gradient descent ([`simple::SimpleStep`]) and a
//! regularized Gauss-Newton solve ([`quasi_newton::QuasiNewton`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Strategies are stateless; every call works purely off the borrowed
//!   [`StepContext`].
//! - Inputs have already passed `validation::validate_eval`; strategies may
//!   assume finite gradients and strictly positive data covariances, but must
//!   still surface their own unrecoverable numerical failures (singular
//!   systems, non-finite arithmetic) as
//!   [`InversionError::StepComputationFailed`].
//! - On success `proposed` is fully overwritten; on failure its contents are
//!   unspecified and the driver must not use them.
//! - A converged state (zero gradient / zero right-hand side) proposes the
//!   unchanged current vector; convergence is not a failure.

pub mod quasi_newton;
pub mod simple;

use crate::inversion::{
    errors::{InvResult, InversionError},
    types::{DiagCovariance, GradientVec, Jacobian, ModelVec, Residuals},
};
use crate::model::vector::ParameterMask;

pub use self::quasi_newton::QuasiNewton;
pub use self::simple::SimpleStep;

/// Borrowed view of everything a strategy may consult when proposing a step.
///
/// All references come from the driver's scratch state for the current
/// iteration: the latest likelihood evaluation plus the flattened model and
/// prior-mean vectors.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    /// Diagonal data covariance `Cd` (length = n observations).
    pub data_covariance: &'a DiagCovariance,
    /// Diagonal prior model covariance `Cm` (variances, length = n free).
    pub model_covariance: &'a DiagCovariance,
    /// Observed minus predicted values (length = n observations).
    pub residuals: &'a Residuals,
    /// Jacobian `G`, shape (n observations × n free).
    pub jacobian: &'a Jacobian,
    /// Misfit gradient dL/dp (length = n free).
    pub gradient: &'a GradientVec,
    /// Kind mask for the free slots.
    pub mask: &'a ParameterMask,
    /// Current flattened model (`model_v`).
    pub current: &'a ModelVec,
    /// Prior mean (`model_0`), flattened reference model.
    pub prior_mean: &'a ModelVec,
}

impl<'a> StepContext<'a> {
    /// Cross-check the context's dimensions.
    ///
    /// The driver validates likelihood output already; this guards direct
    /// callers of the strategies.
    ///
    /// # Errors
    /// Reports the first mismatched dimension via the matching
    /// [`InversionError`] variant.
    pub fn check_dimensions(&self) -> InvResult<()> {
        let n_free = self.current.len();
        let n_obs = self.residuals.len();
        if self.jacobian.nrows() != n_obs || self.jacobian.ncols() != n_free {
            return Err(InversionError::JacobianDimMismatch {
                expected: (n_obs, n_free),
                found: (self.jacobian.nrows(), self.jacobian.ncols()),
            });
        }
        if self.gradient.len() != n_free {
            return Err(InversionError::GradientDimMismatch {
                expected: n_free,
                found: self.gradient.len(),
            });
        }
        if self.model_covariance.len() != n_free {
            return Err(InversionError::CovarianceDimMismatch {
                expected: n_free,
                found: self.model_covariance.len(),
            });
        }
        if self.data_covariance.len() != n_obs {
            return Err(InversionError::CovarianceDimMismatch {
                expected: n_obs,
                found: self.data_covariance.len(),
            });
        }
        if self.prior_mean.len() != n_free {
            return Err(InversionError::VectorDimMismatch {
                name: "prior mean",
                expected: n_free,
                found: self.prior_mean.len(),
            });
        }
        if self.mask.len() != n_free {
            return Err(InversionError::MaskLengthMismatch {
                expected: n_free,
                found: self.mask.len(),
            });
        }
        Ok(())
    }
}

/// A parameter-update rule the driver can alternate between.
pub trait StepStrategy {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Propose a new parameter vector scaled by `epsilon`.
    ///
    /// On success `proposed` holds the candidate vector. Failure is reserved
    /// for unrecoverable numerical trouble; prior violations are the
    /// validator's business, not the strategy's.
    ///
    /// # Errors
    /// - [`InversionError::StepComputationFailed`] on singular systems or
    ///   non-finite arithmetic.
    /// - Dimension-mismatch variants if the context is inconsistent.
    fn compute_step(
        &self, epsilon: f64, ctx: &StepContext<'_>, proposed: &mut ModelVec,
    ) -> InvResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::layer::ParameterKind;
    use ndarray::{Array1, Array2};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - check_dimensions on a consistent context and with each model-side
    //   array mis-sized, verifying the error names the offending array.
    //
    // They intentionally DO NOT cover:
    // - The update arithmetic of the strategies (their own test modules).
    // -------------------------------------------------------------------------

    struct Fixture {
        data_covariance: Array1<f64>,
        model_covariance: Array1<f64>,
        residuals: Array1<f64>,
        jacobian: Array2<f64>,
        gradient: Array1<f64>,
        mask: Vec<ParameterKind>,
        current: Array1<f64>,
        prior_mean: Array1<f64>,
    }

    impl Fixture {
        fn consistent(n_obs: usize, n_free: usize) -> Self {
            Fixture {
                data_covariance: Array1::ones(n_obs),
                model_covariance: Array1::zeros(n_free),
                residuals: Array1::zeros(n_obs),
                jacobian: Array2::zeros((n_obs, n_free)),
                gradient: Array1::zeros(n_free),
                mask: vec![ParameterKind::Vs; n_free],
                current: Array1::zeros(n_free),
                prior_mean: Array1::zeros(n_free),
            }
        }

        fn ctx(&self) -> StepContext<'_> {
            StepContext {
                data_covariance: &self.data_covariance,
                model_covariance: &self.model_covariance,
                residuals: &self.residuals,
                jacobian: &self.jacobian,
                gradient: &self.gradient,
                mask: &self.mask,
                current: &self.current,
                prior_mean: &self.prior_mean,
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // A consistent context passes the cross-check.
    fn consistent_context_passes() {
        let fx = Fixture::consistent(3, 2);
        assert!(fx.ctx().check_dimensions().is_ok());
    }

    #[test]
    // Purpose
    // -------
    // A mis-sized prior mean is reported as a prior-mean mismatch, not as a
    // gradient problem.
    fn prior_mean_mismatch_is_named() {
        let mut fx = Fixture::consistent(3, 2);
        fx.prior_mean = Array1::zeros(5);
        assert!(matches!(
            fx.ctx().check_dimensions(),
            Err(InversionError::VectorDimMismatch { name: "prior mean", expected: 2, found: 5 })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Jacobian and mask mismatches keep their dedicated variants.
    fn jacobian_and_mask_mismatches_keep_their_variants() {
        let mut fx = Fixture::consistent(3, 2);
        fx.jacobian = Array2::zeros((3, 4));
        assert!(matches!(
            fx.ctx().check_dimensions(),
            Err(InversionError::JacobianDimMismatch { .. })
        ));

        let mut fx = Fixture::consistent(3, 2);
        fx.mask = vec![ParameterKind::Vs; 3];
        assert!(matches!(
            fx.ctx().check_dimensions(),
            Err(InversionError::MaskLengthMismatch { expected: 2, found: 3 })
        ));
    }
}
