//! Validation helpers for the inversion core.
//!
//! This module centralizes the consistency checks shared across the
//! configuration types and the driver:
//!
//! - **Configuration checks**: [`verify_epsilon`], [`verify_max_iterations`],
//!   [`verify_sigma`], [`verify_order`] keep constructor code uniform.
//! - **Likelihood output checks**: [`validate_eval`] enforces the shape and
//!   finiteness contract on everything the external forward solver returns,
//!   so the step strategies can assume well-formed inputs.
//!
//! All helpers report domain-specific [`InversionError`] variants.

use crate::inversion::{
    errors::{InvResult, InversionError},
    likelihood::LikelihoodEval,
};

/// Validate a step size: must be finite and strictly positive.
///
/// # Errors
/// Returns [`InversionError::InvalidEpsilon`] otherwise.
pub fn verify_epsilon(epsilon: f64) -> InvResult<()> {
    if !epsilon.is_finite() {
        return Err(InversionError::InvalidEpsilon {
            value: epsilon,
            reason: "Epsilon must be finite.",
        });
    }
    if epsilon <= 0.0 {
        return Err(InversionError::InvalidEpsilon {
            value: epsilon,
            reason: "Epsilon must be positive.",
        });
    }
    Ok(())
}

/// Validate the iteration cap: at least one iteration is required.
///
/// # Errors
/// Returns [`InversionError::InvalidMaxIterations`] if `max_iterations == 0`.
pub fn verify_max_iterations(max_iterations: usize) -> InvResult<()> {
    if max_iterations == 0 {
        return Err(InversionError::InvalidMaxIterations {
            value: max_iterations,
            reason: "At least one iteration is required.",
        });
    }
    Ok(())
}

/// Validate a damping standard deviation: finite and non-negative.
///
/// Zero is allowed and disables the prior pull for that quantity.
///
/// # Errors
/// Returns [`InversionError::InvalidDamping`] otherwise.
pub fn verify_sigma(quantity: &'static str, sigma: f64) -> InvResult<()> {
    if !sigma.is_finite() {
        return Err(InversionError::InvalidDamping {
            quantity,
            value: sigma,
            reason: "Damping must be finite.",
        });
    }
    if sigma < 0.0 {
        return Err(InversionError::InvalidDamping {
            quantity,
            value: sigma,
            reason: "Damping must be 0 or greater.",
        });
    }
    Ok(())
}

/// Validate a spectral order: must be at least 1.
///
/// # Errors
/// Returns [`InversionError::InvalidOrder`] if `order == 0`.
pub fn verify_order(name: &'static str, order: usize) -> InvResult<()> {
    if order == 0 {
        return Err(InversionError::InvalidOrder {
            name,
            value: order,
            reason: "Order must be 1 or greater.",
        });
    }
    Ok(())
}

/// Validate everything a likelihood evaluation hands back to the driver.
///
/// Checks, in order:
/// 1. the misfit is finite;
/// 2. the Jacobian has `n_free` columns;
/// 3. residuals and data covariance both match the Jacobian row count;
/// 4. every data-covariance entry is finite and strictly positive (it is
///    inverted by the quasi-Newton strategy);
/// 5. the gradient has `n_free` finite entries.
///
/// # Errors
/// The first violated check is reported via the matching
/// [`InversionError`] variant.
pub fn validate_eval(eval: &LikelihoodEval, n_free: usize) -> InvResult<()> {
    if !eval.misfit.is_finite() {
        return Err(InversionError::NonFiniteMisfit { value: eval.misfit });
    }

    let n_obs = eval.jacobian.nrows();
    if eval.jacobian.ncols() != n_free {
        return Err(InversionError::JacobianDimMismatch {
            expected: (n_obs, n_free),
            found: (n_obs, eval.jacobian.ncols()),
        });
    }
    if eval.residuals.len() != n_obs {
        return Err(InversionError::ResidualDimMismatch {
            expected: n_obs,
            found: eval.residuals.len(),
        });
    }
    if eval.data_covariance.len() != n_obs {
        return Err(InversionError::CovarianceDimMismatch {
            expected: n_obs,
            found: eval.data_covariance.len(),
        });
    }
    for (index, &value) in eval.data_covariance.iter().enumerate() {
        if !value.is_finite() || value <= 0.0 {
            return Err(InversionError::InvalidDataCovariance { index, value });
        }
    }
    if eval.gradient.len() != n_free {
        return Err(InversionError::GradientDimMismatch {
            expected: n_free,
            found: eval.gradient.len(),
        });
    }
    for (index, &value) in eval.gradient.iter().enumerate() {
        if !value.is_finite() {
            return Err(InversionError::NonFiniteGradient { index, value });
        }
    }
    Ok(())
}
