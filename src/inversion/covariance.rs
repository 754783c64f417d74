//! inversion::covariance — diagonal prior model covariance from damping.
//!
//! The prior covariance `Cm` is diagonal and stored as its diagonal, one
//! entry per free parameter slot. Entries are **variances**: the damping
//! standard deviation for the slot's physical quantity, squared. A zero
//! damping entry yields a zero variance, which the step strategies interpret
//! as "no prior contribution for this slot" (an infinitely wide prior), not
//! as a fixed parameter — fixedness lives in the model's free flags.
//!
//! Built once before the loop from the working model's structure, never
//! recomputed.

use crate::inversion::{
    errors::{InvResult, InversionError},
    options::Damping,
    types::DiagCovariance,
};
use crate::model::layer::LayeredModel;

/// Fill `cm` with the per-slot prior variance for every free parameter.
///
/// `cm` must already have length `model.free_parameter_count()`; entries are
/// fully overwritten in canonical slot order.
///
/// # Errors
/// Returns [`InversionError::CovarianceDimMismatch`] if `cm` has the wrong
/// length.
pub fn initialize_cm(
    model: &LayeredModel, damping: &Damping, cm: &mut DiagCovariance,
) -> InvResult<()> {
    let expected = model.free_parameter_count();
    if cm.len() != expected {
        return Err(InversionError::CovarianceDimMismatch { expected, found: cm.len() });
    }
    let mut slot = 0;
    model.for_each_free(|_, kind, _| {
        let sigma = damping.sigma(kind);
        cm[slot] = sigma * sigma;
        slot += 1;
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::layer::{FreeFlags, Layer, LayeredModel};
    use ndarray::Array1;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The variance (sigma squared) convention, per quantity.
    // - One entry per free slot, zero damping giving zero variance.
    // - Length mismatch rejection.
    // -------------------------------------------------------------------------

    fn crust() -> Layer {
        Layer::new(2700.0, 3500.0, 1.0, 1.75).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // With damping [0.5e3, 0.5e3, 0.05, 0.05] and a fully free single layer,
    // Cm has exactly one strictly positive entry per free parameter, each the
    // square of the damping value for its quantity.
    fn cm_entries_are_squared_sigmas() {
        // Arrange
        let model = LayeredModel::fully_free(vec![crust()]).unwrap();
        let damping = Damping::new(0.5e3, 0.5e3, 0.05, 0.05).unwrap();
        let mut cm = Array1::zeros(model.free_parameter_count());

        // Act
        initialize_cm(&model, &damping, &mut cm).expect("initialize_cm should succeed");

        // Assert
        assert_eq!(cm.len(), 4);
        assert!(cm.iter().all(|&v| v > 0.0));
        assert_eq!(cm[0], 0.5e3 * 0.5e3);
        assert_eq!(cm[1], 0.5e3 * 0.5e3);
        assert_eq!(cm[2], 0.05 * 0.05);
        assert_eq!(cm[3], 0.05 * 0.05);
    }

    #[test]
    // Purpose
    // -------
    // Fixed slots are skipped and zero damping produces a zero entry
    // (prior disabled, not an error).
    fn cm_skips_fixed_slots_and_allows_zero_damping() {
        // Arrange: only Vs and Vp/Vs are free, Vp/Vs undamped.
        let flags = FreeFlags { density: false, vs: true, xi: false, vpvs: true };
        let model = LayeredModel::new(vec![crust()], vec![flags]).unwrap();
        let damping = Damping::new(0.5e3, 200.0, 0.05, 0.0).unwrap();
        let mut cm = Array1::zeros(2);

        // Act
        initialize_cm(&model, &damping, &mut cm).expect("initialize_cm should succeed");

        // Assert
        assert_eq!(cm.to_vec(), vec![200.0 * 200.0, 0.0]);
    }

    #[test]
    // Purpose
    // -------
    // A wrongly sized Cm buffer is rejected.
    fn cm_rejects_length_mismatch() {
        let model = LayeredModel::fully_free(vec![crust()]).unwrap();
        let damping = Damping::free();
        let mut cm = Array1::zeros(3);
        assert!(matches!(
            initialize_cm(&model, &damping, &mut cm),
            Err(InversionError::CovarianceDimMismatch { expected: 4, found: 3 })
        ));
    }
}
