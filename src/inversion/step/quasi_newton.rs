//! Quasi-Newton step via a regularized Gauss-Newton system.
//!
//! Assembles the normal system
//! `A = Gᵀ Cd⁻¹ G + Cm⁻¹` and `b = Gᵀ Cd⁻¹ r − Cm⁻¹ (current − prior)`
//! (slots with zero damping contribute nothing to the `Cm⁻¹` terms), solves
//! `A d = b` with an LU decomposition, and proposes `current + ε·d`. The
//! system is built in a `nalgebra` matrix because the solve happens there;
//! everything else in the crate stays on `ndarray`.

use crate::inversion::{
    errors::{InvResult, InversionError},
    step::{StepContext, StepStrategy},
    types::ModelVec,
};
use nalgebra::{DMatrix, DVector};

/// Second-order strategy: proposed = current + ε · (GᵀCd⁻¹G + Cm⁻¹)⁻¹ b.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuasiNewton;

impl StepStrategy for QuasiNewton {
    fn name(&self) -> &'static str {
        "quasi-newton"
    }

    fn compute_step(
        &self, epsilon: f64, ctx: &StepContext<'_>, proposed: &mut ModelVec,
    ) -> InvResult<()> {
        ctx.check_dimensions()?;
        let n = ctx.current.len();
        if proposed.len() != n {
            return Err(InversionError::VectorDimMismatch {
                name: "proposed",
                expected: n,
                found: proposed.len(),
            });
        }
        let n_obs = ctx.residuals.len();

        // Normal system in nalgebra form; no explicit inverse is formed.
        let mut a = DMatrix::<f64>::zeros(n, n);
        let mut b = DVector::<f64>::zeros(n);

        for j in 0..n_obs {
            let w = 1.0 / ctx.data_covariance[j];
            let r = ctx.residuals[j];
            for i in 0..n {
                let gji = ctx.jacobian[[j, i]];
                if gji == 0.0 {
                    continue;
                }
                b[i] += gji * w * r;
                for k in 0..n {
                    a[(i, k)] += gji * w * ctx.jacobian[[j, k]];
                }
            }
        }

        // Prior precision pulls the update toward the reference model.
        for i in 0..n {
            let cm = ctx.model_covariance[i];
            if cm > 0.0 {
                a[(i, i)] += 1.0 / cm;
                b[i] -= (ctx.current[i] - ctx.prior_mean[i]) / cm;
            }
        }

        let direction = a.lu().solve(&b).ok_or(InversionError::StepComputationFailed {
            strategy: self.name(),
            reason: "Singular normal system.",
        })?;

        for i in 0..n {
            let d = direction[i];
            if !d.is_finite() {
                return Err(InversionError::StepComputationFailed {
                    strategy: self.name(),
                    reason: "Non-finite update direction.",
                });
            }
            proposed[i] = ctx.current[i] + epsilon * d;
        }
        Ok(())
    }
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
    // - The exact Gauss-Newton solve on small well-posed systems.
    // - Epsilon scaling of the direction.
    // - The prior precision term and the singular-system failure path.
    //
    // They intentionally DO NOT cover:
    // - Interaction with prior-bound validation (driver tests).
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

    fn identity_fixture(residuals: Vec<f64>, cm: Vec<f64>, current: Vec<f64>) -> Fixture {
        let n = current.len();
        Fixture {
            data_covariance: Array1::ones(residuals.len()),
            model_covariance: Array1::from(cm),
            residuals: Array1::from(residuals),
            jacobian: Array2::eye(n),
            gradient: Array1::zeros(n),
            mask: vec![ParameterKind::Vs; n],
            current: Array1::from(current.clone()),
            prior_mean: Array1::from(current),
        }
    }

    #[test]
    // Purpose
    // -------
    // With G = I, unit Cd, and no prior, the system reduces to d = r, so a
    // full step (epsilon = 1) adds the residuals to the current vector.
    fn identity_system_solves_exactly() {
        // Arrange
        let fx = identity_fixture(vec![2.0, -1.0], vec![0.0, 0.0], vec![10.0, 20.0]);
        let mut proposed = Array1::zeros(2);

        // Act
        QuasiNewton.compute_step(1.0, &fx.ctx(), &mut proposed).expect("step should succeed");

        // Assert
        assert!((proposed[0] - 12.0).abs() < 1e-12);
        assert!((proposed[1] - 19.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Epsilon scales the direction linearly.
    fn epsilon_scales_direction() {
        let fx = identity_fixture(vec![2.0, -1.0], vec![0.0, 0.0], vec![10.0, 20.0]);
        let mut proposed = Array1::zeros(2);
        QuasiNewton.compute_step(0.5, &fx.ctx(), &mut proposed).expect("step should succeed");
        assert!((proposed[0] - 11.0).abs() < 1e-12);
        assert!((proposed[1] - 19.5).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // With a zero Jacobian and an active prior, the system is pure prior
    // precision and a full step lands exactly on the prior mean.
    fn prior_only_system_returns_to_reference() {
        // Arrange
        let fx = Fixture {
            data_covariance: Array1::ones(1),
            model_covariance: Array1::from(vec![100.0]),
            residuals: Array1::zeros(1),
            jacobian: Array2::zeros((1, 1)),
            gradient: Array1::zeros(1),
            mask: vec![ParameterKind::Vs],
            current: Array1::from(vec![3600.0]),
            prior_mean: Array1::from(vec![3500.0]),
        };
        let mut proposed = Array1::zeros(1);

        // Act
        QuasiNewton.compute_step(1.0, &fx.ctx(), &mut proposed).expect("step should succeed");

        // Assert
        assert!((proposed[0] - 3500.0).abs() < 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // A zero Jacobian with no prior leaves the normal matrix singular and
    // the step fails instead of producing garbage.
    fn singular_system_fails() {
        // Arrange
        let fx = Fixture {
            data_covariance: Array1::ones(1),
            model_covariance: Array1::from(vec![0.0, 0.0]),
            residuals: Array1::from(vec![1.0]),
            jacobian: Array2::zeros((1, 2)),
            gradient: Array1::zeros(2),
            mask: vec![ParameterKind::Vs; 2],
            current: Array1::from(vec![1.0, 2.0]),
            prior_mean: Array1::from(vec![1.0, 2.0]),
        };
        let mut proposed = Array1::zeros(2);

        // Act + Assert
        assert!(matches!(
            QuasiNewton.compute_step(1.0, &fx.ctx(), &mut proposed),
            Err(InversionError::StepComputationFailed { strategy: "quasi-newton", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // A least-squares system with more observations than parameters is
    // solved through the normal equations: for G = [[1],[1]] and residuals
    // [1, 3], the update is their mean.
    fn overdetermined_system_averages_residuals() {
        // Arrange
        let fx = Fixture {
            data_covariance: Array1::ones(2),
            model_covariance: Array1::from(vec![0.0]),
            residuals: Array1::from(vec![1.0, 3.0]),
            jacobian: Array2::from_shape_vec((2, 1), vec![1.0, 1.0]).unwrap(),
            gradient: Array1::zeros(1),
            mask: vec![ParameterKind::Vs],
            current: Array1::from(vec![5.0]),
            prior_mean: Array1::from(vec![5.0]),
        };
        let mut proposed = Array1::zeros(1);

        // Act
        QuasiNewton.compute_step(1.0, &fx.ctx(), &mut proposed).expect("step should succeed");

        // Assert: A = 2, b = 4, d = 2.
        assert!((proposed[0] - 7.0).abs() < 1e-12);
    }
}
