//! Simple gradient-descent step with L-infinity normalization.
//!
//! The working gradient is the misfit gradient plus, where the prior is
//! active, the regularization pull `(current - prior) / Cm` toward the
//! reference model. Normalizing by the largest absolute component means
//! `epsilon` directly bounds the largest single-parameter move, which keeps
//! one step size meaningful across quantities of very different magnitudes
//! (densities in the thousands, ξ near one).

use crate::inversion::{
    errors::{InvResult, InversionError},
    step::{StepContext, StepStrategy},
    types::ModelVec,
};

/// First-order strategy: proposed = current − ε · g / ‖g‖∞.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleStep;

impl StepStrategy for SimpleStep {
    fn name(&self) -> &'static str {
        "simple"
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

        // Damped gradient: data term plus prior pull where Cm is active.
        let mut norm = 0.0_f64;
        for i in 0..n {
            let cm = ctx.model_covariance[i];
            let prior_pull =
                if cm > 0.0 { (ctx.current[i] - ctx.prior_mean[i]) / cm } else { 0.0 };
            let g = ctx.gradient[i] + prior_pull;
            if !g.is_finite() {
                return Err(InversionError::StepComputationFailed {
                    strategy: self.name(),
                    reason: "Non-finite gradient component.",
                });
            }
            proposed[i] = g;
            norm = norm.max(g.abs());
        }

        if norm == 0.0 {
            // Converged: nothing pulls anywhere, propose staying put.
            proposed.assign(ctx.current);
            return Ok(());
        }

        let scale = epsilon / norm;
        for i in 0..n {
            proposed[i] = ctx.current[i] - scale * proposed[i];
        }
        Ok(())
    }
}
