//! inversion — damped iterative inversion of surface-wave dispersion data.
//!
//! Purpose
//! -------
//! Provide the gradient-based optimization layer that fits a
//! [`LayeredModel`](crate::model::LayeredModel) to observed Love-wave
//! dispersion. Callers implement a single trait, [`Likelihood`], wrapping
//! their forward solver and misfit, and invoke [`invert`] to run the damped
//! alternating-strategy loop with prior bounds and backtracking.
//!
//! Key behaviors
//! -------------
//! - Alternate two step strategies by iteration parity, each with its own
//!   step size: a normalized gradient-descent step ([`SimpleStep`]) on even
//!   iterations and a damped Gauss-Newton solve ([`QuasiNewton`]) on odd
//!   ones.
//! - Enforce hard per-quantity prior bounds ([`PriorBounds`]) on every
//!   proposal, shrinking the step until the proposal is admissible.
//! - Backtrack on misfit regressions: halve the active step size, restore
//!   the previous model, and retry without advancing the iteration counter.
//! - Regularize free parameters toward a reference model through a diagonal
//!   prior covariance built by [`covariance::initialize_cm`] from per-quantity
//!   [`Damping`] values; zero damping disables the pull entirely.
//! - Centralize configuration ([`InversionOptions`], [`ForwardConfig`],
//!   [`Damping`]) and validation logic ([`validation`]) so the driver and
//!   strategies can assume finite, consistently sized inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`Likelihood::evaluate`] is a pure function of the model for fixed
//!   data/configuration; the driver re-evaluates after restoring a model and
//!   relies on getting the same answer back.
//! - Jacobian columns, gradient entries, and the prior covariance all follow
//!   the canonical free-parameter ordering defined by
//!   [`model::vector`](crate::model::vector) (layer-major, then density, Vs,
//!   xi, Vp/Vs).
//! - [`DiagCovariance`] values are variances; strategies divide by them
//!   directly and skip zero entries.
//! - Step sizes only ever shrink; termination is by iteration cap or one of
//!   the epsilon floors (see [`TerminationReason`]).
//!
//! Conventions
//! -----------
//! - Vectors and matrices use the [`ndarray`] aliases in [`types`]
//!   ([`ModelVec`], [`GradientVec`], [`types::Jacobian`]); the quasi-Newton
//!   normal system is assembled and solved with [`nalgebra`].
//! - Errors bubble up as [`InvResult<T>`] / [`InversionError`]; this module
//!   and its children never intentionally panic or use `unsafe`.
//! - Progress output goes to stderr and is gated by
//!   [`InversionOptions::verbose`].
//!
//! Downstream usage
//! ----------------
//! - Forward-solver crates implement [`Likelihood`] for their types, then
//!   call [`invert`] with:
//!   - mutable working and immutable reference models,
//!   - [`Damping`] and [`PriorBounds`] describing the prior,
//!   - a [`ForwardConfig`] forwarded verbatim to the solver, and
//!   - [`InversionOptions`] for the loop itself.
//! - The result is an [`InversionOutcome`] plus the mutated model; callers
//!   persist both.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover:
//!   - direction, scaling, and failure modes of [`SimpleStep`] and
//!     [`QuasiNewton`],
//!   - bound and covariance arithmetic in [`prior`] and [`covariance`],
//!   - configuration invariants in [`options`] and [`validation`],
//!   - the full accept/backtrack/terminate state machine in [`driver`] on
//!     synthetic likelihoods.
//! - Integration tests exercise [`invert`] end to end against a linear
//!   forward operator where the optimum is known in closed form.

pub mod covariance;
pub mod driver;
pub mod errors;
pub mod likelihood;
pub mod options;
pub mod prior;
pub mod step;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::driver::{invert, InversionOutcome, TerminationReason};
pub use self::errors::{InvResult, InversionError};
pub use self::likelihood::{Likelihood, LikelihoodEval};
pub use self::options::{Damping, ForwardConfig, InversionOptions, StepMode};
pub use self::prior::PriorBounds;
pub use self::step::{QuasiNewton, SimpleStep, StepContext, StepStrategy};
pub use self::types::{
    DiagCovariance, GradientVec, Jacobian, Misfit, ModelVec, Residuals,
    DEFAULT_FREQUENCY_THIN, EPSILON_MIN,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use love_inversion::inversion::prelude::*;
//
// to import the main inversion surface in a single line.

pub mod prelude {
    pub use super::driver::{invert, InversionOutcome, TerminationReason};
    pub use super::likelihood::{Likelihood, LikelihoodEval};
    pub use super::options::{Damping, ForwardConfig, InversionOptions, StepMode};
    pub use super::prior::PriorBounds;
    pub use super::types::{GradientVec, Misfit, ModelVec};
}
