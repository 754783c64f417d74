//! love_inversion — damped gradient inversion of Love-wave dispersion data.
//!
//! Purpose
//! -------
//! Serve as the crate root for the inversion core: the layered-earth model
//! parameterization ([`model`]) and the optimization loop that fits it to
//! observed dispersion ([`inversion`]). The forward solver, data file
//! formats, and any command-line surface live in downstream crates; they
//! reach this crate through the [`inversion::Likelihood`] trait.
//!
//! Key behaviors
//! -------------
//! - Represent a stack of layers over a halfspace, each carrying density,
//!   shear velocity, radial anisotropy, and a Vp/Vs ratio, with per-parameter
//!   free/fixed flags ([`model::LayeredModel`]).
//! - Flatten free parameters into dense vectors in a canonical order and
//!   scatter optimizer proposals back, never partially
//!   ([`model::flatten`] / [`model::scatter`]).
//! - Run the damped alternating-strategy inversion loop with hard prior
//!   bounds, backtracking, and per-strategy step sizes
//!   ([`inversion::invert`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - All vectors and matrices crossing the [`inversion::Likelihood`] boundary
//!   follow the canonical free-parameter ordering documented in
//!   [`model::vector`].
//! - Physical parameter values are finite and strictly positive from
//!   construction onward; validation happens at the edges, core loops assume
//!   clean inputs.
//! - Errors are reported through [`model::ModelError`] and
//!   [`inversion::InversionError`]; the crate never intentionally panics or
//!   uses `unsafe`.
//!
//! Conventions
//! -----------
//! - Velocities and densities are in SI units (m/s, kg/m³); anisotropy and
//!   Vp/Vs are dimensionless ratios.
//! - Dense numerics use [`ndarray`]; the quasi-Newton normal system is
//!   solved with [`nalgebra`].
//!
//! Downstream usage
//! ----------------
//! - Implement [`inversion::Likelihood`] around a forward dispersion solver,
//!   build a [`model::LayeredModel`] plus a reference copy, and call
//!   [`inversion::invert`]. See the crate's integration tests for a worked
//!   linear-forward example.
//!
//! Testing notes
//! -------------
//! - Unit tests live in `#[cfg(test)]` modules next to the code they cover;
//!   `tests/integration_inversion.rs` drives the whole loop against a linear
//!   forward operator with a closed-form optimum.

pub mod inversion;
pub mod model;

pub use crate::inversion::{
    invert, Damping, ForwardConfig, InversionOptions, InversionOutcome, Likelihood,
    LikelihoodEval, PriorBounds, StepMode, TerminationReason,
};
pub use crate::model::{FreeFlags, Layer, LayeredModel, ParameterKind};
