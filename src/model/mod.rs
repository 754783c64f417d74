//! model — layered earth model parameterization.
//!
//! Purpose
//! -------
//! Hold the structured representation the inversion mutates in place
//! ([`LayeredModel`]) and the dense flatten/scatter pair that bridges it to
//! the optimizer's vector space ([`vector::flatten`] / [`vector::scatter`]).
//! Model file I/O (loading reference models, persisting results) lives with
//! the caller; this module only defines the in-memory shape and its
//! invariants.
//!
//! Downstream usage
//! ----------------
//! - `inversion::driver` flattens the model before every step attempt and
//!   scatters accepted (or restored) vectors back.
//! - `inversion::covariance` and `inversion::prior` look up physical
//!   quantities via [`ParameterKind`] and the rebuilt mask.

pub mod errors;
pub mod layer;
pub mod vector;

pub use self::errors::{ModelError, ModelResult};
pub use self::layer::{FreeFlags, Layer, LayeredModel, ParameterKind};
pub use self::vector::{flatten, flattened, scatter, ParameterMask};
