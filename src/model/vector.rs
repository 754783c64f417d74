//! model::vector — flatten/scatter between structured models and dense vectors.
//!
//! Purpose
//! -------
//! Provide the pair of inverse copies the inversion loop leans on every
//! iteration: [`flatten`] packs the free parameters of a [`LayeredModel`]
//! into a dense `Array1<f64>` (rebuilding the kind mask as it goes), and
//! [`scatter`] writes such a vector back into the model, leaving fixed slots
//! untouched.
//!
//! Invariants & assumptions
//! ------------------------
//! - Ordering is canonical: layer-major, kind-minor, skipping fixed slots.
//!   The mask records the [`ParameterKind`] of each free slot in that order.
//! - `flatten` followed by `scatter` is a bit-for-bit no-op on every free
//!   parameter; fixed parameters are never read or written.
//! - The dense vector length always equals the model's free-parameter count,
//!   which in turn equals the forward solver's Jacobian column count.
//!
//! Conventions
//! -----------
//! - [`flatten`] reuses caller-owned buffers so the driver can avoid
//!   per-iteration allocation; [`flattened`] is the allocating variant used
//!   once at initialization.

use crate::model::{
    errors::{ModelError, ModelResult},
    layer::{LayeredModel, ParameterKind},
};
use ndarray::Array1;

/// Kind tags for the free slots of a flattened model, in canonical order.
pub type ParameterMask = Vec<ParameterKind>;

/// Pack the free parameters of `model` into `vector`, rebuilding `mask`.
///
/// `vector` must already have length `model.free_parameter_count()`; the
/// driver sizes its buffers once from the initial Jacobian. `mask` is cleared
/// and refilled with one [`ParameterKind`] per free slot.
///
/// # Errors
/// Returns [`ModelError::VectorLengthMismatch`] if `vector` has the wrong
/// length. The vector and mask are left unspecified on error.
pub fn flatten(
    model: &LayeredModel, vector: &mut Array1<f64>, mask: &mut ParameterMask,
) -> ModelResult<()> {
    let expected = model.free_parameter_count();
    if vector.len() != expected {
        return Err(ModelError::VectorLengthMismatch { expected, found: vector.len() });
    }
    mask.clear();
    mask.reserve(expected);
    let mut slot = 0;
    model.for_each_free(|_, kind, value| {
        vector[slot] = value;
        mask.push(kind);
        slot += 1;
    });
    Ok(())
}

/// Allocating variant of [`flatten`], used to capture the prior mean vector.
pub fn flattened(model: &LayeredModel) -> (Array1<f64>, ParameterMask) {
    let n = model.free_parameter_count();
    let mut vector = Array1::zeros(n);
    let mut mask = ParameterMask::with_capacity(n);
    // Length matches by construction, so this cannot fail.
    let _ = flatten(model, &mut vector, &mut mask);
    (vector, mask)
}

/// Write a dense free-parameter vector back into `model`.
///
/// Fixed slots are untouched. The model is only mutated once the whole
/// vector has been checked, so a failing call leaves it unchanged.
///
/// # Errors
/// - [`ModelError::VectorLengthMismatch`] if `vector` does not match the
///   model's free-parameter count.
/// - [`ModelError::NonFiniteVectorEntry`] if any entry is NaN or infinite.
pub fn scatter(vector: &Array1<f64>, model: &mut LayeredModel) -> ModelResult<()> {
    let expected = model.free_parameter_count();
    if vector.len() != expected {
        return Err(ModelError::VectorLengthMismatch { expected, found: vector.len() });
    }
    for (index, &value) in vector.iter().enumerate() {
        if !value.is_finite() {
            return Err(ModelError::NonFiniteVectorEntry { index, value });
        }
    }
    let mut slot = 0;
    model.assign_free(|| {
        let value = vector[slot];
        slot += 1;
        value
    });
    Ok(())
}
