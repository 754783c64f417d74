//! inversion::prior — hard physical bounds on proposed models.
//!
//! Purpose
//! -------
//! Reject proposed parameter vectors that leave the physically admissible
//! region before they ever reach the forward solver. Bounds are per physical
//! quantity, constant for a whole run, and checked against every free slot
//! using the kind mask rebuilt at each step attempt.
//!
//! Conventions
//! -----------
//! - Bounds are inclusive on both ends.
//! - Validation is total: it never mutates anything, so a rejected proposal
//!   leaves the live model byte-identical to its pre-attempt state.
//! - Defaults are the original tool's hard-coded ranges: density
//!   [100, 8000] kg/m³, Vs [500, 10000] m/s, ξ [0.5, 1.5], Vp/Vs [1.0, 2.5].

use crate::inversion::{
    errors::{InvResult, InversionError},
    types::ModelVec,
};
use crate::model::{layer::ParameterKind, vector::ParameterMask};

/// Per-quantity inclusive min/max bounds, indexed by [`ParameterKind`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorBounds {
    min: [f64; ParameterKind::COUNT],
    max: [f64; ParameterKind::COUNT],
}

impl PriorBounds {
    /// Construct validated bounds.
    ///
    /// # Errors
    /// Returns [`InversionError::InvalidPriorBound`] if any pair is
    /// non-finite or has `min > max`.
    pub fn new(min: [f64; ParameterKind::COUNT], max: [f64; ParameterKind::COUNT]) -> InvResult<Self> {
        for kind in ParameterKind::ALL {
            let i = kind.index();
            if !min[i].is_finite() || !max[i].is_finite() {
                return Err(InversionError::InvalidPriorBound {
                    quantity: kind.name(),
                    min: min[i],
                    max: max[i],
                    reason: "Bounds must be finite.",
                });
            }
            if min[i] > max[i] {
                return Err(InversionError::InvalidPriorBound {
                    quantity: kind.name(),
                    min: min[i],
                    max: max[i],
                    reason: "Lower bound must not exceed upper bound.",
                });
            }
        }
        Ok(PriorBounds { min, max })
    }

    /// Lower bound for a quantity.
    pub fn min(&self, kind: ParameterKind) -> f64 {
        self.min[kind.index()]
    }

    /// Upper bound for a quantity.
    pub fn max(&self, kind: ParameterKind) -> f64 {
        self.max[kind.index()]
    }

    /// Whether a single value is admissible for its quantity.
    pub fn contains(&self, kind: ParameterKind, value: f64) -> bool {
        value >= self.min(kind) && value <= self.max(kind)
    }

    /// Check a proposed vector against the bounds, slot by slot.
    ///
    /// Returns `Ok(false)` on the first violation (NaN entries violate every
    /// bound and are rejected here too). Never mutates anything.
    ///
    /// # Errors
    /// Returns [`InversionError::MaskLengthMismatch`] if `proposed` and
    /// `mask` disagree in length.
    pub fn validate(&self, proposed: &ModelVec, mask: &ParameterMask) -> InvResult<bool> {
        if proposed.len() != mask.len() {
            return Err(InversionError::MaskLengthMismatch {
                expected: proposed.len(),
                found: mask.len(),
            });
        }
        for (&value, &kind) in proposed.iter().zip(mask.iter()) {
            if !self.contains(kind, value) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Default for PriorBounds {
    fn default() -> Self {
        PriorBounds {
            min: [0.1e3, 0.5e3, 0.5, 1.0],
            max: [8.0e3, 10.0e3, 1.5, 2.5],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Default bound values and inclusive endpoints.
    // - First-violation rejection regardless of other entries.
    // - Constructor validation and mask-length errors.
    // -------------------------------------------------------------------------

    fn single_layer_mask() -> ParameterMask {
        vec![ParameterKind::Density, ParameterKind::Vs, ParameterKind::Xi, ParameterKind::VpVs]
    }

    #[test]
    // Purpose
    // -------
    // A physically sensible vector passes under the default bounds, and the
    // endpoints themselves are admissible.
    fn default_bounds_accept_physical_models() {
        let bounds = PriorBounds::default();
        let mask = single_layer_mask();
        let proposed = Array1::from(vec![2700.0, 3500.0, 1.0, 1.75]);
        assert_eq!(bounds.validate(&proposed, &mask).unwrap(), true);

        // Inclusive endpoints.
        let edges = Array1::from(vec![0.1e3, 10.0e3, 0.5, 2.5]);
        assert_eq!(bounds.validate(&edges, &mask).unwrap(), true);
    }

    #[test]
    // Purpose
    // -------
    // A Vs of -100 (below the 500 m/s floor) is rejected no matter what the
    // other parameters look like.
    fn negative_vs_is_rejected() {
        let bounds = PriorBounds::default();
        let mask = single_layer_mask();
        let proposed = Array1::from(vec![2700.0, -100.0, 1.0, 1.75]);
        assert_eq!(bounds.validate(&proposed, &mask).unwrap(), false);
    }

    #[test]
    // Purpose
    // -------
    // NaN entries violate the bounds rather than slipping through the
    // comparisons.
    fn nan_is_rejected() {
        let bounds = PriorBounds::default();
        let mask = single_layer_mask();
        let proposed = Array1::from(vec![2700.0, f64::NAN, 1.0, 1.75]);
        assert_eq!(bounds.validate(&proposed, &mask).unwrap(), false);
    }

    #[test]
    // Purpose
    // -------
    // Constructor rejects inverted and non-finite pairs; validate rejects a
    // mask that does not match the vector.
    fn construction_and_mask_errors() {
        assert!(matches!(
            PriorBounds::new([1.0, 2.0, 3.0, 4.0], [0.5, 2.0, 3.0, 4.0]),
            Err(InversionError::InvalidPriorBound { quantity: "density", .. })
        ));
        assert!(matches!(
            PriorBounds::new([1.0, 2.0, 3.0, f64::NAN], [2.0, 3.0, 4.0, 5.0]),
            Err(InversionError::InvalidPriorBound { quantity: "vp/vs", .. })
        ));

        let bounds = PriorBounds::default();
        let proposed = Array1::from(vec![2700.0, 3500.0]);
        let mask = single_layer_mask();
        assert!(matches!(
            bounds.validate(&proposed, &mask),
            Err(InversionError::MaskLengthMismatch { expected: 2, found: 4 })
        ));
    }
}
