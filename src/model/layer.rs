//! model::layer — layered earth model and its per-layer parameterization.
//!
//! Purpose
//! -------
//! Define the structured model mutated in place by the inversion driver: a
//! stack of layers, each carrying the four physical quantities the likelihood
//! differentiates against (density ρ, shear velocity Vs, the anisotropy ratio
//! ξ, and Vp/Vs), plus per-layer flags marking which of those quantities are
//! free (optimized) versus held fixed.
//!
//! Key behaviors
//! -------------
//! - [`ParameterKind`] fixes the canonical ordering of the four quantities;
//!   every flattened vector, mask, damping lookup, and prior-bound lookup in
//!   this crate follows that order.
//! - [`Layer::new`] and [`LayeredModel::new`] validate their inputs once so
//!   downstream code can assume finite, strictly positive parameters and a
//!   consistent flag array.
//! - [`LayeredModel::free_parameter_count`] is the single source of truth for
//!   the dense-vector length shared with the Jacobian column count.
//!
//! Conventions
//! -----------
//! - Units follow the original data: densities in kg/m³, velocities in m/s,
//!   ξ and Vp/Vs dimensionless.
//! - Flattening is layer-major, kind-minor: layer 0 {ρ, Vs, ξ, Vp/Vs}, then
//!   layer 1, and so on, skipping fixed slots.

use crate::model::errors::{ModelError, ModelResult};

/// The four physical quantities carried by each layer, in canonical order.
///
/// The discriminant doubles as the index into damping and prior-bound
/// arrays, so the order here is load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    Density = 0,
    Vs = 1,
    Xi = 2,
    VpVs = 3,
}

impl ParameterKind {
    /// Number of distinct parameter kinds.
    pub const COUNT: usize = 4;

    /// All kinds in canonical (flattening) order.
    pub const ALL: [ParameterKind; 4] =
        [ParameterKind::Density, ParameterKind::Vs, ParameterKind::Xi, ParameterKind::VpVs];

    /// Canonical index of this kind (0..=3).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable name used in error messages and logs.
    pub fn name(self) -> &'static str {
        match self {
            ParameterKind::Density => "density",
            ParameterKind::Vs => "vs",
            ParameterKind::Xi => "xi",
            ParameterKind::VpVs => "vp/vs",
        }
    }
}

impl std::fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single layer of the earth model.
///
/// All four values must be finite and strictly positive; use [`Layer::new`]
/// to construct a validated instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    pub density: f64,
    pub vs: f64,
    pub xi: f64,
    pub vpvs: f64,
}

impl Layer {
    /// Construct a validated layer.
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidParameterValue`] if any quantity is
    /// non-finite or not strictly positive. The reported `layer` index is 0;
    /// [`LayeredModel::new`] re-checks with the real index.
    pub fn new(density: f64, vs: f64, xi: f64, vpvs: f64) -> ModelResult<Self> {
        let layer = Layer { density, vs, xi, vpvs };
        layer.check(0)?;
        Ok(layer)
    }

    /// Value of the given quantity.
    pub fn value(&self, kind: ParameterKind) -> f64 {
        match kind {
            ParameterKind::Density => self.density,
            ParameterKind::Vs => self.vs,
            ParameterKind::Xi => self.xi,
            ParameterKind::VpVs => self.vpvs,
        }
    }

    /// Overwrite the given quantity.
    pub fn set(&mut self, kind: ParameterKind, value: f64) {
        match kind {
            ParameterKind::Density => self.density = value,
            ParameterKind::Vs => self.vs = value,
            ParameterKind::Xi => self.xi = value,
            ParameterKind::VpVs => self.vpvs = value,
        }
    }

    fn check(&self, layer: usize) -> ModelResult<()> {
        for kind in ParameterKind::ALL {
            let value = self.value(kind);
            if !value.is_finite() {
                return Err(ModelError::InvalidParameterValue {
                    layer,
                    quantity: kind.name(),
                    value,
                    reason: "Layer parameters must be finite.",
                });
            }
            if value <= 0.0 {
                return Err(ModelError::InvalidParameterValue {
                    layer,
                    quantity: kind.name(),
                    value,
                    reason: "Layer parameters must be strictly positive.",
                });
            }
        }
        Ok(())
    }
}

/// Per-layer markers for which quantities are optimized.
///
/// A `true` flag means the corresponding quantity occupies a slot in the
/// dense free-parameter vector; `false` means the slot is skipped and its
/// value is never touched by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeFlags {
    pub density: bool,
    pub vs: bool,
    pub xi: bool,
    pub vpvs: bool,
}

impl FreeFlags {
    /// All four quantities free.
    pub fn all() -> Self {
        FreeFlags { density: true, vs: true, xi: true, vpvs: true }
    }

    /// All four quantities fixed.
    pub fn none() -> Self {
        FreeFlags { density: false, vs: false, xi: false, vpvs: false }
    }

    /// Whether the given quantity is free in this layer.
    pub fn is_free(&self, kind: ParameterKind) -> bool {
        match kind {
            ParameterKind::Density => self.density,
            ParameterKind::Vs => self.vs,
            ParameterKind::Xi => self.xi,
            ParameterKind::VpVs => self.vpvs,
        }
    }

    /// Number of free quantities in this layer.
    pub fn count(&self) -> usize {
        ParameterKind::ALL.iter().filter(|&&k| self.is_free(k)).count()
    }
}

impl Default for FreeFlags {
    fn default() -> Self {
        FreeFlags::all()
    }
}

/// A layered earth model plus its free/fixed parameter structure.
///
/// The inversion driver owns one of these mutably for the duration of a run
/// and writes accepted proposals back into it in place. The flag structure is
/// immutable for the lifetime of the model; only parameter values change.
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredModel {
    layers: Vec<Layer>,
    free: Vec<FreeFlags>,
}

impl LayeredModel {
    /// Construct a validated model from layers and matching free flags.
    ///
    /// # Errors
    /// - [`ModelError::EmptyModel`] if `layers` is empty.
    /// - [`ModelError::LayerCountMismatch`] if `free.len() != layers.len()`.
    /// - [`ModelError::InvalidParameterValue`] if any layer fails validation.
    pub fn new(layers: Vec<Layer>, free: Vec<FreeFlags>) -> ModelResult<Self> {
        if layers.is_empty() {
            return Err(ModelError::EmptyModel);
        }
        if free.len() != layers.len() {
            return Err(ModelError::LayerCountMismatch { layers: layers.len(), flags: free.len() });
        }
        for (i, layer) in layers.iter().enumerate() {
            layer.check(i)?;
        }
        Ok(LayeredModel { layers, free })
    }

    /// Construct a model with every parameter free.
    pub fn fully_free(layers: Vec<Layer>) -> ModelResult<Self> {
        let flags = vec![FreeFlags::all(); layers.len()];
        LayeredModel::new(layers, flags)
    }

    /// Number of layers.
    pub fn n_layers(&self) -> usize {
        self.layers.len()
    }

    /// Borrow a layer.
    pub fn layer(&self, index: usize) -> &Layer {
        &self.layers[index]
    }

    /// Free flags of a layer.
    pub fn flags(&self, index: usize) -> &FreeFlags {
        &self.free[index]
    }

    /// Total number of free parameter slots across all layers.
    ///
    /// This equals the dense vector length, the mask length, and the
    /// Jacobian column count produced by the forward solver.
    pub fn free_parameter_count(&self) -> usize {
        self.free.iter().map(FreeFlags::count).sum()
    }

    /// Whether `other` has the same layer count and free structure.
    ///
    /// The driver requires the working model and the reference model to
    /// share structure so their dense vectors align slot for slot.
    pub fn same_structure(&self, other: &LayeredModel) -> bool {
        self.layers.len() == other.layers.len() && self.free == other.free
    }

    /// Visit every free slot in canonical order.
    pub(crate) fn for_each_free(&self, mut f: impl FnMut(usize, ParameterKind, f64)) {
        for (i, (layer, flags)) in self.layers.iter().zip(self.free.iter()).enumerate() {
            for kind in ParameterKind::ALL {
                if flags.is_free(kind) {
                    f(i, kind, layer.value(kind));
                }
            }
        }
    }

    /// Overwrite every free slot in canonical order from `next`.
    ///
    /// `next` is called once per free slot and must return a finite value;
    /// finiteness is checked by the caller ([`crate::model::vector::scatter`]).
    pub(crate) fn assign_free(&mut self, mut next: impl FnMut() -> f64) {
        for (layer, flags) in self.layers.iter_mut().zip(self.free.iter()) {
            for kind in ParameterKind::ALL {
                if flags.is_free(kind) {
                    layer.set(kind, next());
                }
            }
        }
    }
}
