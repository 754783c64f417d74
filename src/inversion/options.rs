//! inversion::options — validated configuration for the inversion core.
//!
//! Purpose
//! -------
//! Gather the knobs the out-of-scope CLI layer hands to the core: prior
//! damping standard deviations, the fixed forward-solver settings, and the
//! driver's own options (step size, iteration cap, strategy preference,
//! verbosity). Every type validates on construction so the driver can assume
//! internally consistent values.
//!
//! Conventions
//! -----------
//! - Damping values are prior *standard deviations* per physical quantity;
//!   `inversion::covariance` squares them into variances. A zero damping
//!   disables the prior pull for that quantity.
//! - Defaults reproduce the original tool's defaults (order 5 spectral
//!   elements, scale 1e-4, epsilon 1.0, five iterations).

use crate::inversion::{
    errors::{InvResult, InversionError},
    types::DEFAULT_FREQUENCY_THIN,
    validation::{verify_epsilon, verify_max_iterations, verify_order, verify_sigma},
};
use crate::model::layer::ParameterKind;
use std::str::FromStr;

/// Prior standard deviations per physical quantity.
///
/// Regularization strength for the least-squares prior term: larger sigma
/// means a weaker pull toward the reference model, zero disables the pull
/// entirely for that quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Damping {
    pub density: f64,
    pub vs: f64,
    pub xi: f64,
    pub vpvs: f64,
}

impl Damping {
    /// Construct validated damping values.
    ///
    /// # Errors
    /// Returns [`InversionError::InvalidDamping`] if any value is negative
    /// or non-finite.
    pub fn new(density: f64, vs: f64, xi: f64, vpvs: f64) -> InvResult<Self> {
        verify_sigma("density", density)?;
        verify_sigma("vs", vs)?;
        verify_sigma("xi", xi)?;
        verify_sigma("vp/vs", vpvs)?;
        Ok(Damping { density, vs, xi, vpvs })
    }

    /// No regularization on any quantity.
    pub fn free() -> Self {
        Damping { density: 0.0, vs: 0.0, xi: 0.0, vpvs: 0.0 }
    }

    /// Standard deviation for the given quantity.
    pub fn sigma(&self, kind: ParameterKind) -> f64 {
        match kind {
            ParameterKind::Density => self.density,
            ParameterKind::Vs => self.vs,
            ParameterKind::Xi => self.xi,
            ParameterKind::VpVs => self.vpvs,
        }
    }
}

impl Default for Damping {
    fn default() -> Self {
        Damping::free()
    }
}

/// Preferred step strategy.
///
/// The driver currently alternates the simple and quasi-Newton strategies by
/// iteration parity regardless of this preference; the knob is retained
/// because the surrounding tooling exposes it, and tests pin that it does not
/// alter the trajectory. Parsing is case-insensitive, like other name-valued
/// options in this codebase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
    Simple,
    QuasiNewton,
}

impl FromStr for StepMode {
    type Err = InversionError;

    /// Parse a step-mode choice from a string (case-insensitive).
    ///
    /// Accepts `"simple"`, `"quasinewton"`, and `"quasi-newton"` in any case.
    ///
    /// # Errors
    /// Returns [`InversionError::InvalidStepMode`] for anything else.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(StepMode::Simple),
            "quasinewton" | "quasi-newton" => Ok(StepMode::QuasiNewton),
            _ => Err(InversionError::InvalidStepMode {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'simple' or 'quasi-newton'.",
            }),
        }
    }
}

/// Driver-level configuration.
///
/// Fields:
/// - `epsilon` — initial step size shared by both strategy slots; halved
///   independently per slot on rejection/backtrack, never increased.
/// - `max_iterations` — cap on *accepted* iterations.
/// - `mode` — retained strategy preference (see [`StepMode`]).
/// - `verbose` — when `true`, progress lines go to stderr each iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InversionOptions {
    pub epsilon: f64,
    pub max_iterations: usize,
    pub mode: StepMode,
    pub verbose: bool,
}

impl InversionOptions {
    /// Construct validated driver options.
    ///
    /// # Errors
    /// - [`InversionError::InvalidEpsilon`] if `epsilon` is non-finite or
    ///   not strictly positive.
    /// - [`InversionError::InvalidMaxIterations`] if `max_iterations == 0`.
    pub fn new(
        epsilon: f64, max_iterations: usize, mode: StepMode, verbose: bool,
    ) -> InvResult<Self> {
        verify_epsilon(epsilon)?;
        verify_max_iterations(max_iterations)?;
        Ok(InversionOptions { epsilon, max_iterations, mode, verbose })
    }
}

impl Default for InversionOptions {
    fn default() -> Self {
        InversionOptions {
            epsilon: 1.0,
            max_iterations: 5,
            mode: StepMode::Simple,
            verbose: false,
        }
    }
}

/// Fixed forward-solver settings, passed through to every likelihood call.
///
/// These never change during a run; the likelihood contract requires its
/// output to be a pure function of `(model, data)` plus this configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForwardConfig {
    /// Mode-selection threshold handed to the spectral solver. Any finite
    /// value, including negative.
    pub threshold: f64,
    /// Spectral element order.
    pub order: usize,
    /// High-order refinement order.
    pub high_order: usize,
    /// Boundary element order.
    pub boundary_order: usize,
    /// Laguerre scaling of the semi-infinite bottom element.
    pub scale: f64,
    /// Target-frequency thinning interval in Hz.
    pub frequency_thin: f64,
    /// When `true`, run without data (prior/posterior exploration mode).
    pub posterior: bool,
}

impl ForwardConfig {
    /// Construct validated forward-solver settings.
    ///
    /// # Errors
    /// - [`InversionError::InvalidThreshold`] if `threshold` is non-finite.
    /// - [`InversionError::InvalidOrder`] if any order is zero.
    /// - [`InversionError::InvalidScale`] if `scale` is non-finite or ≤ 0.
    /// - [`InversionError::InvalidFrequencyThin`] if `frequency_thin` is
    ///   non-finite or ≤ 0.
    pub fn new(
        threshold: f64, order: usize, high_order: usize, boundary_order: usize, scale: f64,
        frequency_thin: f64, posterior: bool,
    ) -> InvResult<Self> {
        if !threshold.is_finite() {
            return Err(InversionError::InvalidThreshold {
                value: threshold,
                reason: "Threshold must be finite.",
            });
        }
        verify_order("order", order)?;
        verify_order("high order", high_order)?;
        verify_order("boundary order", boundary_order)?;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(InversionError::InvalidScale {
                value: scale,
                reason: "Scale must be finite and positive.",
            });
        }
        if !frequency_thin.is_finite() || frequency_thin <= 0.0 {
            return Err(InversionError::InvalidFrequencyThin {
                value: frequency_thin,
                reason: "Frequency thinning must be finite and positive.",
            });
        }
        Ok(ForwardConfig {
            threshold,
            order,
            high_order,
            boundary_order,
            scale,
            frequency_thin,
            posterior,
        })
    }
}

impl Default for ForwardConfig {
    fn default() -> Self {
        ForwardConfig {
            threshold: 0.0,
            order: 5,
            high_order: 5,
            boundary_order: 5,
            scale: 1.0e-4,
            frequency_thin: DEFAULT_FREQUENCY_THIN,
            posterior: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Constructor validation for Damping, InversionOptions, ForwardConfig.
    // - Case-insensitive StepMode parsing and its error message.
    //
    // They intentionally DO NOT cover:
    // - How the driver consumes these options (driver tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Damping accepts zero (prior disabled) and positive sigmas, and maps
    // kinds to the right fields.
    fn damping_accepts_valid_sigmas() {
        let damping = Damping::new(0.5e3, 0.5e3, 0.05, 0.0).expect("damping should be valid");
        assert_eq!(damping.sigma(ParameterKind::Density), 0.5e3);
        assert_eq!(damping.sigma(ParameterKind::Xi), 0.05);
        assert_eq!(damping.sigma(ParameterKind::VpVs), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Negative or non-finite sigmas are rejected with the quantity named.
    fn damping_rejects_invalid_sigmas() {
        assert!(matches!(
            Damping::new(-1.0, 0.0, 0.0, 0.0),
            Err(InversionError::InvalidDamping { quantity: "density", .. })
        ));
        assert!(matches!(
            Damping::new(0.0, f64::INFINITY, 0.0, 0.0),
            Err(InversionError::InvalidDamping { quantity: "vs", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // StepMode parsing is case-insensitive and accepts the hyphenated
    // quasi-Newton spelling; unknown names fail.
    fn step_mode_from_str() {
        assert_eq!("Simple".parse::<StepMode>().unwrap(), StepMode::Simple);
        assert_eq!("QUASINEWTON".parse::<StepMode>().unwrap(), StepMode::QuasiNewton);
        assert_eq!("quasi-newton".parse::<StepMode>().unwrap(), StepMode::QuasiNewton);
        assert!(matches!(
            "newton".parse::<StepMode>(),
            Err(InversionError::InvalidStepMode { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // InversionOptions rejects non-positive epsilon and a zero iteration cap.
    fn inversion_options_validation() {
        assert!(matches!(
            InversionOptions::new(0.0, 5, StepMode::Simple, false),
            Err(InversionError::InvalidEpsilon { .. })
        ));
        assert!(matches!(
            InversionOptions::new(1.0, 0, StepMode::Simple, false),
            Err(InversionError::InvalidMaxIterations { .. })
        ));
        let opts = InversionOptions::new(0.5, 3, StepMode::QuasiNewton, true)
            .expect("options should be valid");
        assert_eq!(opts.epsilon, 0.5);
        assert_eq!(opts.max_iterations, 3);
    }

    #[test]
    // Purpose
    // -------
    // ForwardConfig rejects zero orders and non-positive scale/thinning, and
    // its defaults reproduce the original tool's defaults.
    fn forward_config_validation_and_defaults() {
        assert!(matches!(
            ForwardConfig::new(0.0, 0, 5, 5, 1.0e-4, 1.0e-3, false),
            Err(InversionError::InvalidOrder { name: "order", .. })
        ));
        assert!(matches!(
            ForwardConfig::new(0.0, 5, 5, 5, 0.0, 1.0e-3, false),
            Err(InversionError::InvalidScale { .. })
        ));
        assert!(matches!(
            ForwardConfig::new(f64::NAN, 5, 5, 5, 1.0e-4, 1.0e-3, false),
            Err(InversionError::InvalidThreshold { .. })
        ));

        let config = ForwardConfig::default();
        assert_eq!(config.order, 5);
        assert_eq!(config.scale, 1.0e-4);
        assert_eq!(config.frequency_thin, 1.0e-3);
        assert!(!config.posterior);
    }
}
