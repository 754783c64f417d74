//! inversion::types — shared numeric aliases and loop constants.
//!
//! Centralize the container types used across the inversion core so the rest
//! of the code stays agnostic to `ndarray` generics. All vectors and matrices
//! are dense `f64` containers; diagonal covariance matrices are stored as
//! their diagonals.

use ndarray::{Array1, Array2};

/// Dense free-parameter vector (`model_v`, `model_0`, proposals).
///
/// Length equals the model's free-parameter count and the Jacobian column
/// count.
pub type ModelVec = Array1<f64>;

/// Gradient of the misfit with respect to the free parameters.
pub type GradientVec = Array1<f64>;

/// Jacobian of predictions with respect to free parameters,
/// shape (n_observations × n_free_parameters). Recomputed every likelihood
/// evaluation, never cached across model changes.
pub type Jacobian = Array2<f64>;

/// Observed-minus-predicted dispersion values, one per observation.
pub type Residuals = Array1<f64>;

/// Diagonal covariance matrix stored as its diagonal.
///
/// Used both for the data covariance `Cd` (length = n observations) and the
/// prior model covariance `Cm` (length = n free parameters, entries are
/// variances).
pub type DiagCovariance = Array1<f64>;

/// Scalar misfit (negative log-likelihood) minimized by the driver.
pub type Misfit = f64;

/// Step-size floor. Once a strategy's epsilon is halved below this the
/// driver terminates rather than creeping toward denormals.
pub const EPSILON_MIN: f64 = 1.0e-9;

/// Default frequency thinning passed to the forward solver.
pub const DEFAULT_FREQUENCY_THIN: f64 = 1.0e-3;
