//! inversion::driver — the outer optimization loop.
//!
//! Purpose
//! -------
//! Run the damped iterative inversion: evaluate the likelihood for the
//! current model, let the active step strategy propose an update, validate it
//! against the hard prior bounds, and accept, retry, or backtrack based on
//! whether the misfit improved. The loop owns the per-strategy step sizes and
//! all scratch vectors; the forward solver is reached only through the
//! [`Likelihood`] boundary.
//!
//! Key behaviors
//! -------------
//! - Strategies alternate by iteration parity: even iterations use the
//!   simple gradient step, odd iterations the quasi-Newton step, each with
//!   its own epsilon. The `mode` preference on [`InversionOptions`] is
//!   retained but does not influence this selection (see `options::StepMode`).
//! - A proposal outside the prior bounds halves the active epsilon and
//!   retries the same attempt; if the epsilon falls below
//!   [`EPSILON_MIN`](crate::inversion::types::EPSILON_MIN) while retrying,
//!   the run terminates with [`TerminationReason::PriorFloor`] rather than
//!   spinning forever.
//! - A proposal that worsens the misfit backtracks: the active epsilon is
//!   halved, the model is restored from the pre-step snapshot and
//!   re-evaluated, and the iteration counter does *not* advance. If the
//!   active epsilon is already below the floor the run terminates with
//!   [`TerminationReason::EpsilonFloor`]; in that case the model keeps the
//!   last evaluated (worse) proposal, matching the behavior of the original
//!   tool.
//! - Step-computation failures propagate as
//!   [`InversionError::StepComputationFailed`]; the driver never continues
//!   on an unspecified proposal.
//!
//! Invariants
//! ----------
//! - The sequence of accepted misfits is non-increasing.
//! - Each strategy's epsilon is non-increasing over the whole run.
//! - Epsilons are halved, never grown; termination is by iteration cap or
//!   one of the two epsilon floors.

use crate::inversion::{
    covariance::initialize_cm,
    errors::{InvResult, InversionError},
    likelihood::Likelihood,
    options::{Damping, ForwardConfig, InversionOptions},
    prior::PriorBounds,
    step::{QuasiNewton, SimpleStep, StepContext, StepStrategy},
    types::{DiagCovariance, Misfit, ModelVec, EPSILON_MIN},
    validation::validate_eval,
};
use crate::model::{
    layer::LayeredModel,
    vector::{flatten, flattened, scatter, ParameterMask},
};
use ndarray::Array1;

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The accepted-iteration counter reached `max_iterations`.
    MaxIterations,
    /// A worsening proposal arrived while the active epsilon was already
    /// below the floor ("Exiting" in the progress log).
    EpsilonFloor { iteration: usize },
    /// Prior-bound retries drove the active epsilon below the floor.
    PriorFloor { iteration: usize },
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::MaxIterations => write!(f, "reached maximum iterations"),
            TerminationReason::EpsilonFloor { iteration } => {
                write!(f, "step size underflow at iteration {iteration}")
            }
            TerminationReason::PriorFloor { iteration } => {
                write!(f, "prior bounds unsatisfiable at iteration {iteration}")
            }
        }
    }
}

/// Summary of a finished inversion run.
///
/// `misfit` is the misfit of the model as left in place by the driver; for a
/// [`TerminationReason::EpsilonFloor`] exit that is the last evaluated
/// proposal, for every other exit it equals the last accepted misfit (or the
/// initial misfit if nothing was accepted).
#[derive(Debug, Clone, PartialEq)]
pub struct InversionOutcome {
    /// Misfit of the model at exit.
    pub misfit: Misfit,
    /// Misfit of the initial model.
    pub initial_misfit: Misfit,
    /// Number of accepted iterations.
    pub iterations: usize,
    /// Number of backtracks (worsening proposals reverted).
    pub backtracks: usize,
    /// Total likelihood evaluations, including the initial one and
    /// backtrack re-evaluations.
    pub evaluations: usize,
    /// Final per-strategy step sizes `[simple, quasi-newton]`.
    pub epsilon: [f64; 2],
    /// Misfit after each accepted iteration, in order. Non-increasing.
    pub accepted_misfits: Vec<Misfit>,
    /// Why the loop stopped.
    pub reason: TerminationReason,
}

/// Invert dispersion data for a layered model in place.
///
/// `model` is mutated toward lower misfit; `reference` supplies the prior
/// mean and must share the model's layer/flag structure. The caller is
/// responsible for persisting the model afterwards.
///
/// Right after the initial evaluation the driver asks the likelihood to save
/// its predictions to `initial_predictions.txt`; a failure there is logged to
/// stderr and otherwise ignored.
///
/// # Errors
/// - [`InversionError::StructureMismatch`] if model and reference disagree.
/// - Any validation error on the likelihood output
///   (`validation::validate_eval`).
/// - [`InversionError::StepComputationFailed`] from either strategy.
/// - Errors propagated from the likelihood itself.
pub fn invert<L: Likelihood>(
    likelihood: &L, data: &mut L::Data, model: &mut LayeredModel, reference: &LayeredModel,
    damping: &Damping, bounds: &PriorBounds, forward: &ForwardConfig,
    options: &InversionOptions,
) -> InvResult<InversionOutcome> {
    if !model.same_structure(reference) {
        return Err(InversionError::StructureMismatch {
            reason: "Working model and reference model must share layers and free flags.",
        });
    }

    let n_free = model.free_parameter_count();
    let steps: [&dyn StepStrategy; 2] = [&SimpleStep, &QuasiNewton];
    let mut epsilon = [options.epsilon; 2];

    // INIT: first evaluation sizes everything else.
    let mut eval = likelihood.evaluate(data, model, reference, damping, forward)?;
    validate_eval(&eval, n_free)?;
    let initial_misfit = eval.misfit;
    let mut like = eval.misfit;
    let mut evaluations = 1usize;
    if options.verbose {
        eprintln!("init: {like:16.9e}");
    }

    // Diagnostic save of the starting predictions; soft failure.
    if let Err(err) = likelihood.save_predictions(data, "initial_predictions.txt") {
        eprintln!("error: failed to save initial predictions: {err}");
    }

    // Prior covariance and prior mean, fixed for the whole run.
    let mut cm: DiagCovariance = Array1::zeros(n_free);
    initialize_cm(model, damping, &mut cm)?;
    let (model_0, _) = flattened(reference);

    // Scratch buffers reused across iterations, fully overwritten each use.
    let mut model_v: ModelVec = Array1::zeros(n_free);
    let mut proposed: ModelVec = Array1::zeros(n_free);
    let mut mask = ParameterMask::with_capacity(n_free);

    let mut iterations = 0usize;
    let mut backtracks = 0usize;
    let mut accepted_misfits = Vec::new();

    let reason = 'outer: loop {
        let m = iterations % 2;

        // STEP_ATTEMPT / VALIDATE: shrink epsilon until the proposal is
        // admissible, bailing out if the step size underflows.
        loop {
            flatten(model, &mut model_v, &mut mask)?;
            let ctx = StepContext {
                data_covariance: &eval.data_covariance,
                model_covariance: &cm,
                residuals: &eval.residuals,
                jacobian: &eval.jacobian,
                gradient: &eval.gradient,
                mask: &mask,
                current: &model_v,
                prior_mean: &model_0,
            };
            steps[m].compute_step(epsilon[m], &ctx, &mut proposed)?;
            if bounds.validate(&proposed, &mask)? {
                break;
            }
            epsilon[m] *= 0.5;
            if epsilon[m] < EPSILON_MIN {
                break 'outer TerminationReason::PriorFloor { iteration: iterations };
            }
        }

        // EVALUATE the proposal in place.
        scatter(&proposed, model)?;
        let last_like = like;
        eval = likelihood.evaluate(data, model, reference, damping, forward)?;
        validate_eval(&eval, n_free)?;
        evaluations += 1;
        like = eval.misfit;

        if like > last_like {
            if epsilon[m] < EPSILON_MIN {
                if options.verbose {
                    eprintln!("{iterations:4}: Exiting");
                }
                break TerminationReason::EpsilonFloor { iteration: iterations };
            }

            // BACKTRACK: shrink, restore the pre-step model, re-evaluate at
            // the restored state, and retry this iteration.
            if options.verbose {
                eprintln!("{iterations:4}: Backtracking");
            }
            backtracks += 1;
            epsilon[m] *= 0.5;
            scatter(&model_v, model)?;
            eval = likelihood.evaluate(data, model, reference, damping, forward)?;
            validate_eval(&eval, n_free)?;
            evaluations += 1;
            like = eval.misfit;
        } else {
            // ACCEPT.
            if options.verbose {
                eprintln!("{:4}: {:16.9e} {:16.9e}", iterations, like, epsilon[m]);
            }
            accepted_misfits.push(like);
            iterations += 1;
        }

        if iterations >= options.max_iterations {
            break TerminationReason::MaxIterations;
        }
    };

    Ok(InversionOutcome {
        misfit: like,
        initial_misfit,
        iterations,
        backtracks,
        evaluations,
        epsilon,
        accepted_misfits,
        reason,
    })
}
