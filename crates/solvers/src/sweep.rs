//! Sweep cores and the per-iteration sweep.
//!
//! A sweep walks every time step of the current iteration node by node. For
//! each transition `m -> m + 1` it hands a [`NodeStep`] to a [`SweepCore`],
//! which returns the corrected value `u_{m+1}^{k+1}`. After a time step is
//! done, every node gets its collocation residual and, if the problem knows
//! its exact solution, its error.
//!
//! # Integrals
//!
//! With `classic` sweeps the quadrature term `ΔI` of every node integrates the
//! previous iteration's right-hand sides. Otherwise it integrates the current
//! iteration's right-hand sides at nodes already updated in this sweep and the
//! previous iteration's at the remaining ones.
//!
//! # First iteration
//!
//! Without a previous iteration, the interval's initial value stands in for
//! the previous iteration at every node.

mod error;
mod explicit;
mod implicit;
mod semi_implicit;


pub use error::SweepError;
pub use explicit::Explicit;
pub use implicit::Implicit;
pub use semi_implicit::SemiImplicit;

use pint_core::{DirectImplicitStep, ImplicitEquation, Problem, RhsPart, SpatialValue, Splitting};
use pint_quadrature::SdcQuadrature;
use tracing::trace;

use crate::{
    newton,
    state::{NodeState, SolverState, StateError, TimeStepState},
};

/// Everything a core needs to correct the value at node `m + 1`.
///
/// Superscript `k` denotes the previous iteration and `k + 1` the current one.
#[derive(Debug, Clone, Copy)]
pub struct NodeStep<'a, V> {
    /// `t_m`.
    pub previous_time: f64,

    /// `t_{m+1}`.
    pub time: f64,

    /// `t_{m+1} - t_m`.
    pub delta_tau: f64,

    /// Width of the enclosing time step.
    pub delta_step: f64,

    /// `u_m^{k+1}`.
    pub previous: &'a V,

    /// `F(t_m, u_m^{k+1})`.
    pub previous_rhs: &'a V,

    /// `u_m^k`.
    pub previous_iteration_previous: &'a V,

    /// `F(t_m, u_m^k)`.
    pub previous_iteration_previous_rhs: &'a V,

    /// `u_{m+1}^k`.
    pub previous_iteration_current: &'a V,

    /// `F(t_{m+1}, u_{m+1}^k)`.
    pub previous_iteration_current_rhs: &'a V,

    /// Quadrature term `ΔI` over `[t_m, t_{m+1}]`.
    pub integral: &'a V,
}

impl<'a, V> NodeStep<'a, V> {
    fn direct(&self, splitting: Splitting) -> DirectImplicitStep<'a, V> {
        DirectImplicitStep {
            splitting,
            time: self.time,
            delta_tau: self.delta_tau,
            delta_step: self.delta_step,
            previous_iteration_previous_node: self.previous_iteration_previous,
            previous_iteration_current_node: self.previous_iteration_current,
            previous_node: self.previous,
            integral: self.integral,
        }
    }
}

/// A correction formula applied once per node per sweep.
pub trait SweepCore {
    /// Returns a short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Computes `u_{m+1}^{k+1}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the problem fails or an implicit solve breaks down.
    fn update<P>(&self, problem: &P, step: &NodeStep<'_, P::Value>) -> Result<P::Value, SweepError>
    where
        P: Problem + ?Sized;
}

/// Runs one sweep over the current iteration of `state`.
///
/// The current iteration must be freshly allocated; the previous iteration,
/// if any, must be finalized. The quadrature is moved onto each time step in
/// turn.
///
/// # Errors
///
/// Returns an error if `state` has no current iteration or if a core,
/// the problem, or the quadrature fails.
pub fn sweep<P, C>(
    problem: &P,
    core: &C,
    state: &mut SolverState<P::Value>,
    quadrature: &mut SdcQuadrature,
    classic: bool,
) -> Result<(), SweepError>
where
    P: Problem + ?Sized,
    C: SweepCore,
{
    let seed_value = state.initial().value().clone();
    let seed_time = state.initial().time_point();
    let layout = state.layout().to_vec();
    let (current, previous) = state
        .current_and_previous_mut()
        .ok_or(SweepError::NoIteration)?;

    let boundary_rhs = evaluate(problem, seed_time, &seed_value, RhsPart::Full)?;
    let mut boundary = (seed_value.clone(), boundary_rhs);

    for (index, step_layout) in layout.iter().enumerate() {
        quadrature.transform(step_layout.interval);
        let step = current
            .time_step_mut(index)
            .ok_or(StateError::MissingState(index))?;

        match previous.and_then(|iteration| iteration.time_step(index)) {
            Some(before) => copy_forward(problem, step, before)?,
            None => seed(problem, step, &seed_value)?,
        }

        let (value, rhs) = boundary;
        sweep_time_step(problem, core, step, quadrature, classic, value, rhs)?;

        let last = step.last();
        boundary = (last.value().clone(), cached_rhs(last)?.clone());
    }

    Ok(())
}

/// Sweeps one seeded time step, starting from the boundary `(value, rhs)`.
fn sweep_time_step<P, C>(
    problem: &P,
    core: &C,
    step: &mut TimeStepState<P::Value>,
    quadrature: &SdcQuadrature,
    classic: bool,
    boundary_value: P::Value,
    boundary_rhs: P::Value,
) -> Result<(), SweepError>
where
    P: Problem + ?Sized,
    C: SweepCore,
{
    let num_nodes = step.num_nodes();

    let classic_integrals = if classic {
        let data = rhs_data(step)?;
        (0..num_nodes - 1)
            .map(|m| quadrature.apply(&data, m, m + 1))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        Vec::new()
    };

    // Values of the node just left behind, as they were in the previous iteration.
    let initial = step.initial();
    let mut stash = (initial.value().clone(), cached_rhs(initial)?.clone());
    step.initial_mut()
        .set_value_with_rhs(boundary_value, boundary_rhs)?;

    for m in 0..num_nodes - 1 {
        let integral = match classic_integrals.get(m) {
            Some(integral) => integral.clone(),
            None => quadrature.apply(&rhs_data(step)?, m, m + 1)?,
        };

        let previous = node(step, m)?;
        let current = node(step, m + 1)?;
        let node_step = NodeStep {
            previous_time: previous.time_point(),
            time: current.time_point(),
            delta_tau: current.delta_tau(),
            delta_step: step.delta_time_step(),
            previous: previous.value(),
            previous_rhs: cached_rhs(previous)?,
            previous_iteration_previous: &stash.0,
            previous_iteration_previous_rhs: &stash.1,
            previous_iteration_current: current.value(),
            previous_iteration_current_rhs: cached_rhs(current)?,
            integral: &integral,
        };

        let time = node_step.time;
        let value = core.update(problem, &node_step)?;
        if !value.is_finite() {
            return Err(SweepError::NonFinite { time });
        }
        let rhs = evaluate(problem, time, &value, RhsPart::Full)?;
        trace!(core = core.name(), time, "node updated");

        let current = node_mut(step, m + 1)?;
        stash = (current.value().clone(), cached_rhs(current)?.clone());
        current.set_integral(integral)?;
        current.set_value_with_rhs(value, rhs)?;
    }

    record_diagnostics(problem, step, quadrature)
}

/// Attaches residuals and errors to every node of a swept time step.
///
/// The residual at node `m` is `sup|u_0 + ∫_{t_0}^{t_m} F - u_m|`.
fn record_diagnostics<P>(
    problem: &P,
    step: &mut TimeStepState<P::Value>,
    quadrature: &SdcQuadrature,
) -> Result<(), SweepError>
where
    P: Problem + ?Sized,
{
    let data = rhs_data(step)?;
    let initial = step.initial().value().clone();

    for m in 1..step.num_nodes() {
        let mut collocation = initial.clone();
        collocation.axpy(1.0, &quadrature.apply(&data, 0, m)?);

        let node = node_mut(step, m)?;
        let residual = collocation.sup_distance(node.value());
        node.set_residual(residual)?;

        if let Some(exact) = problem.exact_solution() {
            let reference = exact
                .exact(node.time_point())
                .map_err(SweepError::problem)?;
            let error = node.value().sup_distance(&reference);
            node.set_error(error)?;
        }
    }

    Ok(())
}

/// Copies values and right-hand sides of the previous iteration forward.
fn copy_forward<P>(
    problem: &P,
    step: &mut TimeStepState<P::Value>,
    before: &TimeStepState<P::Value>,
) -> Result<(), SweepError>
where
    P: Problem + ?Sized,
{
    for j in 0..step.num_nodes() {
        let source = node(before, j)?;
        let rhs = match source.rhs() {
            Some(rhs) => rhs.clone(),
            None => evaluate(problem, source.time_point(), source.value(), RhsPart::Full)?,
        };
        node_mut(step, j)?.set_value_with_rhs(source.value().clone(), rhs)?;
    }
    Ok(())
}

/// Broadcasts `value` into every node and evaluates the right-hand sides.
fn seed<P>(problem: &P, step: &mut TimeStepState<P::Value>, value: &P::Value) -> Result<(), SweepError>
where
    P: Problem + ?Sized,
{
    step.broadcast(value)?;
    for j in 0..step.num_nodes() {
        let node = node_mut(step, j)?;
        let rhs = evaluate(problem, node.time_point(), node.value(), RhsPart::Full)?;
        node.set_rhs(rhs)?;
    }
    Ok(())
}

fn rhs_data<V: Clone>(step: &TimeStepState<V>) -> Result<Vec<V>, SweepError> {
    (0..step.num_nodes())
        .map(|j| cached_rhs(node(step, j)?).cloned())
        .collect()
}

fn node<V>(step: &TimeStepState<V>, index: usize) -> Result<&NodeState<V>, SweepError> {
    step.node(index)
        .ok_or(SweepError::State(StateError::MissingState(index)))
}

fn node_mut<V>(step: &mut TimeStepState<V>, index: usize) -> Result<&mut NodeState<V>, SweepError> {
    step.node_mut(index)
        .ok_or(SweepError::State(StateError::MissingState(index)))
}

fn cached_rhs<V>(node: &NodeState<V>) -> Result<&V, SweepError> {
    node.rhs().ok_or(SweepError::MissingRhs {
        time: node.time_point(),
    })
}

pub(crate) fn evaluate<P>(
    problem: &P,
    time: f64,
    value: &P::Value,
    part: RhsPart,
) -> Result<P::Value, SweepError>
where
    P: Problem + ?Sized,
{
    problem
        .evaluate(time, value, part)
        .map_err(SweepError::problem)
}

/// Solves an implicit equation with the problem's solver or Newton's method.
pub(crate) fn solve_implicit<P>(
    problem: &P,
    guess: &P::Value,
    equation: &ImplicitEquation<'_, P::Value>,
    root_finder: &newton::Config,
) -> Result<P::Value, SweepError>
where
    P: Problem + ?Sized,
{
    if let Some(result) = problem.implicit_solve(guess, equation) {
        return result.map_err(SweepError::problem);
    }

    let time = equation.time;
    let solution = newton::solve_unobserved(|x| equation.residual(problem, x), guess, root_finder)
        .map_err(|source| SweepError::RootFinder { time, source })?;

    match solution.status {
        newton::Status::Converged => Ok(solution.x),
        newton::Status::MaxIters | newton::Status::StoppedByObserver => {
            Err(SweepError::RootFinderStalled {
                time,
                iters: solution.iters,
                residual: solution.residual_norm,
            })
        }
    }
}
