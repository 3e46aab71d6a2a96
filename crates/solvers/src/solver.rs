//! Spectral deferred corrections over a pipeline of solver instances.
//!
//! # Algorithm
//!
//! The problem's time span is covered by consecutive intervals of width `dt`
//! (the last one may be shorter). Each interval is split into time steps
//! carrying the quadrature's collocation nodes, and repeated sweeps of a
//! [`SweepCore`](crate::sweep::SweepCore) drive the node values toward the
//! collocation solution until the [threshold](crate::threshold) ends the
//! interval.
//!
//! # Pipeline
//!
//! A [`Solver`] instance works on one interval at a time and exchanges
//! boundary values with its neighbours through a
//! [`Communicator`](crate::communicator::Communicator). After every sweep it
//! sends the value at the end of its interval downstream, flagged as
//! iterating, converged, or finished. The downstream instance opens the
//! following interval from that value, or refreshes its initial value while
//! both are still iterating. A single instance linked to itself steps
//! through time sequentially; several instances in a [`Pipeline`] ring
//! iterate on consecutive intervals.
//!
//! Failure is cooperative: a failing instance sends [`Flag::Failed`] and every
//! instance receiving it passes it on and stops.
//!
//! # Observer Events
//!
//! Instances emit an [`Event`] for every received message, opened interval,
//! finished sweep, and closed interval. Returning [`Action::StopEarly`] from
//! any of them abandons the current interval and signals failure downstream.
//!
//! [`Flag::Failed`]: crate::communicator::Flag::Failed

mod action;
mod config;
mod error;
mod event;
mod instance;
mod pipeline;
mod solution;


pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use instance::{Progress, Solver};
pub use pipeline::{Pipeline, PipelineSolution};
pub use solution::{IntervalSolution, IntervalStatus, Solution, Status};

use pint_core::Problem;

use crate::sweep::SweepCore;

/// Solves `problem` sequentially with a single self-looped instance.
///
/// # Errors
///
/// Returns an error if the config is unusable, `dt` is invalid, or a sweep
/// fails.
pub fn solve<P, C>(
    problem: &P,
    config: Config,
    core: &C,
    dt: f64,
) -> Result<Solution<P::Value>, Error>
where
    P: Problem + ?Sized,
    C: SweepCore,
{
    Solver::self_looped(problem, config)?.run_unobserved(core, dt)
}
