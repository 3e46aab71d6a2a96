//! Convergence checks between sweeps.
//!
//! After each sweep the checker measures the newest iteration and decides
//! whether to keep iterating. Reaching the iteration cap always ends the
//! interval as [`ThresholdStatus::Finished`], regardless of the other
//! conditions. Otherwise, any single tolerance-based condition whose measure
//! is at or below its bound ends the interval as
//! [`ThresholdStatus::Converged`].

mod config;

pub use config::{Condition, Config, ConfigError};

use pint_core::SpatialValue;

use crate::state::SolverState;

/// Outcome of a threshold check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThresholdStatus {
    /// No condition is met; sweep again.
    Iterating,

    /// A tolerance-based condition is met.
    Converged,

    /// The iteration cap was reached.
    Finished,
}

/// Quantities measured on the newest iteration.
///
/// Reductions compare against the previous iteration and are `None` in the
/// first one; errors are `None` if the problem has no exact solution.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measures {
    pub iterations: usize,
    pub residual: Option<f64>,
    pub error: Option<f64>,
    pub solution_reduction: Option<f64>,
    pub error_reduction: Option<f64>,
}

impl Measures {
    /// Measures the current iteration of `state`, which must be finalized.
    #[must_use]
    pub fn of<V: SpatialValue>(state: &SolverState<V>) -> Self {
        let Some(current) = state.current_iteration().map(|i| i.solution()) else {
            return Self::default();
        };
        let previous = state.previous_iteration().map(|i| i.solution());

        Self {
            iterations: state.num_iterations(),
            residual: current.max_residual(),
            error: current.max_error(),
            solution_reduction: previous.and_then(|p| current.max_distance(p)),
            error_reduction: previous.and_then(|p| current.max_error_change(p)),
        }
    }

    /// Returns the measured value of `condition`.
    #[must_use]
    pub fn value(&self, condition: Condition) -> Option<f64> {
        match condition {
            Condition::Residual => self.residual,
            Condition::Error => self.error,
            Condition::ErrorReduction => self.error_reduction,
            Condition::SolutionReduction => self.solution_reduction,
            Condition::Iterations => Some(self.iterations as f64),
        }
    }
}

/// The result of a threshold check.
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub status: ThresholdStatus,

    /// The conditions that were met.
    pub reached: Vec<Condition>,

    pub measures: Measures,
}

/// Decides whether iteration should continue.
#[must_use]
pub fn check(config: &Config, measures: Measures) -> Check {
    if measures.iterations >= config.max_iterations() {
        return Check {
            status: ThresholdStatus::Finished,
            reached: vec![Condition::Iterations],
            measures,
        };
    }

    let reached: Vec<Condition> = config
        .bounds()
        .iter()
        .filter(|&&(condition, bound)| measures.value(condition).is_some_and(|v| v <= bound))
        .map(|&(condition, _)| condition)
        .collect();

    let status = if reached.is_empty() {
        ThresholdStatus::Iterating
    } else {
        ThresholdStatus::Converged
    };

    Check {
        status,
        reached,
        measures,
    }
}
