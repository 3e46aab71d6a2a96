use pint_core::TimeInterval;

use crate::{
    solution::{IterativeSolution, TrajectorySolutionData},
    threshold::Condition,
};

/// How an instance's run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No time was left to cover.
    Completed,

    /// An observer stopped the run.
    StoppedByObserver,

    /// A failure was signalled, by this instance or from upstream.
    Failed,

    /// The instance was consumed before it terminated.
    Interrupted,
}

/// How an interval was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalStatus {
    /// A tolerance-based condition was met.
    Converged,

    /// The iteration cap was reached first.
    Finished,
}

/// The record of one completed interval.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalSolution<V> {
    pub interval: TimeInterval,
    pub status: IntervalStatus,

    /// The conditions met by the last iteration.
    pub reached: Vec<Condition>,

    pub iterations: IterativeSolution<V>,
}

impl<V> IntervalSolution<V> {
    #[must_use]
    pub fn used_iterations(&self) -> usize {
        self.iterations.used_iterations()
    }

    /// Returns the trajectory of the last iteration.
    #[must_use]
    pub fn trajectory(&self) -> Option<&TrajectorySolutionData<V>> {
        self.iterations.last()
    }

    /// Returns the value at the end of the interval.
    #[must_use]
    pub fn final_value(&self) -> Option<&V> {
        self.trajectory()?.last().map(|step| step.value())
    }
}

/// The result of running one SDC solver instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<V> {
    pub status: Status,

    /// Completed intervals in the order they were closed.
    pub intervals: Vec<IntervalSolution<V>>,

    /// Sweeps performed over all intervals, including abandoned ones.
    pub sweeps: usize,
}

impl<V> Solution<V> {
    /// Returns the value at the end of the last completed interval.
    #[must_use]
    pub fn final_value(&self) -> Option<&V> {
        self.intervals.last()?.final_value()
    }
}
