use pint_core::{Observer, SpatialValue};
use pint_solvers::solver::{Event, IntervalStatus};
use tracing::{debug, info, trace, warn};

/// How much of a run a [`TracingObserver`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Verbosity {
    /// Opened and closed intervals, at `info` (`warn` for intervals closed
    /// at the iteration cap).
    #[default]
    Intervals = 1,

    /// Also received messages and every sweep's measures, at `debug`.
    Iterations = 2,

    /// Also every node of every sweep, at `trace`.
    Nodes = 3,
}

impl Verbosity {
    /// Returns the verbosity for a numeric level from 1 to 3.
    #[must_use]
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Intervals),
            2 => Some(Self::Iterations),
            3 => Some(Self::Nodes),
            _ => None,
        }
    }
}

/// Forwards SDC solver events to `tracing`.
///
/// The observer never steers the solver. Installing a subscriber is up to
/// the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TracingObserver {
    verbosity: Verbosity,
}

impl TracingObserver {
    #[must_use]
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }
}

impl<V: SpatialValue, A> Observer<Event<'_, V>, A> for TracingObserver {
    fn observe(&mut self, event: &Event<'_, V>) -> Option<A> {
        match event {
            Event::Received { instance, message } => {
                if self.verbosity >= Verbosity::Iterations {
                    debug!(
                        instance,
                        time_point = message.time_point,
                        flag = ?message.flag,
                        "received"
                    );
                }
            }
            Event::IntervalOpened { instance, interval } => {
                info!(
                    instance,
                    start = interval.start(),
                    end = interval.end(),
                    "interval opened"
                );
            }
            Event::Swept {
                instance,
                check,
                state,
            } => {
                if self.verbosity >= Verbosity::Iterations {
                    let measures = &check.measures;
                    debug!(
                        instance,
                        iteration = measures.iterations,
                        residual = ?measures.residual,
                        error = ?measures.error,
                        solution_reduction = ?measures.solution_reduction,
                        error_reduction = ?measures.error_reduction,
                        status = ?check.status,
                        "sweep"
                    );
                }
                if self.verbosity >= Verbosity::Nodes
                    && let Some(iteration) = state.current_iteration()
                {
                    for (step, time_step) in iteration.time_steps().iter().enumerate() {
                        for node in time_step.nodes() {
                            trace!(
                                instance,
                                step,
                                time_point = node.time_point(),
                                value = ?node.value(),
                                residual = ?node.solution().residual(),
                                error = ?node.solution().error(),
                                "node"
                            );
                        }
                    }
                }
            }
            Event::IntervalClosed { instance, solution } => {
                let residual = solution
                    .trajectory()
                    .and_then(|trajectory| trajectory.max_residual());
                match solution.status {
                    IntervalStatus::Converged => info!(
                        instance,
                        start = solution.interval.start(),
                        iterations = solution.used_iterations(),
                        residual = ?residual,
                        reached = ?solution.reached,
                        "interval converged"
                    ),
                    IntervalStatus::Finished => warn!(
                        instance,
                        start = solution.interval.start(),
                        iterations = solution.used_iterations(),
                        residual = ?residual,
                        "interval finished without converging"
                    ),
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_map_to_verbosity() {
        assert_eq!(Verbosity::from_level(0), None);
        assert_eq!(Verbosity::from_level(1), Some(Verbosity::Intervals));
        assert_eq!(Verbosity::from_level(2), Some(Verbosity::Iterations));
        assert_eq!(Verbosity::from_level(3), Some(Verbosity::Nodes));
        assert_eq!(Verbosity::from_level(4), None);
        assert!(Verbosity::Nodes > Verbosity::Intervals);
        assert_eq!(TracingObserver::default().verbosity(), Verbosity::Intervals);
    }
}
