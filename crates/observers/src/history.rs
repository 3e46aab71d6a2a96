//! Compact records of an SDC run.
//!
//! [`HistoryRecorder`] keeps one [`SweepRecord`] per sweep and one
//! [`IntervalRecord`] per closed interval, which is usually enough to study
//! convergence without holding on to every node value.

use pint_core::{Observer, TimeInterval};
use pint_solvers::{
    solver::{Event, IntervalStatus},
    threshold::{Measures, ThresholdStatus},
};

/// The measures of one sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepRecord {
    pub instance: usize,
    pub interval: TimeInterval,
    pub measures: Measures,
    pub status: ThresholdStatus,
}

/// The outcome of one closed interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalRecord {
    pub instance: usize,
    pub interval: TimeInterval,
    pub status: IntervalStatus,
    pub iterations: usize,
    pub max_residual: Option<f64>,
    pub max_error: Option<f64>,
}

/// Records sweeps and closed intervals of every instance it observes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryRecorder {
    sweeps: Vec<SweepRecord>,
    intervals: Vec<IntervalRecord>,
}

impl HistoryRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `event` if it is a sweep or a closed interval.
    pub fn record<V>(&mut self, event: &Event<'_, V>) {
        match event {
            Event::Swept {
                instance,
                check,
                state,
            } => self.sweeps.push(SweepRecord {
                instance: *instance,
                interval: state.interval(),
                measures: check.measures,
                status: check.status,
            }),
            Event::IntervalClosed { instance, solution } => {
                let trajectory = solution.trajectory();
                self.intervals.push(IntervalRecord {
                    instance: *instance,
                    interval: solution.interval,
                    status: solution.status,
                    iterations: solution.used_iterations(),
                    max_residual: trajectory.and_then(|t| t.max_residual()),
                    max_error: trajectory.and_then(|t| t.max_error()),
                });
            }
            Event::Received { .. } | Event::IntervalOpened { .. } => {}
        }
    }

    #[must_use]
    pub fn sweeps(&self) -> &[SweepRecord] {
        &self.sweeps
    }

    #[must_use]
    pub fn intervals(&self) -> &[IntervalRecord] {
        &self.intervals
    }

    /// Returns the residual of every sweep over the interval starting at
    /// `start`, in order.
    #[must_use]
    pub fn residuals(&self, start: f64) -> Vec<Option<f64>> {
        self.sweeps
            .iter()
            .filter(|record| (record.interval.start() - start).abs() <= 1e-12)
            .map(|record| record.measures.residual)
            .collect()
    }

    /// Returns how many intervals were closed at the iteration cap.
    #[must_use]
    pub fn num_finished(&self) -> usize {
        self.intervals
            .iter()
            .filter(|record| record.status == IntervalStatus::Finished)
            .count()
    }
}

impl<V, A> Observer<Event<'_, V>, A> for HistoryRecorder {
    fn observe(&mut self, event: &Event<'_, V>) -> Option<A> {
        self.record(event);
        None
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use approx::assert_relative_eq;
    use pint_core::{Problem, RhsPart};
    use pint_solvers::{
        solver::{Action, Config, Solver},
        sweep::Explicit,
        threshold::{self, Condition},
    };

    use super::*;

    /// u' = -u on [0, 1].
    struct Decay;

    impl Problem for Decay {
        type Value = f64;
        type Error = Infallible;

        fn time_interval(&self) -> TimeInterval {
            TimeInterval::new(0.0, 1.0).unwrap()
        }

        fn initial_value(&self) -> f64 {
            1.0
        }

        fn evaluate(&self, _time: f64, value: &f64, _part: RhsPart) -> Result<f64, Infallible> {
            Ok(-value)
        }
    }

    #[test]
    fn records_sweeps_and_intervals() {
        let threshold = threshold::Config::new(4, 1e-12, &[Condition::Residual]).unwrap();
        let config = Config::new(1, pint_quadrature::Config::default(), true, threshold).unwrap();
        let mut history = HistoryRecorder::new();

        let solution = Solver::self_looped(&Decay, config)
            .unwrap()
            .run(&Explicit, 0.5, |event: &Event<'_, f64>| -> Option<Action> {
                history.record(event);
                None
            })
            .unwrap();

        assert_eq!(history.intervals().len(), solution.intervals.len());
        assert_eq!(history.intervals().len(), 2);
        assert_eq!(history.sweeps().len(), solution.sweeps);
        assert_eq!(history.num_finished(), 2);

        let residuals = history.residuals(0.0);
        assert_eq!(residuals.len(), 4);
        assert!(residuals.windows(2).all(|pair| pair[1] < pair[0]));

        let second = history.intervals()[1];
        assert_relative_eq!(second.interval.start(), 0.5);
        assert_eq!(second.iterations, 4);
        assert_eq!(second.max_error, None);
    }
}
