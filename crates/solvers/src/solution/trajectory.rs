use pint_core::SpatialValue;

use crate::state::StateError;

use super::StepSolutionData;

/// Finalized step solutions ordered by strictly increasing time.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySolutionData<V> {
    steps: Vec<StepSolutionData<V>>,
    finalized: bool,
}

impl<V> Default for TrajectorySolutionData<V> {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            finalized: false,
        }
    }
}

impl<V> TrajectorySolutionData<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step, finalizing it if it is not already.
    ///
    /// # Errors
    ///
    /// Returns an error if the trajectory is finalized or if the step does
    /// not lie strictly after the current last step.
    pub fn push(&mut self, mut step: StepSolutionData<V>) -> Result<(), StateError> {
        if self.finalized {
            return Err(StateError::AlreadyFinalized("trajectory"));
        }
        if let Some(last) = self.steps.last()
            && step.time_point() <= last.time_point()
        {
            return Err(StateError::NonIncreasingTimePoint {
                previous: last.time_point(),
                time: step.time_point(),
            });
        }
        if !step.is_finalized() {
            step.finalize()?;
        }
        self.steps.push(step);
        Ok(())
    }

    /// Makes the trajectory read-only.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyFinalized`] if called twice.
    pub fn finalize(&mut self) -> Result<(), StateError> {
        if self.finalized {
            return Err(StateError::AlreadyFinalized("trajectory"));
        }
        self.finalized = true;
        Ok(())
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn steps(&self) -> &[StepSolutionData<V>] {
        &self.steps
    }

    #[must_use]
    pub fn first(&self) -> Option<&StepSolutionData<V>> {
        self.steps.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&StepSolutionData<V>> {
        self.steps.last()
    }

    /// Returns the step at `time_point`, matched to a relative tolerance.
    #[must_use]
    pub fn at(&self, time_point: f64) -> Option<&StepSolutionData<V>> {
        let tolerance = 1e-12 * time_point.abs().max(1.0);
        let index = self
            .steps
            .partition_point(|step| step.time_point() < time_point - tolerance);
        self.steps
            .get(index)
            .filter(|step| (step.time_point() - time_point).abs() <= tolerance)
    }

    #[must_use]
    pub fn time_points(&self) -> Vec<f64> {
        self.steps.iter().map(StepSolutionData::time_point).collect()
    }

    #[must_use]
    pub fn values(&self) -> Vec<&V> {
        self.steps.iter().map(StepSolutionData::value).collect()
    }

    #[must_use]
    pub fn residuals(&self) -> Vec<Option<f64>> {
        self.steps.iter().map(StepSolutionData::residual).collect()
    }

    #[must_use]
    pub fn errors(&self) -> Vec<Option<f64>> {
        self.steps.iter().map(StepSolutionData::error).collect()
    }

    /// Returns the largest recorded residual, if any step has one.
    #[must_use]
    pub fn max_residual(&self) -> Option<f64> {
        max_of(self.steps.iter().filter_map(StepSolutionData::residual))
    }

    /// Returns the largest recorded error, if any step has one.
    #[must_use]
    pub fn max_error(&self) -> Option<f64> {
        max_of(self.steps.iter().filter_map(StepSolutionData::error))
    }
}

impl<V: SpatialValue> TrajectorySolutionData<V> {
    /// Returns `max_m sup|u_m - v_m|` over steps paired by position.
    ///
    /// Returns `None` if the trajectories differ in length.
    #[must_use]
    pub fn max_distance(&self, other: &Self) -> Option<f64> {
        if self.len() != other.len() {
            return None;
        }
        Some(
            self.steps
                .iter()
                .zip(&other.steps)
                .fold(0.0, |acc, (a, b)| acc.max(a.value().sup_distance(b.value()))),
        )
    }

    /// Returns `max_m |e_m - f_m|` over steps paired by position.
    ///
    /// Returns `None` if the trajectories differ in length or any error is missing.
    #[must_use]
    pub fn max_error_change(&self, other: &Self) -> Option<f64> {
        if self.len() != other.len() {
            return None;
        }
        self.steps
            .iter()
            .zip(&other.steps)
            .try_fold(0.0_f64, |acc, (a, b)| {
                Some(acc.max((a.error()? - b.error()?).abs()))
            })
    }
}

fn max_of(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn step(value: f64, time: f64, residual: f64) -> StepSolutionData<f64> {
        let mut step = StepSolutionData::new(value, time);
        step.set_residual(residual).unwrap();
        step
    }

    #[test]
    fn keeps_time_points_increasing() {
        let mut trajectory = TrajectorySolutionData::new();
        trajectory.push(step(1.0, 0.1, 1e-2)).unwrap();
        trajectory.push(step(2.0, 0.2, 1e-3)).unwrap();

        assert_eq!(
            trajectory.push(step(3.0, 0.2, 0.0)),
            Err(StateError::NonIncreasingTimePoint {
                previous: 0.2,
                time: 0.2
            })
        );
        assert_eq!(trajectory.time_points(), vec![0.1, 0.2]);
        assert!(trajectory.steps().iter().all(StepSolutionData::is_finalized));
    }

    #[test]
    fn looks_up_steps_by_time() {
        let mut trajectory = TrajectorySolutionData::new();
        for (i, t) in [0.0, 0.25, 0.5].into_iter().enumerate() {
            trajectory.push(step(i as f64, t, 0.0)).unwrap();
        }

        assert_eq!(trajectory.at(0.25).map(|s| *s.value()), Some(1.0));
        assert_eq!(trajectory.at(0.5 + 1e-14).map(|s| *s.value()), Some(2.0));
        assert!(trajectory.at(0.3).is_none());
        assert!(trajectory.at(1.0).is_none());
    }

    #[test]
    fn aggregates_diagnostics() {
        let mut trajectory = TrajectorySolutionData::new();
        trajectory.push(step(1.0, 0.1, 1e-2)).unwrap();
        trajectory.push(StepSolutionData::new(2.0, 0.2)).unwrap();

        assert_eq!(trajectory.max_residual(), Some(1e-2));
        assert_eq!(trajectory.max_error(), None);
        assert_eq!(trajectory.residuals(), vec![Some(1e-2), None]);
    }

    #[test]
    fn distances_between_trajectories() {
        let mut a = TrajectorySolutionData::new();
        let mut b = TrajectorySolutionData::new();
        for (t, (x, y)) in [(0.1, (1.0, 1.5)), (0.2, (2.0, 1.75))] {
            let mut sa = StepSolutionData::new(x, t);
            let mut sb = StepSolutionData::new(y, t);
            sa.set_error(0.1).unwrap();
            sb.set_error(0.4).unwrap();
            a.push(sa).unwrap();
            b.push(sb).unwrap();
        }

        assert_relative_eq!(a.max_distance(&b).unwrap(), 0.5);
        assert_relative_eq!(a.max_error_change(&b).unwrap(), 0.3);
        assert!(a.max_distance(&TrajectorySolutionData::new()).is_none());
    }

    #[test]
    fn rejects_mutation_after_finalize() {
        let mut trajectory = TrajectorySolutionData::<f64>::new();
        trajectory.finalize().unwrap();

        assert!(trajectory.push(step(1.0, 0.0, 0.0)).is_err());
        assert_eq!(
            trajectory.finalize(),
            Err(StateError::AlreadyFinalized("trajectory"))
        );
    }
}
