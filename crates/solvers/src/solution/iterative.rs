use pint_core::SpatialValue;

use crate::state::StateError;

use super::TrajectorySolutionData;

/// The trajectories of every sweep over one interval, in iteration order.
#[derive(Debug, Clone, PartialEq)]
pub struct IterativeSolution<V> {
    iterations: Vec<TrajectorySolutionData<V>>,
    finalized: bool,
}

impl<V> Default for IterativeSolution<V> {
    fn default() -> Self {
        Self {
            iterations: Vec::new(),
            finalized: false,
        }
    }
}

impl<V> IterativeSolution<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the trajectory of the next iteration.
    ///
    /// # Errors
    ///
    /// Returns an error if this solution is finalized or the trajectory is not.
    pub fn push(&mut self, trajectory: TrajectorySolutionData<V>) -> Result<(), StateError> {
        if self.finalized {
            return Err(StateError::AlreadyFinalized("iterative solution"));
        }
        if !trajectory.is_finalized() {
            return Err(StateError::NotFinalized("trajectory"));
        }
        self.iterations.push(trajectory);
        Ok(())
    }

    /// Makes the solution read-only.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyFinalized`] if called twice.
    pub fn finalize(&mut self) -> Result<(), StateError> {
        if self.finalized {
            return Err(StateError::AlreadyFinalized("iterative solution"));
        }
        self.finalized = true;
        Ok(())
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Returns the number of recorded iterations.
    #[must_use]
    pub fn used_iterations(&self) -> usize {
        self.iterations.len()
    }

    /// Returns the trajectory of iteration `k` (zero-based).
    #[must_use]
    pub fn iteration(&self, k: usize) -> Option<&TrajectorySolutionData<V>> {
        self.iterations.get(k)
    }

    #[must_use]
    pub fn iterations(&self) -> &[TrajectorySolutionData<V>] {
        &self.iterations
    }

    /// Returns the trajectory of the last iteration.
    #[must_use]
    pub fn last(&self) -> Option<&TrajectorySolutionData<V>> {
        self.iterations.last()
    }
}

impl<V: SpatialValue> IterativeSolution<V> {
    /// Returns how much iteration `k` changed the solution from iteration `k - 1`.
    ///
    /// Returns `None` for the first iteration or an unknown `k`.
    #[must_use]
    pub fn solution_reduction(&self, k: usize) -> Option<f64> {
        let (current, previous) = self.pair(k)?;
        current.max_distance(previous)
    }

    /// Returns how much iteration `k` changed the error from iteration `k - 1`.
    ///
    /// Returns `None` for the first iteration, an unknown `k`, or missing errors.
    #[must_use]
    pub fn error_reduction(&self, k: usize) -> Option<f64> {
        let (current, previous) = self.pair(k)?;
        current.max_error_change(previous)
    }

    fn pair(&self, k: usize) -> Option<(&TrajectorySolutionData<V>, &TrajectorySolutionData<V>)> {
        let previous = self.iterations.get(k.checked_sub(1)?)?;
        Some((self.iterations.get(k)?, previous))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::solution::StepSolutionData;

    fn trajectory(values: &[f64], errors: &[f64]) -> TrajectorySolutionData<f64> {
        let mut trajectory = TrajectorySolutionData::new();
        for (i, (&value, &error)) in values.iter().zip(errors).enumerate() {
            let mut step = StepSolutionData::new(value, i as f64);
            step.set_error(error).unwrap();
            trajectory.push(step).unwrap();
        }
        trajectory.finalize().unwrap();
        trajectory
    }

    #[test]
    fn reductions_compare_consecutive_iterations() {
        let mut solution = IterativeSolution::new();
        solution.push(trajectory(&[1.0, 2.0], &[0.5, 0.5])).unwrap();
        solution.push(trajectory(&[1.1, 2.5], &[0.4, 0.1])).unwrap();

        assert_eq!(solution.used_iterations(), 2);
        assert!(solution.solution_reduction(0).is_none());
        assert!(solution.error_reduction(0).is_none());
        assert_relative_eq!(solution.solution_reduction(1).unwrap(), 0.5);
        assert_relative_eq!(solution.error_reduction(1).unwrap(), 0.4);
        assert!(solution.solution_reduction(2).is_none());
    }

    #[test]
    fn accepts_only_finalized_trajectories() {
        let mut solution = IterativeSolution::<f64>::new();
        assert_eq!(
            solution.push(TrajectorySolutionData::new()),
            Err(StateError::NotFinalized("trajectory"))
        );

        solution.finalize().unwrap();
        assert!(solution.push(trajectory(&[1.0], &[0.0])).is_err());
        assert!(solution.finalize().is_err());
    }
}
