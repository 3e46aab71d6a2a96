use pint_core::SpatialValue;

use crate::solution::TrajectorySolutionData;

use super::{Finalize, StateError, StateSequence, StepLayout, TimeStepState};

/// One sweep over every time step of an interval.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationState<V> {
    time_steps: StateSequence<TimeStepState<V>>,
    solution: TrajectorySolutionData<V>,
}

impl<V: SpatialValue> IterationState<V> {
    /// Allocates a fresh node skeleton for `layout`.
    #[must_use]
    pub fn allocate(layout: &[StepLayout], template: &V) -> Self {
        let time_steps = layout
            .iter()
            .map(|step| TimeStepState::allocate(step, template))
            .collect();

        Self {
            time_steps: StateSequence::new(time_steps),
            solution: TrajectorySolutionData::new(),
        }
    }

    /// Copies `value` into every node of every time step.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyFinalized`] if the iteration or any of
    /// its time steps is finalized, in which case nothing is written.
    pub fn broadcast(&mut self, value: &V) -> Result<(), StateError> {
        if self.solution.is_finalized()
            || self.time_steps.iter().any(Finalize::is_finalized)
        {
            return Err(StateError::AlreadyFinalized("iteration"));
        }
        for index in 0..self.time_steps.len() {
            if let Some(step) = self.time_steps.get_mut(index) {
                step.broadcast(value)?;
            }
        }
        Ok(())
    }
}

impl<V> IterationState<V> {
    #[must_use]
    pub fn time_steps(&self) -> &StateSequence<TimeStepState<V>> {
        &self.time_steps
    }

    pub fn time_steps_mut(&mut self) -> &mut StateSequence<TimeStepState<V>> {
        &mut self.time_steps
    }

    #[must_use]
    pub fn time_step(&self, index: usize) -> Option<&TimeStepState<V>> {
        self.time_steps.get(index)
    }

    pub fn time_step_mut(&mut self, index: usize) -> Option<&mut TimeStepState<V>> {
        self.time_steps.get_mut(index)
    }

    #[must_use]
    pub fn num_time_steps(&self) -> usize {
        self.time_steps.len()
    }

    /// Returns the last time step of the sweep.
    #[must_use]
    pub fn final_step(&self) -> Option<&TimeStepState<V>> {
        self.time_steps.last()
    }

    /// Returns the trajectory aggregated when the iteration was finalized.
    #[must_use]
    pub fn solution(&self) -> &TrajectorySolutionData<V> {
        &self.solution
    }
}

impl<V: Clone> Finalize for IterationState<V> {
    fn finalize(&mut self) -> Result<(), StateError> {
        if self.solution.is_finalized() {
            return Err(StateError::AlreadyFinalized("iteration"));
        }
        self.time_steps.finalize()?;
        for step in &self.time_steps {
            for record in step.solution().steps() {
                self.solution.push(record.clone())?;
            }
        }
        self.solution.finalize()
    }

    fn is_finalized(&self) -> bool {
        self.solution.is_finalized()
    }
}
