use pint_core::{SpatialValue, TimeInterval};

use crate::solution::IterativeSolution;

use super::{Finalize, IterationState, NodeState, StateError, StateSequence, StepLayout};

/// All iterations over one work interval.
///
/// The interval's node layout is fixed at construction; only the number of
/// iterations grows, one per [`SolverState::proceed`]. The current iteration
/// is always the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverState<V> {
    interval: TimeInterval,
    initial: NodeState<V>,
    layout: Vec<StepLayout>,
    iterations: StateSequence<IterationState<V>>,
    solution: IterativeSolution<V>,
}

impl<V: SpatialValue> SolverState<V> {
    /// Creates the state for an interval starting with `initial_value`.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::EmptyLayout`] unless every time step has at
    /// least two nodes and there is at least one time step.
    pub fn new(initial_value: V, layout: Vec<StepLayout>) -> Result<Self, StateError> {
        let (Some(first), Some(last)) = (layout.first(), layout.last()) else {
            return Err(StateError::EmptyLayout);
        };
        if layout.iter().any(|step| step.node_times.len() < 2) {
            return Err(StateError::EmptyLayout);
        }
        let interval = TimeInterval::new(first.interval.start(), last.interval.end())
            .map_err(|_| StateError::EmptyLayout)?;

        Ok(Self {
            interval,
            initial: NodeState::new(initial_value, interval.start(), 0.0),
            layout,
            iterations: StateSequence::default(),
            solution: IterativeSolution::new(),
        })
    }

    /// Appends a freshly allocated iteration and makes it current.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyFinalized`] if the state is finalized.
    pub fn proceed(&mut self) -> Result<&mut IterationState<V>, StateError> {
        let iteration = IterationState::allocate(&self.layout, self.initial.value());
        self.iterations.push(iteration)
    }
}

impl<V> SolverState<V> {
    /// Returns the interval covered by this state.
    #[must_use]
    pub fn interval(&self) -> TimeInterval {
        self.interval
    }

    /// Returns the width of the interval.
    #[must_use]
    pub fn delta_interval(&self) -> f64 {
        self.interval().width()
    }

    #[must_use]
    pub fn layout(&self) -> &[StepLayout] {
        &self.layout
    }

    /// Returns the boundary value at the start of the interval.
    #[must_use]
    pub fn initial(&self) -> &NodeState<V> {
        &self.initial
    }

    /// Replaces the boundary value at the start of the interval.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyFinalized`] if the state is finalized.
    pub fn set_initial_value(&mut self, value: V) -> Result<(), StateError> {
        if self.solution.is_finalized() {
            return Err(StateError::AlreadyFinalized("solver state"));
        }
        self.initial.set_value(value)
    }

    #[must_use]
    pub fn iterations(&self) -> &StateSequence<IterationState<V>> {
        &self.iterations
    }

    #[must_use]
    pub fn num_iterations(&self) -> usize {
        self.iterations.len()
    }

    #[must_use]
    pub fn is_first_iteration(&self) -> bool {
        self.iterations.len() == 1
    }

    #[must_use]
    pub fn current_iteration(&self) -> Option<&IterationState<V>> {
        self.iterations.last()
    }

    pub fn current_iteration_mut(&mut self) -> Option<&mut IterationState<V>> {
        self.iterations.last_mut()
    }

    /// Returns the iteration before the current one.
    #[must_use]
    pub fn previous_iteration(&self) -> Option<&IterationState<V>> {
        let index = self.iterations.last_index()?.checked_sub(1)?;
        self.iterations.get(index)
    }

    /// Splits the current iteration mutably from the previous one.
    pub fn current_and_previous_mut(
        &mut self,
    ) -> Option<(&mut IterationState<V>, Option<&IterationState<V>>)> {
        self.iterations
            .split_last_mut()
            .map(|(current, earlier)| (current, earlier.last()))
    }

    /// Returns the solution aggregated by [`Finalize::finalize`].
    #[must_use]
    pub fn solution(&self) -> &IterativeSolution<V> {
        &self.solution
    }

    /// Consumes the state, keeping only its aggregated solution.
    #[must_use]
    pub fn into_solution(self) -> IterativeSolution<V> {
        self.solution
    }
}

impl<V: Clone> Finalize for SolverState<V> {
    fn finalize(&mut self) -> Result<(), StateError> {
        if self.solution.is_finalized() {
            return Err(StateError::AlreadyFinalized("solver state"));
        }
        self.iterations.finalize()?;
        for iteration in &self.iterations {
            self.solution.push(iteration.solution().clone())?;
        }
        self.solution.finalize()
    }

    fn is_finalized(&self) -> bool {
        self.solution.is_finalized()
    }
}
