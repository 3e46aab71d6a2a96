use pint_core::{SpatialValue, TimeInterval};
use pint_quadrature::SdcQuadrature;

use crate::solution::TrajectorySolutionData;

use super::{Finalize, NodeState, StateError, StateSequence};

/// Node positions of one time step.
///
/// `node_times` holds every collocation node including the first, which
/// coincides with the start of the time step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepLayout {
    pub interval: TimeInterval,
    pub node_times: Vec<f64>,
}

impl StepLayout {
    /// Splits `interval` into `num_time_steps` equal time steps and places
    /// the quadrature's nodes on each.
    ///
    /// The quadrature is left on the last time step.
    #[must_use]
    pub fn split(
        interval: TimeInterval,
        num_time_steps: usize,
        quadrature: &mut SdcQuadrature,
    ) -> Vec<Self> {
        interval
            .split(num_time_steps)
            .into_iter()
            .map(|step| {
                quadrature.transform(step);
                Self {
                    interval: step,
                    node_times: quadrature.nodes().to_vec(),
                }
            })
            .collect()
    }
}

/// The nodes of one time step within one iteration.
///
/// The initial node carries the value at the start of the step and is not
/// part of the step's solution; the remaining nodes are.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeStepState<V> {
    initial: NodeState<V>,
    nodes: StateSequence<NodeState<V>>,
    delta_time_step: f64,
    solution: TrajectorySolutionData<V>,
}

impl<V: SpatialValue> TimeStepState<V> {
    /// Allocates zero-valued nodes for `layout` shaped like `template`.
    #[must_use]
    pub fn allocate(layout: &StepLayout, template: &V) -> Self {
        let times = &layout.node_times;
        let initial = NodeState::zeroed(template, layout.interval.start(), 0.0);
        let nodes = times
            .windows(2)
            .map(|w| NodeState::zeroed(template, w[1], w[1] - w[0]))
            .collect();

        Self {
            initial,
            nodes: StateSequence::new(nodes),
            delta_time_step: layout.interval.width(),
            solution: TrajectorySolutionData::new(),
        }
    }

    /// Copies `value` into the initial node and every other node.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyFinalized`] if the step or any of its
    /// nodes is finalized, in which case nothing is written.
    pub fn broadcast(&mut self, value: &V) -> Result<(), StateError> {
        if self.solution.is_finalized()
            || self.initial.is_finalized()
            || self.nodes.iter().any(Finalize::is_finalized)
        {
            return Err(StateError::AlreadyFinalized("time step"));
        }
        self.initial.set_value(value.clone())?;
        for index in 0..self.nodes.len() {
            if let Some(node) = self.nodes.get_mut(index) {
                node.set_value(value.clone())?;
            }
        }
        Ok(())
    }
}

impl<V> TimeStepState<V> {
    #[must_use]
    pub fn initial(&self) -> &NodeState<V> {
        &self.initial
    }

    pub fn initial_mut(&mut self) -> &mut NodeState<V> {
        &mut self.initial
    }

    #[must_use]
    pub fn nodes(&self) -> &StateSequence<NodeState<V>> {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut StateSequence<NodeState<V>> {
        &mut self.nodes
    }

    /// Returns the node at `index`, counting the initial node as `0`.
    #[must_use]
    pub fn node(&self, index: usize) -> Option<&NodeState<V>> {
        match index {
            0 => Some(&self.initial),
            i => self.nodes.get(i - 1),
        }
    }

    /// Mutable variant of [`TimeStepState::node`].
    pub fn node_mut(&mut self, index: usize) -> Option<&mut NodeState<V>> {
        match index {
            0 => Some(&mut self.initial),
            i => self.nodes.get_mut(i - 1),
        }
    }

    /// Returns the number of nodes including the initial node.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len() + 1
    }

    #[must_use]
    pub fn delta_time_step(&self) -> f64 {
        self.delta_time_step
    }

    /// Returns the last node of the step.
    #[must_use]
    pub fn last(&self) -> &NodeState<V> {
        self.nodes.last().unwrap_or(&self.initial)
    }

    #[must_use]
    pub fn solution(&self) -> &TrajectorySolutionData<V> {
        &self.solution
    }
}

impl<V: Clone> Finalize for TimeStepState<V> {
    fn finalize(&mut self) -> Result<(), StateError> {
        if self.solution.is_finalized() {
            return Err(StateError::AlreadyFinalized("time step"));
        }
        self.initial.finalize()?;
        self.nodes.finalize()?;
        for node in &self.nodes {
            self.solution.push(node.solution().clone())?;
        }
        self.solution.finalize()
    }

    fn is_finalized(&self) -> bool {
        self.solution.is_finalized()
    }
}
