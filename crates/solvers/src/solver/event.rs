use pint_core::TimeInterval;

use crate::{communicator::Message, state::SolverState, threshold::Check};

use super::IntervalSolution;

/// Events emitted by an SDC solver instance.
///
/// Every event names the emitting `instance`, so one observer can follow a
/// whole pipeline.
#[derive(Debug)]
pub enum Event<'a, V> {
    /// A message arrived from upstream.
    Received {
        instance: usize,
        message: &'a Message<V>,
    },

    /// A new interval was opened.
    IntervalOpened {
        instance: usize,
        interval: TimeInterval,
    },

    /// A sweep finished and was checked against the threshold.
    Swept {
        instance: usize,

        /// The outcome of the threshold check.
        check: &'a Check,

        /// The interval's state, with the newest iteration finalized.
        state: &'a SolverState<V>,
    },

    /// An interval was closed and its solution recorded.
    IntervalClosed {
        instance: usize,
        solution: &'a IntervalSolution<V>,
    },
}

impl<V> Event<'_, V> {
    /// Returns the instance that emitted the event.
    #[must_use]
    pub fn instance(&self) -> usize {
        match self {
            Self::Received { instance, .. }
            | Self::IntervalOpened { instance, .. }
            | Self::Swept { instance, .. }
            | Self::IntervalClosed { instance, .. } => *instance,
        }
    }
}
