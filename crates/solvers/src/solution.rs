//! Finalize-once solution records.
//!
//! A [`StepSolutionData`] holds the accepted value of one collocation node,
//! a [`TrajectorySolutionData`] the nodes of one sweep in time order, and an
//! [`IterativeSolution`] the trajectories of every sweep over one interval.
//! Records reject mutation once finalized, so finalized data can be handed to
//! diagnostics without copying.

mod iterative;
mod step;
mod trajectory;

pub use iterative::IterativeSolution;
pub use step::StepSolutionData;
pub use trajectory::TrajectorySolutionData;
