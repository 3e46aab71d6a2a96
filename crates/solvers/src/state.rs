//! The nested state of an SDC solver.
//!
//! ```text
//! SolverState ─┬─ IterationState (one per sweep, grows) ─┬─ TimeStepState ─┬─ NodeState (initial)
//!              │                                         │                 └─ NodeState × (n - 1)
//!              └─ NodeState (interval boundary)          └─ ...
//! ```
//!
//! Every level implements [`Finalize`]: finalizing a level finalizes its
//! children, copies their solution records into its own aggregate, and makes
//! all of it read-only. Siblings are addressed by position in the owning
//! [`StateSequence`], so no state holds a reference to its parent.

mod error;
mod iteration;
mod node;
mod sequence;
mod solver;
mod time_step;


pub use error::StateError;
pub use iteration::IterationState;
pub use node::NodeState;
pub use sequence::{Finalize, StateSequence};
pub use solver::SolverState;
pub use time_step::{StepLayout, TimeStepState};
