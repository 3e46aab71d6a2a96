//! Capability traits for cross-solver observers.
//!
//! These traits abstract over solver-specific event and action types, enabling
//! observers to work generically across different solvers.
//!
//! # Event traits
//!
//! - [`HasResidual`] — events that carry a residual value
//!
//! # Action traits
//!
//! - [`CanStopEarly`] — actions that can signal early termination
//!
//! # Example
//!
//! ```rust
//! use pint_core::Observer;
//! use pint_observers::traits::{CanStopEarly, HasResidual};
//!
//! struct StopAfter {
//!     iters: usize,
//!     seen: usize,
//! }
//!
//! impl<E: HasResidual, A: CanStopEarly> Observer<E, A> for StopAfter {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         if event.residual().is_nan() {
//!             return None;
//!         }
//!         self.seen += 1;
//!         (self.seen >= self.iters).then(A::stop_early)
//!     }
//! }
//! ```

use pint_solvers::{newton, solver};

/// An event that carries a residual value.
pub trait HasResidual {
    /// Returns the residual for this event.
    ///
    /// Returns `f64::NAN` when the event carries no residual.
    fn residual(&self) -> f64;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

// --- HasResidual impls ---

impl<V> HasResidual for newton::Event<'_, V> {
    fn residual(&self) -> f64 {
        self.residual_norm
    }
}

impl<V> HasResidual for solver::Event<'_, V> {
    fn residual(&self) -> f64 {
        match self {
            solver::Event::Swept { check, .. } => check.measures.residual.unwrap_or(f64::NAN),
            solver::Event::Received { .. }
            | solver::Event::IntervalOpened { .. }
            | solver::Event::IntervalClosed { .. } => f64::NAN,
        }
    }
}

// --- CanStopEarly impls ---

impl CanStopEarly for newton::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

impl CanStopEarly for solver::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
