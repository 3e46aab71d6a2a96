//! Spectral deferred correction solvers for pint.
//!
//! # Modules
//!
//! - [`solution`] — Records of node values, trajectories, and iterations
//! - [`state`] — The nested state an SDC solver iterates on
//! - [`sweep`] — Sweep cores ([`Explicit`], [`Implicit`], [`SemiImplicit`])
//!   and the sweep over one iteration
//! - [`threshold`] — Convergence checks between sweeps
//! - [`newton`] — Newton's method for implicit node updates
//! - [`communicator`] — Message passing between solver instances
//! - [`solver`] — The SDC solver instance and the time-parallel [`Pipeline`]
//!
//! [`Explicit`]: sweep::Explicit
//! [`Implicit`]: sweep::Implicit
//! [`SemiImplicit`]: sweep::SemiImplicit
//! [`Pipeline`]: solver::Pipeline

pub mod communicator;
pub mod newton;
pub mod solution;
pub mod solver;
pub mod state;
pub mod sweep;
pub mod threshold;
