//! Reusable observers for pint solvers.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work across the solvers in `pint-solvers`.
//!
//! # Modules
//!
//! - [`traits`] — Capability traits for cross-solver observers
//!   ([`HasResidual`], [`CanStopEarly`])
//! - [`history`] — [`HistoryRecorder`], which keeps a compact record of sweeps
//!   and intervals for later analysis
//!
//! [`TracingObserver`] forwards solver events to `tracing` at a chosen
//! [`Verbosity`], and [`ResidualStop`] stops any solver whose events carry a
//! residual once it is small enough.
//!
//! [`Observer`]: pint_core::Observer
//! [`HasResidual`]: traits::HasResidual
//! [`CanStopEarly`]: traits::CanStopEarly

pub mod history;
pub mod traits;

mod residual_stop;
mod tracing_observer;

pub use history::HistoryRecorder;
pub use residual_stop::ResidualStop;
pub use tracing_observer::{TracingObserver, Verbosity};
