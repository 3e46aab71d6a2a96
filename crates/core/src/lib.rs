//! Core traits and types for pint, a spectral deferred correction integrator.
//!
//! This crate defines the shared abstractions that the quadrature engine,
//! solvers, and observers build on:
//!
//! - [`Problem`] — an initial value problem with a split right-hand side and
//!   optional capabilities ([`ExactSolution`], [`DirectImplicit`])
//! - [`SpatialValue`] — the vector arithmetic a sweep needs from solution values
//! - [`TimeInterval`] — a validated `[start, end]` interval with affine maps
//! - [`Observer`] — receives solver events and optionally returns control actions

mod interval;
mod observer;
mod problem;
mod spatial;

pub use interval::{IntervalError, TimeInterval};
pub use observer::Observer;
pub use problem::{
    DirectImplicit, DirectImplicitError, DirectImplicitStep, ExactSolution, ImplicitEquation,
    Problem, RhsPart, Splitting,
};
pub use spatial::SpatialValue;
