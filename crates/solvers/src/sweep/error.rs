use std::error::Error as StdError;

use pint_core::DirectImplicitError;
use pint_quadrature::QuadratureError;
use thiserror::Error;

use crate::{newton, state::StateError};

/// Errors that can occur while sweeping an iteration.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("implicit update at t = {time} is singular (denominator {denominator:e})")]
    SingularImplicit { time: f64, denominator: f64 },

    #[error("root finder failed at t = {time}")]
    RootFinder {
        time: f64,
        #[source]
        source: newton::Error,
    },

    #[error("root finder stopped after {iters} iterations at t = {time} (residual {residual:e})")]
    RootFinderStalled {
        time: f64,
        iters: usize,
        residual: f64,
    },

    #[error("updated value at t = {time} is not finite")]
    NonFinite { time: f64 },

    #[error("right-hand side missing at t = {time}")]
    MissingRhs { time: f64 },

    #[error("no iteration to sweep")]
    NoIteration,

    #[error("quadrature failed: {0}")]
    Quadrature(#[from] QuadratureError),

    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("problem error")]
    Problem(#[source] Box<dyn StdError + Send + Sync>),
}

impl SweepError {
    /// Wraps an error reported by the problem.
    pub fn problem(error: impl StdError + Send + Sync + 'static) -> Self {
        Self::Problem(Box::new(error))
    }

    pub(crate) fn from_direct<E>(error: DirectImplicitError<E>, time: f64) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        match error {
            DirectImplicitError::Singular { denominator } => {
                Self::SingularImplicit { time, denominator }
            }
            DirectImplicitError::Problem(e) => Self::problem(e),
        }
    }
}
