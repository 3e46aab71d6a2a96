use pint_core::IntervalError;

use crate::{communicator::CommunicatorError, state::StateError, sweep::SweepError};

use super::ConfigError;

/// Errors that can end an SDC solver instance.
///
/// Failures reported by an upstream instance are not errors of the receiving
/// instance; they end its run with [`super::Status::Failed`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("time step {0} must be finite and positive")]
    InvalidTimeStep(f64),

    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid interval: {0}")]
    Interval(#[from] IntervalError),

    #[error("sweep failed: {0}")]
    Sweep(#[from] SweepError),

    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("communication failed: {0}")]
    Communicator(#[from] CommunicatorError),

    #[error("no instance can make progress")]
    Stalled,
}
