use thiserror::Error;

/// Errors raised by misuse of solution records and solver states.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum StateError {
    #[error("{0} is already finalized")]
    AlreadyFinalized(&'static str),

    #[error("{0} must be finalized first")]
    NotFinalized(&'static str),

    #[error("time point {time} does not follow {previous}")]
    NonIncreasingTimePoint { previous: f64, time: f64 },

    #[error("time point {0} is not finite")]
    NonFiniteTimePoint(f64),

    #[error("no state at index {0}")]
    MissingState(usize),

    #[error("an interval needs at least one time step with two nodes")]
    EmptyLayout,
}
