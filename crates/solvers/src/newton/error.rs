use std::error::Error as StdError;

use thiserror::Error;

/// Errors that can occur during Newton solving.
#[derive(Debug, Error)]
pub enum Error {
    #[error("residual is not finite at x = {x:?}")]
    NonFiniteResidual { x: Vec<f64> },

    #[error("jacobian is singular in iteration {iter}")]
    SingularJacobian { iter: usize },

    #[error("residual evaluation failed")]
    Problem(#[source] Box<dyn StdError + Send + Sync>),
}
