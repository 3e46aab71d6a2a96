use thiserror::Error;

use crate::NodeKind;

/// Errors raised while configuring or applying an SDC quadrature.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuadratureError {
    #[error("{kind} rules need at least {min} nodes, got {num_nodes}")]
    TooFewNodes {
        kind: NodeKind,
        num_nodes: usize,
        min: usize,
    },

    #[error("weight polynomial needs at least one coefficient")]
    EmptyWeights,

    #[error("weight coefficient {coefficient} for power {power} is not finite")]
    NonFiniteWeight { coefficient: f64, power: usize },

    #[error("target node {target} out of range, must be at most {max}")]
    TargetOutOfRange { target: usize, max: usize },

    #[error("integration must span at least two nodes: {from} !< {target}")]
    EmptySpan { from: usize, target: usize },

    #[error("expected one value per node ({expected}), got {actual}")]
    DataLength { expected: usize, actual: usize },
}
