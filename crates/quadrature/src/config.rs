use crate::{NodeKind, PolynomialWeights, QuadratureError};

/// Configuration for an [`SdcQuadrature`](crate::SdcQuadrature).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    num_nodes: usize,
    nodes: NodeKind,
    weights: PolynomialWeights,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(3, NodeKind::GaussLobatto, PolynomialWeights::default()).unwrap()
    }
}

impl Config {
    /// Creates a validated quadrature config.
    ///
    /// # Errors
    ///
    /// Returns [`QuadratureError::TooFewNodes`] if the node rule is not
    /// defined for `num_nodes`.
    pub fn new(
        num_nodes: usize,
        nodes: NodeKind,
        weights: PolynomialWeights,
    ) -> Result<Self, QuadratureError> {
        let min = nodes.min_nodes();
        if num_nodes < min {
            return Err(QuadratureError::TooFewNodes {
                kind: nodes,
                num_nodes,
                min,
            });
        }

        Ok(Self {
            num_nodes,
            nodes,
            weights,
        })
    }

    /// Creates a Gauss-Lobatto config with constant weights.
    ///
    /// # Errors
    ///
    /// Returns an error if `num_nodes < 2`.
    pub fn gauss_lobatto(num_nodes: usize) -> Result<Self, QuadratureError> {
        Self::new(num_nodes, NodeKind::GaussLobatto, PolynomialWeights::default())
    }

    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    #[must_use]
    pub fn nodes(&self) -> NodeKind {
        self.nodes
    }

    #[must_use]
    pub fn weights(&self) -> &PolynomialWeights {
        &self.weights
    }
}
