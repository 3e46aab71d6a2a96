use std::fmt;

use nalgebra::{DMatrix, SymmetricEigen};

use crate::QuadratureError;

/// Which family of collocation nodes to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// Interval endpoints plus the roots of `P'_{n-1}`.
    #[default]
    GaussLobatto,

    /// Roots of the Legendre polynomial `P_n`; excludes the endpoints.
    GaussLegendre,
}

impl NodeKind {
    /// Returns the smallest node count the rule is defined for.
    #[must_use]
    pub fn min_nodes(self) -> usize {
        match self {
            Self::GaussLobatto => 2,
            Self::GaussLegendre => 1,
        }
    }

    /// Returns true if the first and last node coincide with the interval bounds.
    #[must_use]
    pub fn includes_endpoints(self) -> bool {
        matches!(self, Self::GaussLobatto)
    }

    /// Computes `num_nodes` strictly increasing nodes on `[-1, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`QuadratureError::TooFewNodes`] if `num_nodes` is below
    /// [`NodeKind::min_nodes`].
    pub fn standard_nodes(self, num_nodes: usize) -> Result<Vec<f64>, QuadratureError> {
        let min = self.min_nodes();
        if num_nodes < min {
            return Err(QuadratureError::TooFewNodes {
                kind: self,
                num_nodes,
                min,
            });
        }

        Ok(match self {
            Self::GaussLobatto => gauss_lobatto(num_nodes),
            Self::GaussLegendre => gauss_legendre(num_nodes),
        })
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GaussLobatto => f.write_str("Gauss-Lobatto"),
            Self::GaussLegendre => f.write_str("Gauss-Legendre"),
        }
    }
}

/// Gauss-Legendre nodes as eigenvalues of the Legendre Jacobi matrix.
fn gauss_legendre(num_nodes: usize) -> Vec<f64> {
    symmetric_tridiagonal_roots(num_nodes, |k| k / (4.0 * k * k - 1.0).sqrt())
}

/// Gauss-Lobatto nodes.
///
/// The interior nodes are the roots of `P'_{n-1}`, which are the zeros of the
/// Jacobi polynomial `P^{(1,1)}_{n-2}`. They are taken from the eigenvalues of
/// its Jacobi matrix rather than from a root search on the derivative.
fn gauss_lobatto(num_nodes: usize) -> Vec<f64> {
    let mut nodes = Vec::with_capacity(num_nodes);
    nodes.push(-1.0);
    nodes.extend(symmetric_tridiagonal_roots(num_nodes - 2, |k| {
        (k * (k + 2.0) / ((2.0 * k + 1.0) * (2.0 * k + 3.0))).sqrt()
    }));
    nodes.push(1.0);
    nodes
}

/// Returns the sorted eigenvalues of a zero-diagonal symmetric tridiagonal
/// matrix whose `k`-th off-diagonal entry (1-based) is `off_diagonal(k)`.
///
/// The spectrum of such a matrix is symmetric about zero, so the eigenvalues
/// are symmetrized to make mirrored nodes exact negatives of each other.
fn symmetric_tridiagonal_roots(size: usize, off_diagonal: impl Fn(f64) -> f64) -> Vec<f64> {
    if size == 0 {
        return Vec::new();
    }

    let mut jacobi = DMatrix::<f64>::zeros(size, size);
    for k in 1..size {
        let b = off_diagonal(k as f64);
        jacobi[(k - 1, k)] = b;
        jacobi[(k, k - 1)] = b;
    }

    let mut roots: Vec<f64> = SymmetricEigen::new(jacobi).eigenvalues.iter().copied().collect();
    roots.sort_by(f64::total_cmp);

    (0..size)
        .map(|i| 0.5 * (roots[i] - roots[size - 1 - i]))
        .collect()
}
