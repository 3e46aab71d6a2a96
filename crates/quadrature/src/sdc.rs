use nalgebra::DMatrix;
use pint_core::{SpatialValue, TimeInterval};
use tracing::debug;

use crate::{Config, NodeKind, QuadratureError};

/// Collocation nodes and spectral integration matrices on an interval.
///
/// For nodes `τ_0 < ... < τ_{n-1}`:
///
/// - `S` is `(n-1) × n`; row `i` integrates the node interpolant over
///   `[τ_i, τ_{i+1}]`.
/// - `Q` is `n × n`; row `0` is zero and row `i` sums `S` rows `0..i`, so it
///   integrates over `[τ_0, τ_i]`.
///
/// Both matrices depend on the interval width but not on its position, so
/// [`SdcQuadrature::transform`] only rebuilds them when the width changes.
#[derive(Debug, Clone)]
pub struct SdcQuadrature {
    config: Config,
    standard_nodes: Vec<f64>,
    interval: TimeInterval,
    nodes: Vec<f64>,
    weights: Vec<f64>,
    s_matrix: DMatrix<f64>,
    q_matrix: DMatrix<f64>,
}

impl SdcQuadrature {
    /// Computes nodes and integration matrices for `config` on `interval`.
    ///
    /// # Errors
    ///
    /// Returns an error if the node rule is not defined for the configured
    /// node count.
    pub fn new(config: Config, interval: TimeInterval) -> Result<Self, QuadratureError> {
        let standard_nodes = config.nodes().standard_nodes(config.num_nodes())?;
        let n = standard_nodes.len();
        let mut quadrature = Self {
            config,
            standard_nodes,
            interval: TimeInterval::STANDARD,
            nodes: Vec::new(),
            weights: Vec::new(),
            s_matrix: DMatrix::zeros(n - 1, n),
            q_matrix: DMatrix::zeros(n, n),
        };
        quadrature.place_nodes(interval);
        quadrature.build_matrices();
        Ok(quadrature)
    }

    /// Moves the nodes onto `interval`.
    ///
    /// Nodes are rescaled linearly from the standard rule. The integration
    /// matrices are rebuilt only if the width of the interval changed.
    pub fn transform(&mut self, interval: TimeInterval) {
        let old_width = self.interval.width();
        let resized = (interval.width() - old_width).abs() > 4.0 * f64::EPSILON * old_width;

        self.place_nodes(interval);
        if resized {
            debug!(
                from = old_width,
                to = interval.width(),
                "interval width changed, rebuilding integration matrices"
            );
            self.build_matrices();
        }
    }

    /// Integrates `data`, given at every node, from `from_node` to `target_node`.
    ///
    /// Uses row `target_node` of `Q` when integrating from the first node, a
    /// single row of `S` for adjacent nodes, and otherwise accumulates the
    /// `S` rows across the span.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` does not hold one value per node, if
    /// `target_node` is past the last node, or if `from_node >= target_node`.
    pub fn apply<V: SpatialValue>(
        &self,
        data: &[V],
        from_node: usize,
        target_node: usize,
    ) -> Result<V, QuadratureError> {
        let n = self.num_nodes();
        if data.len() != n {
            return Err(QuadratureError::DataLength {
                expected: n,
                actual: data.len(),
            });
        }
        if target_node >= n {
            return Err(QuadratureError::TargetOutOfRange {
                target: target_node,
                max: n - 1,
            });
        }
        if from_node >= target_node {
            return Err(QuadratureError::EmptySpan {
                from: from_node,
                target: target_node,
            });
        }

        let mut integral = data[0].zeroed();
        if from_node == 0 {
            accumulate_row(&mut integral, self.q_matrix.row(target_node).iter(), data);
        } else {
            for row in from_node..target_node {
                accumulate_row(&mut integral, self.s_matrix.row(row).iter(), data);
            }
        }
        Ok(integral)
    }

    /// Integrates `data` over the whole interval with [`SdcQuadrature::weights`].
    ///
    /// # Errors
    ///
    /// Returns an error if `data` does not hold one value per node.
    pub fn integrate<V: SpatialValue>(&self, data: &[V]) -> Result<V, QuadratureError> {
        if data.len() != self.num_nodes() {
            return Err(QuadratureError::DataLength {
                expected: self.num_nodes(),
                actual: data.len(),
            });
        }
        let mut integral = data[0].zeroed();
        accumulate_row(&mut integral, self.weights.iter(), data);
        Ok(integral)
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn node_kind(&self) -> NodeKind {
        self.config.nodes()
    }

    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the interval the nodes currently live on.
    #[must_use]
    pub fn interval(&self) -> TimeInterval {
        self.interval
    }

    /// Returns the node positions on the current interval.
    #[must_use]
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Returns the spacing `τ_{i+1} - τ_i` between consecutive nodes.
    #[must_use]
    pub fn deltas(&self) -> Vec<f64> {
        self.nodes.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Returns the weights integrating over the whole interval.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[must_use]
    pub fn s_matrix(&self) -> &DMatrix<f64> {
        &self.s_matrix
    }

    #[must_use]
    pub fn q_matrix(&self) -> &DMatrix<f64> {
        &self.q_matrix
    }

    fn place_nodes(&mut self, interval: TimeInterval) {
        self.nodes = self
            .standard_nodes
            .iter()
            .map(|&x| TimeInterval::STANDARD.map_to(x, &interval))
            .collect();
        if self.config.nodes().includes_endpoints() {
            let last = self.nodes.len() - 1;
            self.nodes[0] = interval.start();
            self.nodes[last] = interval.end();
        }
        self.interval = interval;
    }

    fn build_matrices(&mut self) {
        let n = self.nodes.len();
        let weights = self.config.weights();

        self.weights = weights.integrals(
            &self.nodes,
            &self.interval,
            self.interval.start(),
            self.interval.end(),
        );

        let mut s_matrix = DMatrix::zeros(n - 1, n);
        for i in 0..n - 1 {
            let row = weights.integrals(&self.nodes, &self.interval, self.nodes[i], self.nodes[i + 1]);
            for (j, w) in row.into_iter().enumerate() {
                s_matrix[(i, j)] = w;
            }
        }

        let mut q_matrix = DMatrix::zeros(n, n);
        for i in 0..n - 1 {
            for j in 0..n {
                q_matrix[(i + 1, j)] = q_matrix[(i, j)] + s_matrix[(i, j)];
            }
        }

        self.s_matrix = s_matrix;
        self.q_matrix = q_matrix;
    }
}

fn accumulate_row<'a, V: SpatialValue>(
    integral: &mut V,
    row: impl Iterator<Item = &'a f64>,
    data: &[V],
) {
    for (&w, value) in row.zip(data) {
        integral.axpy(w, value);
    }
}
