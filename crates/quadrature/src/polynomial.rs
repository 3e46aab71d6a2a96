//! Dense polynomials in the monomial basis.

/// A polynomial `c_0 + c_1 x + ... + c_d x^d` with ascending coefficients.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    pub(crate) fn new(coeffs: Vec<f64>) -> Self {
        if coeffs.is_empty() {
            return Self::constant(0.0);
        }
        Self { coeffs }
    }

    pub(crate) fn constant(c: f64) -> Self {
        Self { coeffs: vec![c] }
    }

    /// Returns the Lagrange basis polynomial `l_j` over `nodes`.
    ///
    /// `l_j` is one at `nodes[j]` and zero at every other node.
    pub(crate) fn lagrange_basis(nodes: &[f64], j: usize) -> Self {
        let xj = nodes[j];
        nodes
            .iter()
            .enumerate()
            .filter(|&(k, _)| k != j)
            .fold(Self::constant(1.0), |basis, (_, &xk)| {
                let denom = xj - xk;
                basis.mul(&Self::new(vec![-xk / denom, 1.0 / denom]))
            })
    }

    #[cfg(test)]
    pub(crate) fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Evaluates the polynomial at `x` with Horner's scheme.
    pub(crate) fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }

    pub(crate) fn mul(&self, other: &Self) -> Self {
        let mut coeffs = vec![0.0; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }
        Self { coeffs }
    }

    /// Returns the antiderivative with zero constant term.
    pub(crate) fn antiderivative(&self) -> Self {
        let mut coeffs = Vec::with_capacity(self.coeffs.len() + 1);
        coeffs.push(0.0);
        coeffs.extend(
            self.coeffs
                .iter()
                .enumerate()
                .map(|(i, c)| c / (i + 1) as f64),
        );
        Self { coeffs }
    }

    /// Returns the definite integral over `[a, b]`.
    pub(crate) fn integrate(&self, a: f64, b: f64) -> f64 {
        let anti = self.antiderivative();
        anti.eval(b) - anti.eval(a)
    }

    /// Returns `s -> p(shift + scale * s)`.
    pub(crate) fn compose_affine(&self, shift: f64, scale: f64) -> Self {
        let inner = Self::new(vec![shift, scale]);
        let mut coeffs = self.coeffs.iter().rev();
        let leading = coeffs.next().copied().unwrap_or(0.0);
        coeffs.fold(Self::constant(leading), |acc, &c| {
            let mut next = acc.mul(&inner);
            next.coeffs[0] += c;
            next
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn evaluates_and_integrates() {
        // 1 + 2x + 3x^2
        let p = Polynomial::new(vec![1.0, 2.0, 3.0]);

        assert_relative_eq!(p.eval(2.0), 17.0);
        assert_eq!(p.degree(), 2);
        // x + x^2 + x^3 on [0, 1]
        assert_relative_eq!(p.integrate(0.0, 1.0), 3.0);
    }

    #[test]
    fn lagrange_basis_is_cardinal() {
        let nodes = [-1.0, -0.2, 0.5, 1.0];
        for j in 0..nodes.len() {
            let basis = Polynomial::lagrange_basis(&nodes, j);
            assert_eq!(basis.degree(), nodes.len() - 1);
            for (k, &x) in nodes.iter().enumerate() {
                let expected = if j == k { 1.0 } else { 0.0 };
                assert_relative_eq!(basis.eval(x), expected, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn affine_composition() {
        // p(x) = x^2, p(1 + 2s) = 1 + 4s + 4s^2
        let p = Polynomial::new(vec![0.0, 0.0, 1.0]);
        let composed = p.compose_affine(1.0, 2.0);

        assert_eq!(composed, Polynomial::new(vec![1.0, 4.0, 4.0]));
    }
}
