use pint_core::TimeInterval;

use crate::{QuadratureError, polynomial::Polynomial};

/// A polynomial weight function `w(x) = sum_i c_i x^i`.
///
/// Quadrature weights are the integrals of `w` times each Lagrange basis
/// polynomial over the nodes. The default is the constant function `1`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolynomialWeights {
    coefficients: Vec<f64>,
}

impl Default for PolynomialWeights {
    fn default() -> Self {
        Self {
            coefficients: vec![1.0],
        }
    }
}

impl PolynomialWeights {
    /// Creates a weight function from ascending coefficients.
    ///
    /// # Errors
    ///
    /// Returns an error if `coefficients` is empty or contains a non-finite value.
    pub fn new(coefficients: Vec<f64>) -> Result<Self, QuadratureError> {
        if coefficients.is_empty() {
            return Err(QuadratureError::EmptyWeights);
        }
        if let Some((power, &coefficient)) =
            coefficients.iter().enumerate().find(|(_, c)| !c.is_finite())
        {
            return Err(QuadratureError::NonFiniteWeight { coefficient, power });
        }
        Ok(Self { coefficients })
    }

    /// Sets the coefficient of `x^power`, extending with zeros as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if `coefficient` is not finite.
    pub fn add_coefficient(&mut self, coefficient: f64, power: usize) -> Result<(), QuadratureError> {
        if !coefficient.is_finite() {
            return Err(QuadratureError::NonFiniteWeight { coefficient, power });
        }
        if self.coefficients.len() <= power {
            self.coefficients.resize(power + 1, 0.0);
        }
        self.coefficients[power] = coefficient;
        Ok(())
    }

    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Evaluates the weight function at `x`.
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        self.polynomial().eval(x)
    }

    /// Returns `∫_a^b w(x) l_j(x) dx` for every Lagrange basis `l_j` over `nodes`.
    ///
    /// The nodes live on `interval`; the integrals are evaluated in the local
    /// coordinate `s` of `x = center + half_width * s` so the monomial
    /// coefficients stay well scaled regardless of where the interval lies.
    pub(crate) fn integrals(&self, nodes: &[f64], interval: &TimeInterval, a: f64, b: f64) -> Vec<f64> {
        let half_width = 0.5 * interval.width();
        let center = interval.start() + half_width;
        let local = |x: f64| (x - center) / half_width;

        let local_nodes: Vec<f64> = nodes.iter().map(|&x| local(x)).collect();
        let weight = self.polynomial().compose_affine(center, half_width);
        let (sa, sb) = (local(a), local(b));

        (0..local_nodes.len())
            .map(|j| {
                let integrand = weight.mul(&Polynomial::lagrange_basis(&local_nodes, j));
                half_width * integrand.integrate(sa, sb)
            })
            .collect()
    }

    fn polynomial(&self) -> Polynomial {
        Polynomial::new(self.coefficients.clone())
    }
}
