use std::error::Error as StdError;

use thiserror::Error;

use crate::{SpatialValue, TimeInterval};

/// Which part of the right-hand side `F = F_E + F_I` to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RhsPart {
    /// The complete right-hand side `F`.
    Full,

    /// The explicitly treated part `F_E`.
    Explicit,

    /// The implicitly treated part `F_I`.
    Implicit,
}

/// Defines an initial value problem `u'(t) = F(t, u(t))`, `u(t_0) = u_0`.
///
/// The problem is the only place where the right-hand side, implicit solves,
/// and reference solutions live. Optional capabilities are exposed through
/// accessor methods that return `None` unless the problem provides them:
///
/// - [`Problem::exact_solution`] enables error diagnostics.
/// - [`Problem::direct_implicit`] supplies a closed-form implicit update that
///   sweeps prefer over a root finder.
/// - [`Problem::implicit_solve`] supplies a problem-specific root finder for
///   implicit equations; when absent, solvers fall back to a generic one.
pub trait Problem {
    type Value: SpatialValue;
    type Error: StdError + Send + Sync + 'static;

    /// Returns the time interval `[t_0, t_end]` to integrate over.
    fn time_interval(&self) -> TimeInterval;

    /// Returns the initial value `u(t_0)`.
    fn initial_value(&self) -> Self::Value;

    /// Evaluates the right-hand side (or one of its parts) at `time`.
    ///
    /// Problems that do not distinguish explicit and implicit parts should
    /// return `F` for [`RhsPart::Full`] and [`RhsPart::Implicit`], and zero for
    /// [`RhsPart::Explicit`].
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the right-hand side cannot be evaluated.
    fn evaluate(
        &self,
        time: f64,
        value: &Self::Value,
        part: RhsPart,
    ) -> Result<Self::Value, Self::Error>;

    /// Solves `x = explicit_terms + delta_tau * F_I(time, x)` for `x`, where
    /// `F_I` is the part named by [`ImplicitEquation::part`].
    ///
    /// Returns `None` if the problem has no dedicated solver, in which case
    /// the caller applies a generic root finder to
    /// [`ImplicitEquation::residual`]. The default implementation returns
    /// `None`.
    fn implicit_solve(
        &self,
        _guess: &Self::Value,
        _equation: &ImplicitEquation<'_, Self::Value>,
    ) -> Option<Result<Self::Value, Self::Error>> {
        None
    }

    /// Returns the exact solution provider, if the problem has one.
    fn exact_solution(&self) -> Option<&dyn ExactSolution<Self::Value, Error = Self::Error>> {
        None
    }

    /// Returns the closed-form implicit solver, if the problem has one.
    fn direct_implicit(&self) -> Option<&dyn DirectImplicit<Self::Value, Error = Self::Error>> {
        None
    }
}

/// Provides the exact solution of a problem for error diagnostics.
pub trait ExactSolution<V> {
    type Error;

    /// Returns `u(time)`.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the solution cannot be evaluated at `time`.
    fn exact(&self, time: f64) -> Result<V, Self::Error>;
}

/// Which implicit correction formula a direct solve is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Splitting {
    /// The whole right-hand side is treated implicitly.
    FullyImplicit,

    /// `F_E` is treated explicitly and `F_I` implicitly.
    SemiImplicit,
}

/// Inputs to a closed-form implicit node update.
///
/// Node `m` is the previous node and `m + 1` the node being computed;
/// superscript `k` is the previous iteration and `k + 1` the current one.
#[derive(Debug, Clone, Copy)]
pub struct DirectImplicitStep<'a, V> {
    /// Which correction formula to solve.
    pub splitting: Splitting,

    /// Time point `t_{m+1}` of the node being computed.
    pub time: f64,

    /// Distance `t_{m+1} - t_m` to the previous node.
    pub delta_tau: f64,

    /// Width of the enclosing time step.
    pub delta_step: f64,

    /// `u_m^k`.
    pub previous_iteration_previous_node: &'a V,

    /// `u_{m+1}^k`.
    pub previous_iteration_current_node: &'a V,

    /// `u_m^{k+1}`.
    pub previous_node: &'a V,

    /// Quadrature of the previous iteration's right-hand side over `[t_m, t_{m+1}]`.
    pub integral: &'a V,
}

/// Errors a closed-form implicit update can report.
#[derive(Debug, Error)]
pub enum DirectImplicitError<E> {
    /// The formula's denominator vanishes for this step size.
    #[error("direct implicit formula is singular (denominator {denominator:e})")]
    Singular { denominator: f64 },

    #[error("problem error")]
    Problem(#[source] E),
}

/// Provides a closed-form solution of the implicit node update.
pub trait DirectImplicit<V> {
    type Error;

    /// Computes `u_{m+1}^{k+1}` directly.
    ///
    /// # Errors
    ///
    /// Returns [`DirectImplicitError::Singular`] if the formula cannot be
    /// applied for the given step, or a problem error otherwise.
    fn solve_direct(
        &self,
        step: &DirectImplicitStep<'_, V>,
    ) -> Result<V, DirectImplicitError<Self::Error>>;
}

/// The implicit equation `x = explicit_terms + delta_tau * F_I(time, x)`.
#[derive(Debug, Clone, Copy)]
pub struct ImplicitEquation<'a, V> {
    /// Time point at which `F_I` is evaluated.
    pub time: f64,

    /// The part of the right-hand side treated implicitly.
    ///
    /// [`RhsPart::Full`] for fully implicit sweeps, [`RhsPart::Implicit`] for
    /// semi-implicit ones.
    pub part: RhsPart,

    /// Factor in front of `F_I`.
    pub delta_tau: f64,

    /// All terms of the update that do not depend on `x`.
    pub explicit_terms: &'a V,
}

impl<V: SpatialValue> ImplicitEquation<'_, V> {
    /// Evaluates `explicit_terms + delta_tau * F_I(time, x) - x`, with `F_I`
    /// being the configured [`ImplicitEquation::part`].
    ///
    /// A root of this residual solves the implicit equation.
    ///
    /// # Errors
    ///
    /// Returns the problem's error if `F_I` cannot be evaluated.
    pub fn residual<P>(&self, problem: &P, x: &V) -> Result<V, P::Error>
    where
        P: Problem<Value = V> + ?Sized,
    {
        let mut residual = self.explicit_terms.clone();
        let implicit = problem.evaluate(self.time, x, self.part)?;
        residual.axpy(self.delta_tau, &implicit);
        residual.axpy(-1.0, x);
        Ok(residual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;

    /// u' = -u on [0, 1] with u(0) = 1.
    struct Decay;

    impl Problem for Decay {
        type Value = f64;
        type Error = Infallible;

        fn time_interval(&self) -> TimeInterval {
            TimeInterval::new(0.0, 1.0).unwrap()
        }

        fn initial_value(&self) -> f64 {
            1.0
        }

        fn evaluate(&self, _time: f64, value: &f64, part: RhsPart) -> Result<f64, Infallible> {
            Ok(match part {
                RhsPart::Full | RhsPart::Implicit => -value,
                RhsPart::Explicit => 0.0,
            })
        }
    }

    #[test]
    fn capabilities_default_to_absent() {
        let problem = Decay;
        let equation = ImplicitEquation {
            time: 0.0,
            part: RhsPart::Implicit,
            delta_tau: 0.1,
            explicit_terms: &1.0,
        };

        assert!(problem.exact_solution().is_none());
        assert!(problem.direct_implicit().is_none());
        assert!(problem.implicit_solve(&1.0, &equation).is_none());
    }

    #[test]
    fn implicit_residual_vanishes_at_solution() {
        let problem = Decay;
        let equation = ImplicitEquation {
            time: 0.0,
            part: RhsPart::Full,
            delta_tau: 0.5,
            explicit_terms: &1.5,
        };

        // x = 1.5 - 0.5 x  =>  x = 1
        let at_root = equation.residual(&problem, &1.0).unwrap();
        assert_relative_eq!(at_root, 0.0);

        let off_root = equation.residual(&problem, &2.0).unwrap();
        assert_relative_eq!(off_root, -1.5);
    }
}
