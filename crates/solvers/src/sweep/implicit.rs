use pint_core::{ImplicitEquation, Problem, RhsPart, SpatialValue, Splitting};

use crate::newton;

use super::{NodeStep, SweepCore, SweepError, solve_implicit};

/// Backward Euler correction with the whole right-hand side implicit.
///
/// `u_{m+1} - Δτ F(t_{m+1}, u_{m+1}) = u_m^{k+1} - Δτ F(t_{m+1}, u_{m+1}^k) + ΔI`
///
/// A closed-form update from [`Problem::direct_implicit`] is used when the
/// problem has one. Otherwise the problem's own implicit solver, and finally
/// Newton's method configured by `root_finder`, solve the equation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Implicit {
    pub root_finder: newton::Config,
}

impl Implicit {
    #[must_use]
    pub fn with_root_finder(root_finder: newton::Config) -> Self {
        Self { root_finder }
    }
}

impl SweepCore for Implicit {
    fn name(&self) -> &'static str {
        "implicit"
    }

    fn update<P>(&self, problem: &P, step: &NodeStep<'_, P::Value>) -> Result<P::Value, SweepError>
    where
        P: Problem + ?Sized,
    {
        if let Some(direct) = problem.direct_implicit() {
            return direct
                .solve_direct(&step.direct(Splitting::FullyImplicit))
                .map_err(|e| SweepError::from_direct(e, step.time));
        }

        let mut explicit_terms = step.previous.clone();
        explicit_terms.axpy(-step.delta_tau, step.previous_iteration_current_rhs);
        explicit_terms.axpy(1.0, step.integral);

        let equation = ImplicitEquation {
            time: step.time,
            part: RhsPart::Full,
            delta_tau: step.delta_tau,
            explicit_terms: &explicit_terms,
        };
        solve_implicit(problem, step.previous_iteration_current, &equation, &self.root_finder)
    }
}
