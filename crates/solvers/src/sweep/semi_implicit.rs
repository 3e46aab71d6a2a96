use pint_core::{ImplicitEquation, Problem, RhsPart, SpatialValue, Splitting};

use crate::newton;

use super::{NodeStep, SweepCore, SweepError, evaluate, solve_implicit};

/// IMEX correction for `F = F_E + F_I`.
///
/// ```text
/// u_{m+1} - Δτ F_I(t_{m+1}, u_{m+1})
///     = u_m^{k+1} + Δτ (F_E(t_m, u_m^{k+1}) - F_E(t_m, u_m^k) - F_I(t_{m+1}, u_{m+1}^k)) + ΔI
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SemiImplicit {
    pub root_finder: newton::Config,
}

impl SemiImplicit {
    #[must_use]
    pub fn with_root_finder(root_finder: newton::Config) -> Self {
        Self { root_finder }
    }
}

impl SweepCore for SemiImplicit {
    fn name(&self) -> &'static str {
        "semi-implicit"
    }

    fn update<P>(&self, problem: &P, step: &NodeStep<'_, P::Value>) -> Result<P::Value, SweepError>
    where
        P: Problem + ?Sized,
    {
        if let Some(direct) = problem.direct_implicit() {
            return direct
                .solve_direct(&step.direct(Splitting::SemiImplicit))
                .map_err(|e| SweepError::from_direct(e, step.time));
        }

        let explicit_now = evaluate(problem, step.previous_time, step.previous, RhsPart::Explicit)?;
        let explicit_before = evaluate(
            problem,
            step.previous_time,
            step.previous_iteration_previous,
            RhsPart::Explicit,
        )?;
        let implicit_before = evaluate(
            problem,
            step.time,
            step.previous_iteration_current,
            RhsPart::Implicit,
        )?;

        let mut explicit_terms = step.previous.clone();
        explicit_terms.axpy(step.delta_tau, &explicit_now);
        explicit_terms.axpy(-step.delta_tau, &explicit_before);
        explicit_terms.axpy(-step.delta_tau, &implicit_before);
        explicit_terms.axpy(1.0, step.integral);

        let equation = ImplicitEquation {
            time: step.time,
            part: RhsPart::Implicit,
            delta_tau: step.delta_tau,
            explicit_terms: &explicit_terms,
        };
        solve_implicit(problem, step.previous_iteration_current, &equation, &self.root_finder)
    }
}
