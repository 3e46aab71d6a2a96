use pint_core::{Problem, SpatialValue};

use super::{NodeStep, SweepCore, SweepError};

/// Forward Euler correction.
///
/// `u_{m+1} = u_m^{k+1} + Δτ (F(t_m, u_m^{k+1}) - F(t_m, u_m^k)) + ΔI`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Explicit;

impl SweepCore for Explicit {
    fn name(&self) -> &'static str {
        "explicit"
    }

    fn update<P>(&self, _problem: &P, step: &NodeStep<'_, P::Value>) -> Result<P::Value, SweepError>
    where
        P: Problem + ?Sized,
    {
        let mut value = step.previous.clone();
        value.axpy(step.delta_tau, step.previous_rhs);
        value.axpy(-step.delta_tau, step.previous_iteration_previous_rhs);
        value.axpy(1.0, step.integral);
        Ok(value)
    }
}
