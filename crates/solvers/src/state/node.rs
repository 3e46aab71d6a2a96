use pint_core::SpatialValue;

use crate::solution::StepSolutionData;

use super::{Finalize, StateError};

/// Working data of one collocation node.
///
/// The node's value lives in its [`StepSolutionData`], so finalizing the node
/// freezes the value together with its residual and error. The right-hand
/// side cache is dropped whenever the value changes.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeState<V> {
    solution: StepSolutionData<V>,
    delta_tau: f64,
    rhs: Option<V>,
    integral: V,
}

impl<V: SpatialValue> NodeState<V> {
    /// Allocates a zero-valued node shaped like `template`.
    #[must_use]
    pub fn zeroed(template: &V, time_point: f64, delta_tau: f64) -> Self {
        Self::new(template.zeroed(), time_point, delta_tau)
    }

    #[must_use]
    pub fn new(value: V, time_point: f64, delta_tau: f64) -> Self {
        let integral = value.zeroed();
        Self {
            solution: StepSolutionData::new(value, time_point),
            delta_tau,
            rhs: None,
            integral,
        }
    }
}

impl<V> NodeState<V> {
    #[must_use]
    pub fn value(&self) -> &V {
        self.solution.value()
    }

    #[must_use]
    pub fn time_point(&self) -> f64 {
        self.solution.time_point()
    }

    /// Returns the distance to the previous node of the time step.
    #[must_use]
    pub fn delta_tau(&self) -> f64 {
        self.delta_tau
    }

    /// Returns the cached right-hand side, if it is valid for the current value.
    #[must_use]
    pub fn rhs(&self) -> Option<&V> {
        self.rhs.as_ref()
    }

    #[must_use]
    pub fn rhs_evaluated(&self) -> bool {
        self.rhs.is_some()
    }

    /// Returns the quadrature of the right-hand side from the previous node.
    #[must_use]
    pub fn integral(&self) -> &V {
        &self.integral
    }

    #[must_use]
    pub fn solution(&self) -> &StepSolutionData<V> {
        &self.solution
    }

    /// Replaces the value and invalidates the right-hand side cache.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyFinalized`] on a finalized node.
    pub fn set_value(&mut self, value: V) -> Result<(), StateError> {
        self.solution.set_value(value)?;
        self.rhs = None;
        Ok(())
    }

    /// Replaces the value together with its already evaluated right-hand side.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyFinalized`] on a finalized node.
    pub fn set_value_with_rhs(&mut self, value: V, rhs: V) -> Result<(), StateError> {
        self.solution.set_value(value)?;
        self.rhs = Some(rhs);
        Ok(())
    }

    /// Caches the right-hand side of the current value.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyFinalized`] on a finalized node.
    pub fn set_rhs(&mut self, rhs: V) -> Result<(), StateError> {
        self.check_mutable()?;
        self.rhs = Some(rhs);
        Ok(())
    }

    /// Stores the quadrature term used by the next correction.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyFinalized`] on a finalized node.
    pub fn set_integral(&mut self, integral: V) -> Result<(), StateError> {
        self.check_mutable()?;
        self.integral = integral;
        Ok(())
    }

    /// Moves the node in time.
    ///
    /// # Errors
    ///
    /// Returns an error on a finalized node or for a non-finite time point.
    pub fn set_time_point(&mut self, time_point: f64, delta_tau: f64) -> Result<(), StateError> {
        self.solution.set_time_point(time_point)?;
        self.delta_tau = delta_tau;
        self.rhs = None;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`StateError::AlreadyFinalized`] on a finalized node.
    pub fn set_residual(&mut self, residual: f64) -> Result<(), StateError> {
        self.solution.set_residual(residual)
    }

    /// # Errors
    ///
    /// Returns [`StateError::AlreadyFinalized`] on a finalized node.
    pub fn set_error(&mut self, error: f64) -> Result<(), StateError> {
        self.solution.set_error(error)
    }

    fn check_mutable(&self) -> Result<(), StateError> {
        if self.solution.is_finalized() {
            Err(StateError::AlreadyFinalized("node"))
        } else {
            Ok(())
        }
    }
}

impl<V> Finalize for NodeState<V> {
    fn finalize(&mut self) -> Result<(), StateError> {
        self.solution
            .finalize()
            .map_err(|_| StateError::AlreadyFinalized("node"))
    }

    fn is_finalized(&self) -> bool {
        self.solution.is_finalized()
    }
}
