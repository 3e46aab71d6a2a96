use crate::state::StateError;

/// The solution at a single time point with optional diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct StepSolutionData<V> {
    value: V,
    time_point: f64,
    error: Option<f64>,
    residual: Option<f64>,
    finalized: bool,
}

impl<V> StepSolutionData<V> {
    #[must_use]
    pub fn new(value: V, time_point: f64) -> Self {
        Self {
            value,
            time_point,
            error: None,
            residual: None,
            finalized: false,
        }
    }

    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    #[must_use]
    pub fn time_point(&self) -> f64 {
        self.time_point
    }

    /// Returns the distance to the exact solution, if it was computed.
    #[must_use]
    pub fn error(&self) -> Option<f64> {
        self.error
    }

    /// Returns the collocation residual, if it was computed.
    #[must_use]
    pub fn residual(&self) -> Option<f64> {
        self.residual
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Replaces the value.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyFinalized`] after [`Self::finalize`].
    pub fn set_value(&mut self, value: V) -> Result<(), StateError> {
        self.check_mutable()?;
        self.value = value;
        Ok(())
    }

    /// Replaces the time point.
    ///
    /// # Errors
    ///
    /// Returns an error after [`Self::finalize`] or if `time_point` is not finite.
    pub fn set_time_point(&mut self, time_point: f64) -> Result<(), StateError> {
        self.check_mutable()?;
        if !time_point.is_finite() {
            return Err(StateError::NonFiniteTimePoint(time_point));
        }
        self.time_point = time_point;
        Ok(())
    }

    /// Records the error against the exact solution.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyFinalized`] after [`Self::finalize`].
    pub fn set_error(&mut self, error: f64) -> Result<(), StateError> {
        self.check_mutable()?;
        self.error = Some(error);
        Ok(())
    }

    /// Records the collocation residual.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyFinalized`] after [`Self::finalize`].
    pub fn set_residual(&mut self, residual: f64) -> Result<(), StateError> {
        self.check_mutable()?;
        self.residual = Some(residual);
        Ok(())
    }

    /// Makes the record read-only.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyFinalized`] if called twice.
    pub fn finalize(&mut self) -> Result<(), StateError> {
        self.check_mutable()?;
        self.finalized = true;
        Ok(())
    }

    fn check_mutable(&self) -> Result<(), StateError> {
        if self.finalized {
            Err(StateError::AlreadyFinalized("step solution"))
        } else {
            Ok(())
        }
    }
}
