use std::fmt;

use thiserror::Error;

/// A quantity that can end the iteration over an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    /// Largest collocation residual of the newest iteration.
    Residual,

    /// Largest error against the exact solution.
    Error,

    /// Largest change of the error from the previous iteration.
    ErrorReduction,

    /// Largest change of the solution from the previous iteration.
    SolutionReduction,

    /// The iteration cap; always enforced.
    Iterations,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Residual => "residual",
            Self::Error => "error",
            Self::ErrorReduction => "error reduction",
            Self::SolutionReduction => "solution reduction",
            Self::Iterations => "iterations",
        })
    }
}

/// Configuration for the threshold checker.
///
/// Every tolerance-based condition starts out bounded by `min_threshold`;
/// [`Config::with_bound`] overrides individual bounds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    max_iterations: usize,
    min_threshold: f64,
    bounds: Vec<(Condition, f64)>,
}

/// Errors that can occur when validating a threshold config.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("max_iterations must be at least 1")]
    MaxIterations,

    #[error("threshold {0} must be finite and non-negative")]
    Threshold(f64),

    #[error("the iteration cap is set by max_iterations, not by a bound")]
    IterationsBound,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(10, 1e-7, &[Condition::Residual, Condition::Iterations]).unwrap()
    }
}

impl Config {
    /// Creates a validated threshold config.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_iterations` is zero or `min_threshold` is
    /// negative or non-finite.
    pub fn new(
        max_iterations: usize,
        min_threshold: f64,
        conditions: &[Condition],
    ) -> Result<Self, ConfigError> {
        if max_iterations == 0 {
            return Err(ConfigError::MaxIterations);
        }
        check_threshold(min_threshold)?;

        let mut bounds: Vec<(Condition, f64)> = Vec::new();
        for &condition in conditions {
            if condition != Condition::Iterations && !bounds.iter().any(|(c, _)| *c == condition) {
                bounds.push((condition, min_threshold));
            }
        }

        Ok(Self {
            max_iterations,
            min_threshold,
            bounds,
        })
    }

    /// Sets the bound of `condition`, adding the condition if needed.
    ///
    /// # Errors
    ///
    /// Returns an error for [`Condition::Iterations`] or an invalid bound.
    pub fn with_bound(mut self, condition: Condition, bound: f64) -> Result<Self, ConfigError> {
        if condition == Condition::Iterations {
            return Err(ConfigError::IterationsBound);
        }
        check_threshold(bound)?;

        match self.bounds.iter_mut().find(|(c, _)| *c == condition) {
            Some(entry) => entry.1 = bound,
            None => self.bounds.push((condition, bound)),
        }
        Ok(self)
    }

    /// Returns the hard iteration cap.
    #[must_use]
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Returns the default bound of tolerance-based conditions.
    #[must_use]
    pub fn min_threshold(&self) -> f64 {
        self.min_threshold
    }

    /// Returns the bound of `condition`, if it is configured.
    #[must_use]
    pub fn bound(&self, condition: Condition) -> Option<f64> {
        self.bounds
            .iter()
            .find(|(c, _)| *c == condition)
            .map(|&(_, bound)| bound)
    }

    /// Returns the configured tolerance-based conditions with their bounds.
    #[must_use]
    pub fn bounds(&self) -> &[(Condition, f64)] {
        &self.bounds
    }
}

fn check_threshold(threshold: f64) -> Result<(), ConfigError> {
    if threshold.is_finite() && threshold >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Threshold(threshold))
    }
}
