use pint_quadrature::{NodeKind, QuadratureError};
use thiserror::Error;

use crate::threshold;

/// Configuration for an SDC solver instance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    num_time_steps: usize,
    quadrature: pint_quadrature::Config,
    classic: bool,
    threshold: threshold::Config,
}

/// Errors that can occur when validating a solver config.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("an interval needs at least one time step")]
    NumTimeSteps,

    #[error("a pipeline needs at least one instance")]
    NumInstances,

    #[error("sweeping needs nodes at both ends of a time step, {0} nodes have none")]
    UnsupportedNodes(NodeKind),

    #[error("invalid quadrature: {0}")]
    Quadrature(#[from] QuadratureError),
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(
            1,
            pint_quadrature::Config::default(),
            true,
            threshold::Config::default(),
        )
        .unwrap()
    }
}

impl Config {
    /// Creates a validated solver config.
    ///
    /// `classic` selects classic SDC, which integrates the previous
    /// iteration's right-hand sides; otherwise already updated nodes of the
    /// current iteration are used as soon as they are available.
    ///
    /// # Errors
    ///
    /// Returns an error if `num_time_steps` is zero or the quadrature's nodes
    /// do not include the end points of a time step.
    pub fn new(
        num_time_steps: usize,
        quadrature: pint_quadrature::Config,
        classic: bool,
        threshold: threshold::Config,
    ) -> Result<Self, ConfigError> {
        if num_time_steps == 0 {
            return Err(ConfigError::NumTimeSteps);
        }
        if !quadrature.nodes().includes_endpoints() {
            return Err(ConfigError::UnsupportedNodes(quadrature.nodes()));
        }

        Ok(Self {
            num_time_steps,
            quadrature,
            classic,
            threshold,
        })
    }

    #[must_use]
    pub fn num_time_steps(&self) -> usize {
        self.num_time_steps
    }

    #[must_use]
    pub fn quadrature(&self) -> &pint_quadrature::Config {
        &self.quadrature
    }

    #[must_use]
    pub fn classic(&self) -> bool {
        self.classic
    }

    #[must_use]
    pub fn threshold(&self) -> &threshold::Config {
        &self.threshold
    }
}
