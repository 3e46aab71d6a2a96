//! Collocation nodes and spectral integration for spectral deferred correction.
//!
//! [`SdcQuadrature`] places the nodes of a [`NodeKind`] rule on a time
//! interval and builds the `S` and `Q` integration matrices every sweep uses.
//! Integrals are taken against a [`PolynomialWeights`] weight function, by
//! default the constant `1`.
//!
//! # Example
//!
//! ```
//! use pint_core::TimeInterval;
//! use pint_quadrature::{Config, SdcQuadrature};
//!
//! let interval = TimeInterval::new(0.0, 1.0).unwrap();
//! let quadrature = SdcQuadrature::new(Config::default(), interval).unwrap();
//!
//! // Integrate u(t) = 2t, sampled at the nodes, over the whole interval.
//! let data: Vec<f64> = quadrature.nodes().iter().map(|t| 2.0 * t).collect();
//! let integral = quadrature.apply(&data, 0, 2).unwrap();
//! assert!((integral - 1.0).abs() < 1e-14);
//! ```

mod config;
mod error;
mod nodes;
mod polynomial;
mod sdc;
mod weights;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::QuadratureError;
pub use nodes::NodeKind;
pub use sdc::SdcQuadrature;
pub use weights::PolynomialWeights;
