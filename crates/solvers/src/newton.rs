//! Newton's method for square nonlinear systems.
//!
//! Sweeps fall back to this solver for implicit node updates when a problem
//! offers neither a closed-form update nor its own root finder. The Jacobian
//! is approximated by forward differences and each Newton step is solved by
//! LU decomposition.

mod config;
mod error;
mod solution;

#[cfg(test)]
mod tests;

pub use config::{Config, ConfigError};
pub use error::Error;
pub use solution::{Solution, Status};

use nalgebra::{DMatrix, DVector};
use pint_core::{Observer, SpatialValue};

/// Control actions supported by the Newton solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the solver early and return the current iterate.
    StopEarly,
}

/// Iteration event emitted by the Newton solver.
#[derive(Debug)]
pub struct Event<'a, V> {
    /// Iteration counter (1-based).
    pub iter: usize,

    /// The iterate after the Newton step.
    pub x: &'a V,

    /// Supremum norm of the residual at `x`.
    pub residual_norm: f64,

    /// Supremum norm of the Newton step that produced `x`.
    pub step_norm: f64,
}

/// Finds a root of `residual` starting from `guess`.
///
/// Observers see every iterate after its Newton step.
///
/// # Errors
///
/// Returns an error if the residual function fails or produces non-finite
/// values, or if the Jacobian is singular.
pub fn solve<V, F, E, Obs>(
    mut residual: F,
    guess: &V,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution<V>, Error>
where
    V: SpatialValue,
    F: FnMut(&V) -> Result<V, E>,
    E: std::error::Error + Send + Sync + 'static,
    Obs: for<'a> Observer<Event<'a, V>, Action>,
{
    let mut x = guess.clone();
    let mut r = evaluate(&mut residual, &x)?;
    let mut residual_norm = r.sup_norm();

    if residual_norm <= config.residual_tol() {
        return Ok(Solution {
            status: Status::Converged,
            x,
            residual_norm,
            iters: 0,
        });
    }

    for iter in 1..=config.max_iters() {
        let jacobian = jacobian(&mut residual, &x, &r, config.fd_step())?;
        let rhs = -DVector::from_column_slice(r.components());
        let step = jacobian
            .lu()
            .solve(&rhs)
            .ok_or(Error::SingularJacobian { iter })?;

        for (xi, dxi) in x.components_mut().iter_mut().zip(step.iter()) {
            *xi += dxi;
        }
        r = evaluate(&mut residual, &x)?;
        residual_norm = r.sup_norm();
        let step_norm = step.amax();

        let event = Event {
            iter,
            x: &x,
            residual_norm,
            step_norm,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(Solution {
                status: Status::StoppedByObserver,
                x,
                residual_norm,
                iters: iter,
            });
        }

        let step_converged = step_norm <= config.x_abs_tol() + config.x_rel_tol() * x.sup_norm();
        if residual_norm <= config.residual_tol() || step_converged {
            return Ok(Solution {
                status: Status::Converged,
                x,
                residual_norm,
                iters: iter,
            });
        }
    }

    Ok(Solution {
        status: Status::MaxIters,
        x,
        residual_norm,
        iters: config.max_iters(),
    })
}

/// Finds a root of `residual` without observer support.
///
/// # Errors
///
/// See [`solve`].
pub fn solve_unobserved<V, F, E>(residual: F, guess: &V, config: &Config) -> Result<Solution<V>, Error>
where
    V: SpatialValue,
    F: FnMut(&V) -> Result<V, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    solve(residual, guess, config, ())
}

fn evaluate<V, F, E>(residual: &mut F, x: &V) -> Result<V, Error>
where
    V: SpatialValue,
    F: FnMut(&V) -> Result<V, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    let r = residual(x).map_err(|e| Error::Problem(Box::new(e)))?;
    if !r.is_finite() {
        return Err(Error::NonFiniteResidual {
            x: x.components().to_vec(),
        });
    }
    Ok(r)
}

/// Forward-difference Jacobian with columns `(r(x + h e_j) - r(x)) / h`.
fn jacobian<V, F, E>(residual: &mut F, x: &V, r: &V, fd_step: f64) -> Result<DMatrix<f64>, Error>
where
    V: SpatialValue,
    F: FnMut(&V) -> Result<V, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    let n = x.dim();
    let mut jacobian = DMatrix::zeros(n, n);
    let mut shifted = x.clone();

    for j in 0..n {
        let xj = x.components()[j];
        let h = fd_step * xj.abs().max(1.0);
        shifted.components_mut()[j] = xj + h;

        let r_shifted = evaluate(residual, &shifted)?;
        for (i, (a, b)) in r_shifted.components().iter().zip(r.components()).enumerate() {
            jacobian[(i, j)] = (a - b) / h;
        }
        shifted.components_mut()[j] = xj;
    }

    Ok(jacobian)
}
