use std::convert::Infallible;

use approx::assert_relative_eq;
use thiserror::Error;

use super::{Action, Config, ConfigError, Error, Event, Status, solve, solve_unobserved};

#[test]
fn solves_scalar_equation() {
    // x^2 - 2 = 0
    let solution = solve_unobserved(
        |x: &f64| Ok::<_, Infallible>(x * x - 2.0),
        &1.0,
        &Config::default(),
    )
    .unwrap();

    assert_eq!(solution.status, Status::Converged);
    assert_relative_eq!(solution.x, 2.0_f64.sqrt(), epsilon = 1e-10);
}

#[test]
fn solves_linear_system_in_one_step() {
    // [2 1; 1 3] x = [3; 5]  =>  x = [0.8, 1.4]
    let residual = |x: &Vec<f64>| {
        Ok::<_, Infallible>(vec![
            2.0 * x[0] + x[1] - 3.0,
            x[0] + 3.0 * x[1] - 5.0,
        ])
    };
    let solution = solve_unobserved(residual, &vec![0.0, 0.0], &Config::default()).unwrap();

    assert_eq!(solution.status, Status::Converged);
    assert!(solution.iters <= 2);
    assert_relative_eq!(solution.x[0], 0.8, epsilon = 1e-10);
    assert_relative_eq!(solution.x[1], 1.4, epsilon = 1e-10);
}

#[test]
fn returns_immediately_at_root() {
    let solution =
        solve_unobserved(|x: &f64| Ok::<_, Infallible>(x - 1.0), &1.0, &Config::default()).unwrap();

    assert_eq!(solution.iters, 0);
    assert_eq!(solution.status, Status::Converged);
}

#[test]
fn reports_max_iters() {
    let config = Config::new(2, 0.0, 0.0, 0.0, 1e-7).unwrap();
    let solution =
        solve_unobserved(|x: &f64| Ok::<_, Infallible>(x.powi(3) - 8.0), &100.0, &config).unwrap();

    assert_eq!(solution.status, Status::MaxIters);
    assert_eq!(solution.iters, 2);
}

#[test]
fn observer_can_stop_early() {
    let mut seen = Vec::new();
    let observer = |event: &Event<'_, f64>| {
        seen.push(event.iter);
        (event.iter == 1).then_some(Action::StopEarly)
    };

    let solution = solve(
        |x: &f64| Ok::<_, Infallible>(x * x - 2.0),
        &10.0,
        &Config::default(),
        observer,
    )
    .unwrap();

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_eq!(solution.iters, 1);
    assert_eq!(seen, vec![1]);
}

#[test]
fn singular_jacobian_is_an_error() {
    let result = solve_unobserved(|_: &f64| Ok::<_, Infallible>(1.0), &0.0, &Config::default());
    assert!(matches!(result, Err(Error::SingularJacobian { iter: 1 })));
}

#[derive(Debug, Error)]
#[error("out of domain")]
struct OutOfDomain;

#[test]
fn propagates_residual_errors() {
    let result = solve_unobserved(
        |x: &f64| if *x < 0.0 { Err(OutOfDomain) } else { Ok(x.sqrt() - 1.0) },
        &-1.0,
        &Config::default(),
    );
    assert!(matches!(result, Err(Error::Problem(_))));

    let result = solve_unobserved(|_: &f64| Ok::<_, Infallible>(f64::NAN), &0.0, &Config::default());
    assert!(matches!(result, Err(Error::NonFiniteResidual { .. })));
}

#[test]
fn rejects_invalid_config() {
    assert_eq!(Config::new(10, -1.0, 0.0, 0.0, 1e-7), Err(ConfigError::XAbs));
    assert_eq!(Config::new(10, 0.0, f64::NAN, 0.0, 1e-7), Err(ConfigError::XRel));
    assert_eq!(Config::new(10, 0.0, 0.0, -1.0, 1e-7), Err(ConfigError::Residual));
    assert_eq!(Config::new(10, 0.0, 0.0, 0.0, 0.0), Err(ConfigError::FdStep));
}
