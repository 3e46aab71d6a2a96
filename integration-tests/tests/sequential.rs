use approx::assert_relative_eq;
use integration_tests::problems::{Decay, Oscillator};
use pint_core::TimeInterval;
use pint_quadrature::{NodeKind, PolynomialWeights};
use pint_solvers::{
    solver::{self, Config, ConfigError, IntervalStatus, Solution, Status},
    sweep::{Explicit, Implicit, SemiImplicit, SweepCore},
    threshold::{self, Condition},
};

fn decay() -> Decay {
    Decay::new(-1.0, TimeInterval::new(0.0, 1.0).unwrap())
}

fn oscillator() -> Oscillator {
    Oscillator {
        omega: 2.0,
        span: TimeInterval::new(0.0, 2.0).unwrap(),
    }
}

/// Two time steps of four Lobatto nodes per interval, iterated to a tight residual.
fn tight(classic: bool) -> Config {
    Config::new(
        2,
        pint_quadrature::Config::gauss_lobatto(4).unwrap(),
        classic,
        threshold::Config::new(50, 1e-10, &[Condition::Residual]).unwrap(),
    )
    .unwrap()
}

fn solve_oscillator<C: SweepCore>(core: &C, classic: bool) -> Solution<[f64; 2]> {
    let solution = solver::solve(&oscillator(), tight(classic), core, 0.5).unwrap();
    assert_eq!(solution.status, Status::Completed);
    assert_eq!(solution.intervals.len(), 4);
    for interval in &solution.intervals {
        assert_eq!(interval.status, IntervalStatus::Converged, "{}", core.name());
    }
    solution
}

#[test]
fn intervals_cover_the_span() {
    for (dt, expected) in [(0.1, 10), (0.3, 4), (0.5, 2), (1.5, 1)] {
        let solution = solver::solve(&decay(), Config::default(), &Implicit::default(), dt).unwrap();

        assert_eq!(solution.status, Status::Completed);
        assert_eq!(solution.intervals.len(), expected, "dt = {dt}");
        assert_relative_eq!(solution.intervals[0].interval.start(), 0.0);
        assert_relative_eq!(
            solution.intervals.last().unwrap().interval.end(),
            1.0,
            epsilon = 1e-12
        );
    }
}

#[test]
fn decay_approaches_the_exact_solution() {
    let solution = solver::solve(&decay(), Config::default(), &Implicit::default(), 0.1).unwrap();

    for interval in &solution.intervals {
        assert_eq!(interval.status, IntervalStatus::Converged);
        let trajectory = interval.trajectory().unwrap();
        assert!(trajectory.max_error().unwrap() < 1e-5);
    }
    assert_relative_eq!(*solution.final_value().unwrap(), (-1.0_f64).exp(), epsilon = 1e-5);
}

#[test]
fn unreachable_tolerance_finishes_at_the_cap() {
    let threshold = threshold::Config::new(25, 0.0, &[Condition::Error]).unwrap();
    let config = Config::new(1, pint_quadrature::Config::default(), true, threshold).unwrap();

    let solution = solver::solve(&decay(), config, &Explicit, 0.5).unwrap();

    assert_eq!(solution.status, Status::Completed);
    assert_eq!(solution.intervals.len(), 2);
    for interval in &solution.intervals {
        assert_eq!(interval.status, IntervalStatus::Finished);
        assert_eq!(interval.used_iterations(), 25);
        assert_eq!(interval.reached, vec![Condition::Iterations]);
    }
}

#[test]
fn every_core_reaches_the_collocation_solution() {
    let explicit = solve_oscillator(&Explicit, true);
    let implicit = solve_oscillator(&Implicit::default(), true);
    let semi_implicit = solve_oscillator(&SemiImplicit::default(), true);

    let exact = [(4.0_f64).cos(), -2.0 * (4.0_f64).sin()];
    for solution in [&explicit, &implicit, &semi_implicit] {
        let [x, v] = *solution.final_value().unwrap();
        assert_relative_eq!(x, exact[0], epsilon = 1e-5);
        assert_relative_eq!(v, exact[1], epsilon = 1e-5);
    }

    let reference = explicit.final_value().unwrap();
    for solution in [&implicit, &semi_implicit] {
        let value = solution.final_value().unwrap();
        assert_relative_eq!(value[0], reference[0], epsilon = 1e-8);
        assert_relative_eq!(value[1], reference[1], epsilon = 1e-8);
    }
}

#[test]
fn modified_sweeps_match_classic_ones() {
    let classic = solve_oscillator(&SemiImplicit::default(), true);
    let modified = solve_oscillator(&SemiImplicit::default(), false);

    let a = classic.final_value().unwrap();
    let b = modified.final_value().unwrap();
    assert_relative_eq!(a[0], b[0], epsilon = 1e-8);
    assert_relative_eq!(a[1], b[1], epsilon = 1e-8);
}

#[test]
fn solution_reduction_ends_iteration() {
    let threshold = threshold::Config::new(50, 1e-9, &[Condition::SolutionReduction]).unwrap();
    let config = Config::new(1, pint_quadrature::Config::default(), true, threshold).unwrap();

    let solution = solver::solve(&decay(), config, &Explicit, 0.25).unwrap();

    for interval in &solution.intervals {
        assert_eq!(interval.status, IntervalStatus::Converged);
        assert_eq!(interval.reached, vec![Condition::SolutionReduction]);

        let iterations = &interval.iterations;
        let last = iterations.used_iterations() - 1;
        assert!(iterations.solution_reduction(last).unwrap() <= 1e-9);
        assert!(iterations.solution_reduction(1).unwrap() > 1e-9);
        assert!(iterations.solution_reduction(0).is_none());
        assert!(iterations.error_reduction(last).is_some());
    }
}

#[test]
fn sweeping_needs_end_point_nodes() {
    let quadrature =
        pint_quadrature::Config::new(4, NodeKind::GaussLegendre, PolynomialWeights::default())
            .unwrap();

    assert_eq!(
        Config::new(1, quadrature, true, threshold::Config::default()),
        Err(ConfigError::UnsupportedNodes(NodeKind::GaussLegendre))
    );
}
