use approx::assert_relative_eq;
use integration_tests::problems::{Blowup, Decay, Oscillator, Undefined};
use pint_core::TimeInterval;
use pint_solvers::{
    solver::{self, Config, Error, IntervalStatus, Pipeline, Status},
    sweep::{Explicit, Implicit, SemiImplicit, SweepError},
    threshold::{self, Condition},
};

fn decay() -> Decay {
    Decay::new(-2.0, TimeInterval::new(0.0, 2.0).unwrap())
}

fn pipelined() -> Config {
    Config::new(
        2,
        pint_quadrature::Config::default(),
        true,
        threshold::Config::new(40, 1e-10, &[Condition::Residual]).unwrap(),
    )
    .unwrap()
}

#[test]
fn ring_matches_sequential_run() {
    let sequential = solver::solve(&decay(), pipelined(), &Implicit::default(), 0.25).unwrap();

    for num_instances in [1, 3, 4] {
        let pipeline = Pipeline::new(&decay(), &pipelined(), num_instances)
            .unwrap()
            .run_unobserved(&Implicit::default(), 0.25)
            .unwrap();

        assert!(pipeline.is_completed());
        let intervals = pipeline.intervals();
        assert_eq!(intervals.len(), 8);
        for (interval, expected) in intervals.iter().zip(&sequential.intervals) {
            assert_eq!(interval.status, IntervalStatus::Converged);
            assert_relative_eq!(
                interval.interval.start(),
                expected.interval.start(),
                epsilon = 1e-12
            );
            assert_relative_eq!(
                *interval.final_value().unwrap(),
                *expected.final_value().unwrap(),
                epsilon = 1e-8
            );
        }
    }
}

#[test]
fn intervals_are_dealt_round_the_ring() {
    let pipeline = Pipeline::new(&decay(), &pipelined(), 3)
        .unwrap()
        .run_unobserved(&Explicit, 0.25)
        .unwrap();

    for (index, result) in pipeline.instances.iter().enumerate() {
        let solution = result.as_ref().unwrap();
        assert_eq!(solution.status, Status::Completed);
        for (turn, interval) in solution.intervals.iter().enumerate() {
            let expected = 0.25 * (index + 3 * turn) as f64;
            assert_relative_eq!(interval.interval.start(), expected, epsilon = 1e-12);
        }
    }
    assert_relative_eq!(
        *pipeline.final_value().unwrap(),
        (-4.0_f64).exp(),
        epsilon = 1e-5
    );
}

#[test]
fn threaded_ring_matches_polled_ring() {
    let oscillator = Oscillator {
        omega: 1.0,
        span: TimeInterval::new(0.0, 3.0).unwrap(),
    };

    let polled = Pipeline::new(&oscillator, &pipelined(), 3)
        .unwrap()
        .run_unobserved(&SemiImplicit::default(), 0.5)
        .unwrap();
    let threaded = Pipeline::new(&oscillator, &pipelined(), 3)
        .unwrap()
        .run_threaded(&SemiImplicit::default(), 0.5, |_| ());

    assert!(threaded.is_completed());
    assert_eq!(threaded.intervals().len(), 6);
    assert_eq!(polled.intervals().len(), 6);

    let a = polled.final_value().unwrap();
    let b = threaded.final_value().unwrap();
    assert_relative_eq!(a[0], b[0], epsilon = 1e-8);
    assert_relative_eq!(a[1], b[1], epsilon = 1e-8);
    assert_relative_eq!(b[0], (3.0_f64).cos(), epsilon = 1e-4);
}

#[test]
fn failing_instance_takes_the_ring_down() {
    let blowup = Blowup {
        span: TimeInterval::new(0.0, 1.5).unwrap(),
        breaks_at: 0.6,
    };
    let config = Config::new(
        1,
        pint_quadrature::Config::default(),
        true,
        threshold::Config::new(10, 1e-12, &[Condition::Residual]).unwrap(),
    )
    .unwrap();

    let solution = Pipeline::new(&blowup, &config, 3)
        .unwrap()
        .run_unobserved(&Explicit, 0.25)
        .unwrap();

    assert!(!solution.is_completed());
    for result in &solution.instances[..2] {
        assert_eq!(result.as_ref().unwrap().status, Status::Failed);
    }
    match &solution.instances[2] {
        Err(Error::Sweep(SweepError::Problem(source))) => {
            let undefined = source.downcast_ref::<Undefined>().unwrap();
            assert!(undefined.0 > 0.6);
        }
        other => panic!("expected a problem error, got {other:?}"),
    }
}

#[test]
fn threaded_failure_reaches_every_instance() {
    let blowup = Blowup {
        span: TimeInterval::new(0.0, 1.0).unwrap(),
        breaks_at: 0.3,
    };

    let solution = Pipeline::new(&blowup, &pipelined(), 2)
        .unwrap()
        .run_threaded(&Explicit, 0.25, |_| ());

    assert!(!solution.is_completed());
    assert!(matches!(
        solution.instances[1],
        Err(Error::Sweep(SweepError::Problem(_)))
    ));
    assert_eq!(solution.instances[0].as_ref().unwrap().status, Status::Failed);
}
