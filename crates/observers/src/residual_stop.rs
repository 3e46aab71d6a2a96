use pint_core::Observer;

use crate::traits::{CanStopEarly, HasResidual};

/// Stops a solver once an event reports a residual at or below `tolerance`.
///
/// Events without a residual are ignored. The first `min_events` events with
/// a residual never stop the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidualStop {
    tolerance: f64,
    min_events: usize,
    seen: usize,
}

impl ResidualStop {
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            min_events: 0,
            seen: 0,
        }
    }

    /// Requires at least `min_events` residuals before stopping.
    #[must_use]
    pub fn with_min_events(mut self, min_events: usize) -> Self {
        self.min_events = min_events;
        self
    }

    /// Returns how many events with a residual were seen.
    #[must_use]
    pub fn seen(&self) -> usize {
        self.seen
    }
}

impl<E: HasResidual, A: CanStopEarly> Observer<E, A> for ResidualStop {
    fn observe(&mut self, event: &E) -> Option<A> {
        let residual = event.residual();
        if residual.is_nan() {
            return None;
        }
        self.seen += 1;
        (self.seen > self.min_events && residual.abs() <= self.tolerance).then(A::stop_early)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pint_solvers::newton::{self, Action, Config, Event, Status};

    struct Residual(f64);

    impl HasResidual for Residual {
        fn residual(&self) -> f64 {
            self.0
        }
    }

    #[test]
    fn ignores_events_without_residual() {
        let mut stop = ResidualStop::new(1.0);
        let action: Option<Action> = stop.observe(&Residual(f64::NAN));
        assert_eq!(action, None);
        assert_eq!(stop.seen(), 0);
    }

    #[test]
    fn waits_for_min_events() {
        let mut stop = ResidualStop::new(1e-3).with_min_events(2);
        let actions: Vec<Option<Action>> = [1e-4, 1e-4, 1e-4]
            .into_iter()
            .map(|r| Observer::<Residual, Action>::observe(&mut stop, &Residual(r)))
            .collect();
        assert_eq!(actions, vec![None, None, Some(Action::StopEarly)]);
    }

    #[test]
    fn stops_newton_early() {
        // x^2 = 2 from x = 1.
        let residual = |x: &f64| Ok::<_, std::convert::Infallible>(x * x - 2.0);
        let mut stop = ResidualStop::new(1e-2);
        let observer = |event: &Event<'_, f64>| -> Option<Action> { stop.observe(event) };
        let solution = newton::solve(residual, &1.0, &Config::default(), observer).unwrap();

        assert_eq!(solution.status, Status::StoppedByObserver);
        assert!(solution.residual_norm <= 1e-2);
        assert!((solution.x - 2.0_f64.sqrt()).abs() < 1e-2);
    }
}
