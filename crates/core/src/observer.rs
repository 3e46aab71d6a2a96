/// Hook into a running integrator.
///
/// Every solver in pint reports its progress as events: a message arriving
/// from the neighbouring instance, an interval being opened, a sweep being
/// checked against the threshold, an interval closing. The solver hands each
/// event to its observer, and the observer answers with an optional
/// solver-specific action, for example stopping the run once the residual is
/// small enough for the caller's purposes. `None` leaves the solver alone.
///
/// Any `FnMut(&E) -> Option<A>` closure is an observer, and `()` is an
/// observer that never acts.
///
/// # Example
///
/// ```
/// use pint_core::Observer;
///
/// enum Event {
///     Swept { iteration: usize, residual: f64 },
///     IntervalClosed { start: f64 },
/// }
///
/// #[derive(Debug, PartialEq)]
/// enum Action {
///     StopEarly,
/// }
///
/// let mut closed = Vec::new();
/// let mut observer = |event: &Event| -> Option<Action> {
///     match *event {
///         Event::Swept { iteration, residual } if iteration > 2 && residual < 1e-6 => {
///             Some(Action::StopEarly)
///         }
///         Event::Swept { .. } => None,
///         Event::IntervalClosed { start } => {
///             closed.push(start);
///             None
///         }
///     }
/// };
///
/// assert_eq!(observer.observe(&Event::IntervalClosed { start: 0.0 }), None);
/// assert_eq!(
///     observer.observe(&Event::Swept { iteration: 3, residual: 1e-8 }),
///     Some(Action::StopEarly)
/// );
/// ```
pub trait Observer<E, A> {
    /// Receives `event` and optionally asks the solver to act.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Stop;

    #[test]
    fn unit_never_acts() {
        let action: Option<Stop> = ().observe(&1e-12);
        assert_eq!(action, None);
    }

    #[test]
    fn closures_count_sweeps() {
        let mut sweeps = 0;
        let mut observer = |residual: &f64| -> Option<Stop> {
            sweeps += 1;
            (*residual < 1e-10).then_some(Stop)
        };

        assert_eq!(observer.observe(&1e-3), None);
        assert_eq!(observer.observe(&1e-11), Some(Stop));
        assert_eq!(sweeps, 2);
    }
}
