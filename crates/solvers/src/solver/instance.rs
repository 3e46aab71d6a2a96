use pint_core::{Observer, Problem, TimeInterval};
use pint_quadrature::SdcQuadrature;
use tracing::{debug, info, warn};

use crate::{
    communicator::{Communicator, CommunicatorError, Flag, Message},
    state::{Finalize, SolverState, StateError, StepLayout},
    sweep::{SweepCore, sweep},
    threshold::{self, Condition, Measures, ThresholdStatus},
};

use super::{
    Action, Config, ConfigError, Error, Event, IntervalSolution, IntervalStatus, Solution, Status,
};

/// Result of a single [`Solver::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// No message was ready.
    Waiting,

    /// A message or an upstream disconnect was handled.
    Progressed,

    /// The instance has terminated.
    Terminated,
}

/// One SDC solver instance in a pipeline.
///
/// An instance owns the state of at most one interval at a time and talks
/// to its neighbours only through its [`Communicator`].
pub struct Solver<'p, P: Problem + ?Sized> {
    problem: &'p P,
    config: Config,
    quadrature: SdcQuadrature,
    communicator: Communicator<P::Value>,
    instance: usize,
    active: Option<Active<P::Value>>,
    boundary: (P::Value, f64),
    last_sent: Flag,
    last_closed_start: Option<f64>,
    intervals: Vec<IntervalSolution<P::Value>>,
    sweeps: usize,
    terminated: Option<Status>,
}

/// The interval an instance is iterating on.
struct Active<V> {
    state: SolverState<V>,

    /// Whether the initial value can no longer change upstream.
    boundary_final: bool,
}

impl<'p, P: Problem + ?Sized> Solver<'p, P> {
    /// Creates an instance that talks through `communicator`.
    ///
    /// # Errors
    ///
    /// Returns an error if the quadrature cannot be built.
    pub fn new(
        problem: &'p P,
        config: Config,
        communicator: Communicator<P::Value>,
    ) -> Result<Self, ConfigError> {
        let span = problem.time_interval();
        let quadrature = SdcQuadrature::new(config.quadrature().clone(), span)?;

        Ok(Self {
            problem,
            config,
            quadrature,
            communicator,
            instance: 0,
            active: None,
            boundary: (problem.initial_value(), span.start()),
            last_sent: Flag::None,
            last_closed_start: None,
            intervals: Vec::new(),
            sweeps: 0,
            terminated: None,
        })
    }

    /// Creates a lone instance linked to itself and seeded with the
    /// problem's initial value, which steps through time sequentially.
    ///
    /// # Errors
    ///
    /// Returns an error if the quadrature cannot be built.
    pub fn self_looped(problem: &'p P, config: Config) -> Result<Self, ConfigError> {
        let mut communicator = Communicator::self_looped();
        communicator.write_buffer(
            problem.initial_value(),
            problem.time_interval().start(),
            Flag::None,
        );
        Self::new(problem, config, communicator)
    }

    /// Sets the index reported in events and logs.
    #[must_use]
    pub fn with_instance(mut self, instance: usize) -> Self {
        self.instance = instance;
        self
    }

    #[must_use]
    pub fn instance(&self) -> usize {
        self.instance
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn communicator_mut(&mut self) -> &mut Communicator<P::Value> {
        &mut self.communicator
    }

    /// Returns the flag this instance sent last.
    #[must_use]
    pub fn last_sent(&self) -> Flag {
        self.last_sent
    }

    /// Returns the interval currently being iterated on.
    #[must_use]
    pub fn current_interval(&self) -> Option<TimeInterval> {
        self.active.as_ref().map(|active| active.state.interval())
    }

    #[must_use]
    pub fn intervals(&self) -> &[IntervalSolution<P::Value>] {
        &self.intervals
    }

    #[must_use]
    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminated.is_some()
    }

    /// Returns how the instance terminated, if it has.
    #[must_use]
    pub fn status(&self) -> Option<Status> {
        self.terminated
    }

    /// Consumes the instance and returns everything it completed.
    #[must_use]
    pub fn into_solution(self) -> Solution<P::Value> {
        Solution {
            status: self.terminated.unwrap_or(Status::Interrupted),
            intervals: self.intervals,
            sweeps: self.sweeps,
        }
    }

    /// Handles messages until the instance terminates.
    ///
    /// Each message is handled as by [`Solver::poll`], except that receiving
    /// blocks.
    ///
    /// # Errors
    ///
    /// Returns an error if `dt` is invalid or a sweep, the state, or the
    /// communicator fails. Failure is signalled downstream first.
    pub fn run<C, Obs>(
        mut self,
        core: &C,
        dt: f64,
        mut observer: Obs,
    ) -> Result<Solution<P::Value>, Error>
    where
        C: SweepCore,
        Obs: for<'a> Observer<Event<'a, P::Value>, Action>,
    {
        check_time_step(dt)?;
        while !self.is_terminated() {
            let message = match self.communicator.receive() {
                Ok(message) => Some(message),
                Err(CommunicatorError::Disconnected(_)) => None,
                Err(error) => return Err(self.fail(error.into())),
            };
            if let Err(error) = self.handle(message, core, dt, &mut observer) {
                return Err(self.fail(error));
            }
        }
        Ok(self.into_solution())
    }

    /// Handles messages until termination without observer support.
    ///
    /// # Errors
    ///
    /// Same as [`Solver::run`].
    pub fn run_unobserved<C: SweepCore>(
        self,
        core: &C,
        dt: f64,
    ) -> Result<Solution<P::Value>, Error> {
        self.run(core, dt, ())
    }

    /// Handles at most one message without blocking.
    ///
    /// A message is handled by the protocol below, followed by one sweep
    /// unless the instance terminates:
    ///
    /// 1. [`Flag::Failed`] is passed on and ends the run.
    /// 2. [`Flag::TimeAdjusted`] drops the current interval and is passed on.
    /// 3. If the last flag sent closed an interval, a new interval of width
    ///    `dt` opens at the message's time point. If no time is left, the
    ///    message is passed on with [`Flag::None`] and the run ends.
    /// 4. Otherwise a message for the start of the current interval replaces
    ///    its initial value.
    ///
    /// After the sweep the end value of the interval is sent downstream
    /// together with the threshold's verdict. A converged interval is only
    /// closed once its initial value has been closed upstream.
    ///
    /// If upstream has disconnected, an instance with an open interval keeps
    /// sweeping it and an idle one terminates.
    ///
    /// # Errors
    ///
    /// Same as [`Solver::run`].
    pub fn poll<C, Obs>(&mut self, core: &C, dt: f64, observer: &mut Obs) -> Result<Progress, Error>
    where
        C: SweepCore,
        Obs: for<'a> Observer<Event<'a, P::Value>, Action>,
    {
        if self.is_terminated() {
            return Ok(Progress::Terminated);
        }
        check_time_step(dt)?;

        let message = match self.communicator.try_receive() {
            Ok(Some(message)) => Some(message),
            Ok(None) => return Ok(Progress::Waiting),
            Err(CommunicatorError::Disconnected(_)) => None,
            Err(error) => return Err(self.fail(error.into())),
        };
        if let Err(error) = self.handle(message, core, dt, observer) {
            return Err(self.fail(error));
        }

        Ok(if self.is_terminated() {
            Progress::Terminated
        } else {
            Progress::Progressed
        })
    }

    fn handle<C, Obs>(
        &mut self,
        message: Option<Message<P::Value>>,
        core: &C,
        dt: f64,
        observer: &mut Obs,
    ) -> Result<(), Error>
    where
        C: SweepCore,
        Obs: for<'a> Observer<Event<'a, P::Value>, Action>,
    {
        let instance = self.instance;

        let Some(message) = message else {
            match self.active.as_mut() {
                Some(active) => {
                    debug!(instance, "upstream closed, sweeping on");
                    active.boundary_final = true;
                }
                None => {
                    debug!(instance, "upstream closed while idle");
                    self.terminate(Status::Completed);
                    return Ok(());
                }
            }
            return self.sweep_once(core, observer);
        };

        if observer.observe(&Event::Received {
            instance,
            message: &message,
        }) == Some(Action::StopEarly)
        {
            self.stop();
            return Ok(());
        }

        let Message {
            value,
            time_point,
            flag,
        } = message;
        self.boundary = (value.clone(), time_point);

        match flag {
            Flag::Failed => {
                warn!(instance, time_point, "upstream failed");
                self.abandon();
                self.send(value, time_point, Flag::Failed)?;
                self.terminate(Status::Failed);
                return Ok(());
            }
            Flag::TimeAdjusted => {
                debug!(instance, time_point, "upstream adjusted its interval");
                self.abandon();
                return self.send(value, time_point, Flag::TimeAdjusted);
            }
            _ => {}
        }

        if self.last_sent.is_closed() {
            if !self.open(value, time_point, flag, dt, observer)? {
                return Ok(());
            }
        } else if let Some(active) = self.active.as_mut()
            && (time_point - active.state.interval().start()).abs() <= time_tolerance(dt)
        {
            debug!(instance, time_point, ?flag, "new initial value");
            active.state.set_initial_value(value)?;
            active.boundary_final = flag.is_closed();
        }

        self.sweep_once(core, observer)
    }

    /// Opens an interval at `start`, returning `false` if the run ended instead.
    fn open<Obs>(
        &mut self,
        value: P::Value,
        start: f64,
        flag: Flag,
        dt: f64,
        observer: &mut Obs,
    ) -> Result<bool, Error>
    where
        Obs: for<'a> Observer<Event<'a, P::Value>, Action>,
    {
        let instance = self.instance;
        let end = self.problem.time_interval().end();
        let tolerance = time_tolerance(dt);
        let repeated = self
            .last_closed_start
            .is_some_and(|closed| (closed - start).abs() <= tolerance);

        if end - start <= tolerance || repeated {
            debug!(instance, start, "no time left");
            self.send(value, start, Flag::None)?;
            self.terminate(Status::Completed);
            return Ok(false);
        }

        let interval = TimeInterval::new(start, (start + dt).min(end))?;
        let layout = StepLayout::split(interval, self.config.num_time_steps(), &mut self.quadrature);
        let state = SolverState::new(value, layout)?;
        info!(instance, start, end = interval.end(), "interval opened");

        self.active = Some(Active {
            state,
            boundary_final: flag.is_closed(),
        });

        if observer.observe(&Event::IntervalOpened { instance, interval }) == Some(Action::StopEarly)
        {
            self.stop();
            return Ok(false);
        }
        Ok(true)
    }

    /// Sweeps the active interval once and reports downstream.
    fn sweep_once<C, Obs>(&mut self, core: &C, observer: &mut Obs) -> Result<(), Error>
    where
        C: SweepCore,
        Obs: for<'a> Observer<Event<'a, P::Value>, Action>,
    {
        let instance = self.instance;
        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };
        let state = &mut active.state;

        state.proceed()?;
        sweep(
            self.problem,
            core,
            state,
            &mut self.quadrature,
            self.config.classic(),
        )?;
        let iteration = state
            .current_iteration_mut()
            .ok_or(StateError::MissingState(0))?;
        iteration.finalize()?;
        self.sweeps += 1;

        let check = threshold::check(self.config.threshold(), Measures::of(state));
        let status = match check.status {
            ThresholdStatus::Converged if !active.boundary_final => ThresholdStatus::Iterating,
            status => status,
        };
        debug!(
            instance,
            iteration = check.measures.iterations,
            residual = ?check.measures.residual,
            ?status,
            "sweep checked"
        );

        let last = state
            .current_iteration()
            .and_then(|iteration| iteration.final_step())
            .map(|step| step.last())
            .ok_or(StateError::MissingState(0))?;
        let (value, time_point) = (last.value().clone(), last.time_point());

        if observer.observe(&Event::Swept {
            instance,
            check: &check,
            state,
        }) == Some(Action::StopEarly)
        {
            self.stop();
            return Ok(());
        }

        match status {
            ThresholdStatus::Iterating => self.send(value, time_point, Flag::Iterating),
            ThresholdStatus::Converged => {
                self.close(IntervalStatus::Converged, check.reached, value, time_point, observer)
            }
            ThresholdStatus::Finished => {
                self.close(IntervalStatus::Finished, check.reached, value, time_point, observer)
            }
        }
    }

    fn close<Obs>(
        &mut self,
        status: IntervalStatus,
        reached: Vec<Condition>,
        value: P::Value,
        time_point: f64,
        observer: &mut Obs,
    ) -> Result<(), Error>
    where
        Obs: for<'a> Observer<Event<'a, P::Value>, Action>,
    {
        let instance = self.instance;
        let Some(Active { mut state, .. }) = self.active.take() else {
            return Ok(());
        };
        state.finalize()?;

        let interval = state.interval();
        let solution = IntervalSolution {
            interval,
            status,
            reached,
            iterations: state.into_solution(),
        };
        let iterations = solution.used_iterations();

        let flag = match status {
            IntervalStatus::Converged => {
                info!(instance, start = interval.start(), iterations, "interval converged");
                Flag::Converged
            }
            IntervalStatus::Finished => {
                warn!(
                    instance,
                    start = interval.start(),
                    iterations,
                    "iteration cap reached before convergence"
                );
                Flag::Finished
            }
        };

        self.last_closed_start = Some(interval.start());
        self.send(value, time_point, flag)?;

        let action = observer.observe(&Event::IntervalClosed {
            instance,
            solution: &solution,
        });
        self.intervals.push(solution);

        if action == Some(Action::StopEarly) {
            self.stop();
        }
        Ok(())
    }

    /// Sends downstream, treating a departed peer as nothing to tell.
    fn send(&mut self, value: P::Value, time_point: f64, flag: Flag) -> Result<(), Error> {
        self.last_sent = flag;
        match self.communicator.send(value, time_point, flag) {
            Ok(()) => Ok(()),
            Err(CommunicatorError::Disconnected(_)) => {
                debug!(instance = self.instance, ?flag, "downstream gone");
                Ok(())
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Drops the active interval without recording it.
    fn abandon(&mut self) {
        if let Some(active) = self.active.take() {
            debug!(
                instance = self.instance,
                start = active.state.interval().start(),
                "interval abandoned"
            );
        }
    }

    fn signal_failure(&mut self) {
        self.abandon();
        let (value, time_point) = self.boundary.clone();
        if let Err(error) = self.send(value, time_point, Flag::Failed) {
            debug!(instance = self.instance, %error, "failure not delivered");
        }
    }

    fn stop(&mut self) {
        info!(instance = self.instance, "stopped by observer");
        self.signal_failure();
        self.terminate(Status::StoppedByObserver);
    }

    fn fail(&mut self, error: Error) -> Error {
        warn!(instance = self.instance, %error, "instance failed");
        self.signal_failure();
        self.terminate(Status::Failed);
        error
    }

    fn terminate(&mut self, status: Status) {
        debug!(instance = self.instance, ?status, "terminated");
        self.communicator.close();
        self.terminated = Some(status);
    }
}

/// Time points closer than this are the same interval boundary.
fn time_tolerance(dt: f64) -> f64 {
    1e-10 * dt
}

fn check_time_step(dt: f64) -> Result<(), Error> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidTimeStep(dt))
    }
}
