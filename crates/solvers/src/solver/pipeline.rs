use std::thread;

use pint_core::{Observer, Problem};
use tracing::debug;

use crate::{
    communicator::{Communicator, Flag},
    sweep::SweepCore,
};

use super::{
    Action, Config, ConfigError, Error, Event, IntervalSolution, Progress, Solution, Solver, Status,
};

/// Solver instances linked in a ring.
///
/// Instance `i` sends to instance `i + 1` and the last sends back to the
/// first, which is seeded with the problem's initial value. With a single
/// instance the ring is a self loop and time is stepped sequentially.
pub struct Pipeline<'p, P: Problem + ?Sized> {
    instances: Vec<Solver<'p, P>>,
}

/// The results of every instance of a pipeline.
#[derive(Debug)]
pub struct PipelineSolution<V> {
    /// One entry per instance, in ring order.
    pub instances: Vec<Result<Solution<V>, Error>>,
}

impl<V> PipelineSolution<V> {
    /// Returns all completed intervals ordered by start time.
    #[must_use]
    pub fn intervals(&self) -> Vec<&IntervalSolution<V>> {
        let mut intervals: Vec<_> = self
            .instances
            .iter()
            .filter_map(|result| result.as_ref().ok())
            .flat_map(|solution| &solution.intervals)
            .collect();
        intervals.sort_by(|a, b| a.interval.start().total_cmp(&b.interval.start()));
        intervals
    }

    /// Returns `true` if every instance completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.instances
            .iter()
            .all(|result| matches!(result, Ok(solution) if solution.status == Status::Completed))
    }

    /// Returns the value at the end of the latest completed interval.
    #[must_use]
    pub fn final_value(&self) -> Option<&V> {
        self.intervals().last()?.final_value()
    }
}

impl<'p, P: Problem + ?Sized> Pipeline<'p, P> {
    /// Creates `num_instances` identically configured instances in a ring.
    ///
    /// # Errors
    ///
    /// Returns an error if `num_instances` is zero or the quadrature cannot
    /// be built.
    pub fn new(problem: &'p P, config: &Config, num_instances: usize) -> Result<Self, ConfigError> {
        if num_instances == 0 {
            return Err(ConfigError::NumInstances);
        }

        let mut communicators = Communicator::ring(num_instances);
        communicators[0].write_buffer(
            problem.initial_value(),
            problem.time_interval().start(),
            Flag::None,
        );

        let instances = communicators
            .into_iter()
            .enumerate()
            .map(|(index, communicator)| {
                Solver::new(problem, config.clone(), communicator)
                    .map(|solver| solver.with_instance(index))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { instances })
    }

    #[must_use]
    pub fn num_instances(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn instances(&self) -> &[Solver<'p, P>] {
        &self.instances
    }

    /// Returns an instance, for example to inject messages before a run.
    pub fn instance_mut(&mut self, index: usize) -> Option<&mut Solver<'p, P>> {
        self.instances.get_mut(index)
    }

    /// Runs all instances on the calling thread.
    ///
    /// Instances are polled in ring order until every one has terminated.
    /// A failing instance ends with its error while the rest carry on with
    /// the failure signal they receive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimeStep`] for an invalid `dt`, or
    /// [`Error::Stalled`] if no instance can make progress.
    pub fn run<C, Obs>(
        self,
        core: &C,
        dt: f64,
        mut observer: Obs,
    ) -> Result<PipelineSolution<P::Value>, Error>
    where
        C: SweepCore,
        Obs: for<'a> Observer<Event<'a, P::Value>, Action>,
    {
        let mut instances = self.instances;
        let mut errors: Vec<Option<Error>> = instances.iter().map(|_| None).collect();

        while instances.iter().any(|instance| !instance.is_terminated()) {
            let mut progressed = false;

            for (instance, error) in instances.iter_mut().zip(&mut errors) {
                if instance.is_terminated() {
                    continue;
                }
                match instance.poll(core, dt, &mut observer) {
                    Ok(Progress::Waiting) => {}
                    Ok(Progress::Progressed | Progress::Terminated) => progressed = true,
                    Err(Error::InvalidTimeStep(dt)) => return Err(Error::InvalidTimeStep(dt)),
                    Err(failure) => {
                        *error = Some(failure);
                        progressed = true;
                    }
                }
            }

            if !progressed {
                debug!("pipeline stalled");
                return Err(Error::Stalled);
            }
        }

        Ok(collect(instances, errors))
    }

    /// Runs all instances on the calling thread without observer support.
    ///
    /// # Errors
    ///
    /// Same as [`Pipeline::run`].
    pub fn run_unobserved<C: SweepCore>(
        self,
        core: &C,
        dt: f64,
    ) -> Result<PipelineSolution<P::Value>, Error> {
        self.run(core, dt, ())
    }

    /// Runs each instance on its own thread with blocking receives.
    ///
    /// `observer` is called with an instance index to build that instance's
    /// observer.
    pub fn run_threaded<C, F, Obs>(
        self,
        core: &C,
        dt: f64,
        observer: F,
    ) -> PipelineSolution<P::Value>
    where
        P: Sync,
        P::Value: Send,
        C: SweepCore + Sync,
        F: Fn(usize) -> Obs + Sync,
        Obs: for<'a> Observer<Event<'a, P::Value>, Action>,
    {
        let observer = &observer;
        let instances = thread::scope(|scope| {
            let handles: Vec<_> = self
                .instances
                .into_iter()
                .map(|instance| {
                    scope.spawn(move || {
                        let index = instance.instance();
                        instance.run(core, dt, observer(index))
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });

        PipelineSolution { instances }
    }
}

fn collect<P: Problem + ?Sized>(
    instances: Vec<Solver<'_, P>>,
    errors: Vec<Option<Error>>,
) -> PipelineSolution<P::Value> {
    let instances = instances
        .into_iter()
        .zip(errors)
        .map(|(instance, error)| match error {
            Some(error) => Err(error),
            None => Ok(instance.into_solution()),
        })
        .collect();

    PipelineSolution { instances }
}
