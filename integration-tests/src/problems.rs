//! Small initial value problems with known solutions.

use std::convert::Infallible;

use pint_core::{
    DirectImplicit, DirectImplicitError, DirectImplicitStep, ExactSolution, Problem, RhsPart,
    TimeInterval,
};
use thiserror::Error;

/// `u' = λu` with `u(start) = 1`.
///
/// The whole right-hand side counts as implicit, so both implicit sweep
/// cores can use the closed-form update.
#[derive(Debug, Clone, Copy)]
pub struct Decay {
    pub lambda: f64,
    pub span: TimeInterval,
}

impl Decay {
    #[must_use]
    pub fn new(lambda: f64, span: TimeInterval) -> Self {
        Self { lambda, span }
    }
}

impl Problem for Decay {
    type Value = f64;
    type Error = Infallible;

    fn time_interval(&self) -> TimeInterval {
        self.span
    }

    fn initial_value(&self) -> f64 {
        1.0
    }

    fn evaluate(&self, _time: f64, value: &f64, part: RhsPart) -> Result<f64, Infallible> {
        Ok(match part {
            RhsPart::Full | RhsPart::Implicit => self.lambda * value,
            RhsPart::Explicit => 0.0,
        })
    }

    fn exact_solution(&self) -> Option<&dyn ExactSolution<f64, Error = Infallible>> {
        Some(self)
    }

    fn direct_implicit(&self) -> Option<&dyn DirectImplicit<f64, Error = Infallible>> {
        Some(self)
    }
}

impl ExactSolution<f64> for Decay {
    type Error = Infallible;

    fn exact(&self, time: f64) -> Result<f64, Infallible> {
        Ok((self.lambda * (time - self.span.start())).exp())
    }
}

impl DirectImplicit<f64> for Decay {
    type Error = Infallible;

    fn solve_direct(
        &self,
        step: &DirectImplicitStep<'_, f64>,
    ) -> Result<f64, DirectImplicitError<Infallible>> {
        let denominator = 1.0 - step.delta_tau * self.lambda;
        if denominator.abs() < 1e-14 {
            return Err(DirectImplicitError::Singular { denominator });
        }
        let known = step.previous_node
            - step.delta_tau * self.lambda * step.previous_iteration_current_node
            + step.integral;
        Ok(known / denominator)
    }
}

/// The harmonic oscillator `x' = v`, `v' = -ω²x` from `(1, 0)` at the start.
///
/// The explicit part is `(v, 0)` and the implicit part `(0, -ω²x)`. There is
/// no closed-form update, so implicit sweeps go through a root finder.
#[derive(Debug, Clone, Copy)]
pub struct Oscillator {
    pub omega: f64,
    pub span: TimeInterval,
}

impl Problem for Oscillator {
    type Value = [f64; 2];
    type Error = Infallible;

    fn time_interval(&self) -> TimeInterval {
        self.span
    }

    fn initial_value(&self) -> [f64; 2] {
        [1.0, 0.0]
    }

    fn evaluate(&self, _time: f64, &[x, v]: &[f64; 2], part: RhsPart) -> Result<[f64; 2], Infallible> {
        let explicit = [v, 0.0];
        let implicit = [0.0, -self.omega * self.omega * x];
        Ok(match part {
            RhsPart::Full => [v, implicit[1]],
            RhsPart::Explicit => explicit,
            RhsPart::Implicit => implicit,
        })
    }

    fn exact_solution(&self) -> Option<&dyn ExactSolution<[f64; 2], Error = Infallible>> {
        Some(self)
    }
}

impl ExactSolution<[f64; 2]> for Oscillator {
    type Error = Infallible;

    fn exact(&self, time: f64) -> Result<[f64; 2], Infallible> {
        let phase = self.omega * (time - self.span.start());
        Ok([phase.cos(), -self.omega * phase.sin()])
    }
}

/// Reported by [`Blowup`] past its breaking point.
#[derive(Debug, Clone, Copy, Error, PartialEq)]
#[error("right-hand side undefined at t = {0}")]
pub struct Undefined(pub f64);

/// `u' = u`, all explicit, whose right-hand side fails after `breaks_at`.
#[derive(Debug, Clone, Copy)]
pub struct Blowup {
    pub span: TimeInterval,
    pub breaks_at: f64,
}

impl Problem for Blowup {
    type Value = Vec<f64>;
    type Error = Undefined;

    fn time_interval(&self) -> TimeInterval {
        self.span
    }

    fn initial_value(&self) -> Vec<f64> {
        vec![1.0, 2.0]
    }

    fn evaluate(&self, time: f64, value: &Vec<f64>, part: RhsPart) -> Result<Vec<f64>, Undefined> {
        if time > self.breaks_at {
            return Err(Undefined(time));
        }
        Ok(match part {
            RhsPart::Full | RhsPart::Explicit => value.clone(),
            RhsPart::Implicit => vec![0.0; value.len()],
        })
    }
}
