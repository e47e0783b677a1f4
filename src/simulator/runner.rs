use log::{debug, error, info, trace};
use serde::{Deserialize, Serialize};

use super::observer::Observer;
use super::processor::Processor;
use super::services::Services;
use crate::models::{Bag, Model};
use crate::utils::equivalent_f64;
use crate::utils::errors::SimulationError;

/// Lifecycle of a run: `Idle -> Running -> {Completed, Failed}`.  A
/// completed run may be resumed with a later horizon; a failed run may not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Idle,
    Running,
    Completed,
    Failed,
}

fn default_max_steps_per_instant() -> usize {
    10_000
}

/// Runner tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerConfig {
    /// Consecutive steps allowed at one simulation instant, before the run
    /// is failed as a zero-time loop.  Must be at least 1.
    #[serde(default = "default_max_steps_per_instant")]
    pub max_steps_per_instant: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_steps_per_instant: default_max_steps_per_instant(),
        }
    }
}

/// The outcome of `run_until`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub final_time: f64,
    pub steps: usize,
    pub transitions: usize,
    pub status: RunStatus,
}

/// The `RootCoordinator` drives the top processor of a model tree.  It owns
/// the global clock and the processor tree for the duration of a run, and
/// advances the clock monotonically from one event time to the next.
pub struct RootCoordinator {
    top: Processor,
    clock: f64,
    status: RunStatus,
    services: Services,
    config: RunnerConfig,
    steps: usize,
    last_step_time: Option<f64>,
    same_instant_steps: usize,
}

impl RootCoordinator {
    /// Builds and initializes the processor tree, with every model's clock
    /// starting at `start_time`.
    pub fn new(top: Model, start_time: f64) -> Result<Self, SimulationError> {
        Self::with_config(top, start_time, RunnerConfig::default())
    }

    pub fn with_config(
        top: Model,
        start_time: f64,
        config: RunnerConfig,
    ) -> Result<Self, SimulationError> {
        let mut top = Processor::new(top, None);
        if !start_time.is_finite() {
            return Err(SimulationError::scheduling(
                top.id(),
                start_time,
                "the start time must be finite",
            ));
        }
        if config.max_steps_per_instant == 0 {
            return Err(SimulationError::scheduling(
                top.id(),
                start_time,
                "at least one step per instant must be allowed",
            ));
        }
        top.initialize(start_time)?;
        Ok(Self {
            top,
            clock: start_time,
            status: RunStatus::Idle,
            services: Services::default(),
            config,
            steps: 0,
            last_step_time: None,
            same_instant_steps: 0,
        })
    }

    /// Attaches an observation sink, replacing any previous one.
    pub fn set_observer(&mut self, observer: Box<dyn Observer>) {
        self.services.set_observer(observer);
    }

    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.set_observer(observer);
        self
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn top(&self) -> &Processor {
        &self.top
    }

    pub fn next_event_time(&self) -> f64 {
        self.top.next_event_time()
    }

    /// Runs every step with an event time at or before `horizon`.  The run
    /// completes with the clock at `horizon` when the next event lies beyond
    /// it, or when the model tree is passive.  With an open horizon
    /// (`f64::INFINITY`), the run completes once the tree is passive, and the
    /// clock stays at the last event time.
    ///
    /// On failure the run is `Failed`, the clock stays at the failed step,
    /// and the error names the model and the simulation time.
    pub fn run_until(&mut self, horizon: f64) -> Result<RunReport, SimulationError> {
        if self.status == RunStatus::Failed {
            return Err(SimulationError::scheduling(
                self.top.id(),
                self.clock,
                "the run has already failed",
            ));
        }
        if horizon.is_nan() || horizon < self.clock {
            return Err(SimulationError::scheduling(
                self.top.id(),
                self.clock,
                format!["the horizon {} precedes the clock", horizon],
            ));
        }
        self.status = RunStatus::Running;
        info!(
            "running {} from t={} until t={}",
            self.top.id(),
            self.clock,
            horizon
        );
        loop {
            let time = self.top.next_event_time();
            if time.is_infinite() || time > horizon {
                if horizon.is_finite() {
                    self.clock = horizon;
                }
                break;
            }
            if let Err(err) = self.step_at(time) {
                self.status = RunStatus::Failed;
                error!("run failed at t={}: {}", time, err);
                return Err(err);
            }
        }
        self.status = RunStatus::Completed;
        let report = self.report();
        info!(
            "run completed at t={} after {} steps and {} transitions",
            report.final_time, report.steps, report.transitions
        );
        Ok(report)
    }

    /// Executes only the next step, regardless of any horizon.  Returns the
    /// step time, or `None` when the model tree is passive.  A stepped run
    /// is `Running` until the next `run_until` completes it.
    pub fn step(&mut self) -> Result<Option<f64>, SimulationError> {
        if self.status == RunStatus::Failed {
            return Err(SimulationError::scheduling(
                self.top.id(),
                self.clock,
                "the run has already failed",
            ));
        }
        let time = self.top.next_event_time();
        if time.is_infinite() {
            return Ok(None);
        }
        self.status = RunStatus::Running;
        self.step_at(time).map_err(|err| {
            self.status = RunStatus::Failed;
            error!("step failed at t={}: {}", time, err);
            err
        })?;
        Ok(Some(time))
    }

    pub fn report(&self) -> RunReport {
        RunReport {
            final_time: self.clock,
            steps: self.steps,
            transitions: self.services.total_transitions(),
            status: self.status,
        }
    }

    fn step_at(&mut self, time: f64) -> Result<(), SimulationError> {
        if time < self.clock {
            return Err(SimulationError::scheduling(
                self.top.id(),
                time,
                format!["the next event precedes the clock at t={}", self.clock],
            ));
        }
        match self.last_step_time {
            Some(last) if equivalent_f64(last, time) => {
                self.same_instant_steps += 1;
                if self.same_instant_steps >= self.config.max_steps_per_instant {
                    return Err(SimulationError::scheduling(
                        self.top.id(),
                        time,
                        format![
                            "{} consecutive steps at one instant, the models are in a zero-time loop",
                            self.same_instant_steps + 1
                        ],
                    ));
                }
            }
            _ => self.same_instant_steps = 0,
        }
        self.clock = time;
        self.last_step_time = Some(time);
        self.services.begin_step();
        let outputs = self.top.collect_output(time, &mut self.services)?;
        if !outputs.is_empty() {
            trace!(
                "t={} discarding {} values on the outputs of {}",
                time,
                outputs.len(),
                self.top.id()
            );
        }
        self.top.advance(time, Bag::new(), &mut self.services)?;
        if self.services.step_transitions() == 0 {
            return Err(SimulationError::scheduling(
                self.top.id(),
                time,
                "the step executed no transitions",
            ));
        }
        self.steps += 1;
        debug!(
            "step {} at t={}: {} transitions, next event at t={}",
            self.steps,
            time,
            self.services.step_transitions(),
            self.top.next_event_time()
        );
        Ok(())
    }
}

/// Builds a runner for `top` starting at `start_time`, and runs it until
/// `horizon` (`f64::INFINITY` for an open horizon).  A failed run returns
/// the error in place of the report; `SimulationError::time` and
/// `SimulationError::model_id` give the final clock and the failed model.
pub fn run_until(top: Model, start_time: f64, horizon: f64) -> Result<RunReport, SimulationError> {
    RootCoordinator::new(top, start_time)?.run_until(horizon)
}
