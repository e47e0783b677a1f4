use serde::{Deserialize, Serialize};

use super::runner::{RootCoordinator, RunReport, RunnerConfig};
use crate::models::Model;
use crate::utils::errors::SimulationError;

fn open_horizon() -> f64 {
    f64::INFINITY
}

fn is_open_horizon(horizon: &f64) -> bool {
    horizon.is_infinite()
}

/// A complete run description, loadable from YAML or JSON.  An omitted
/// horizon is open, and the run continues until the model tree is passive.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    #[serde(default)]
    pub start_time: f64,
    #[serde(default = "open_horizon", skip_serializing_if = "is_open_horizon")]
    pub horizon: f64,
    #[serde(default)]
    pub runner: RunnerConfig,
    pub model: Model,
}

impl RunConfig {
    pub fn new(model: Model, start_time: f64, horizon: f64) -> Self {
        Self {
            start_time,
            horizon,
            runner: RunnerConfig::default(),
            model,
        }
    }

    pub fn from_yaml(config: &str) -> Result<Self, SimulationError> {
        Ok(serde_yaml::from_str(config)?)
    }

    pub fn from_json(config: &str) -> Result<Self, SimulationError> {
        Ok(serde_json::from_str(config)?)
    }

    pub fn to_yaml(&self) -> Result<String, SimulationError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> Result<String, SimulationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn into_runner(self) -> Result<RootCoordinator, SimulationError> {
        RootCoordinator::with_config(self.model, self.start_time, self.runner)
    }

    /// Builds the runner and runs it to the configured horizon.
    pub fn run(self) -> Result<RunReport, SimulationError> {
        let horizon = self.horizon;
        self.into_runner()?.run_until(horizon)
    }
}
