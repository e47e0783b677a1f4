use std::fmt;

use thiserror::Error;

use crate::models::Direction;

/// The kind of model event during which a failure occured, or which an
/// observer is being notified about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EventKind {
    Internal,
    External,
    Confluent,
    Output,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Internal => "internal",
            EventKind::External => "external",
            EventKind::Confluent => "confluent",
            EventKind::Output => "output",
        };
        f.write_str(name)
    }
}

/// `ConstructionError` enumerates the ways a coupled model can be invalid.
/// These are always raised while building the model tree, before any run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructionError {
    /// Two sibling components share an ID
    #[error("Duplicate model ID `{0}` among sibling components")]
    DuplicateModelId(String),

    /// A model declares the same port name twice in one direction
    #[error("Model `{model_id}` declares port `{port}` more than once")]
    DuplicatePort { model_id: String, port: String },

    /// A coupling references a component that does not exist
    #[error("A coupling references model `{0}`, which is not a component")]
    ModelNotFound(String),

    /// A coupling references a port that the model does not declare
    #[error("A coupling references port `{port}`, which model `{model_id}` does not declare")]
    PortNotFound { model_id: String, port: String },

    /// A coupling connects ports in the wrong direction (e.g. input to input)
    #[error("Port `{port}` of model `{model_id}` is an {found} port, but the coupling requires an {expected} port")]
    DirectionMismatch {
        model_id: String,
        port: String,
        expected: Direction,
        found: Direction,
    },

    /// A coupling connects a port to itself
    #[error("Port `{port}` of model `{model_id}` is coupled to itself")]
    SelfCoupling { model_id: String, port: String },

    /// A coupling delivers a model's output back to that model within one step
    #[error("Model `{0}` is coupled to itself, creating a same-step delivery cycle")]
    CouplingCycle(String),

    /// A coupling connects ports with incompatible value kinds
    #[error("Coupling from `{source_model}.{source_port}` ({source_kind}) to `{target_model}.{target_port}` ({target_kind}) has incompatible value kinds")]
    PortKindMismatch {
        source_model: String,
        source_port: String,
        source_kind: String,
        target_model: String,
        target_port: String,
        target_kind: String,
    },

    /// A model tree configuration names an unregistered atomic model type
    #[error("Unknown model type `{0}`")]
    UnknownModelType(String),
}

/// `SimulationError` enumerates all possible errors returned by pdevs
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Represents an invalid model tree, detected before simulation
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    /// Represents a violated scheduling invariant - a kernel or plug-in bug
    #[error("Scheduling error in model `{model_id}` at t={time}: {reason}")]
    Scheduling {
        model_id: String,
        time: f64,
        reason: String,
    },

    /// Represents a failed atomic model transition or output function
    #[error("Model `{model_id}` failed during its {event} function at t={time}")]
    ModelTransition {
        model_id: String,
        time: f64,
        event: EventKind,
        #[source]
        source: Box<SimulationError>,
    },

    /// Represents an invalid model state
    #[error("An invalid model state was encountered")]
    InvalidModelState,

    /// Represents an invalid inter-model message encountered
    #[error("An invalid inter-model message was encountered: {0}")]
    InvalidMessage(String),

    /// Represents an operation requested on a model port that does not exist
    #[error("Port `{0}` cannot be found on the model")]
    PortNotFound(String),

    /// Transparent serde_json errors
    #[error(transparent)]
    JSONError(#[from] serde_json::error::Error),

    /// Transparent serde_yaml errors
    #[error(transparent)]
    YAMLError(#[from] serde_yaml::Error),
}

impl SimulationError {
    pub(crate) fn scheduling(model_id: &str, time: f64, reason: impl Into<String>) -> Self {
        SimulationError::Scheduling {
            model_id: model_id.to_string(),
            time,
            reason: reason.into(),
        }
    }

    pub(crate) fn transition(
        model_id: &str,
        time: f64,
        event: EventKind,
        source: SimulationError,
    ) -> Self {
        SimulationError::ModelTransition {
            model_id: model_id.to_string(),
            time,
            event,
            source: Box::new(source),
        }
    }

    /// The model the error is attributed to, for scheduling and model
    /// transition failures.
    pub fn model_id(&self) -> Option<&str> {
        match self {
            SimulationError::Scheduling { model_id, .. }
            | SimulationError::ModelTransition { model_id, .. } => Some(model_id),
            _ => None,
        }
    }

    /// The simulation time of the failure, for scheduling and model
    /// transition failures.
    pub fn time(&self) -> Option<f64> {
        match self {
            SimulationError::Scheduling { time, .. }
            | SimulationError::ModelTransition { time, .. } => Some(*time),
            _ => None,
        }
    }

    pub fn is_construction_error(&self) -> bool {
        matches!(self, SimulationError::Construction(_))
    }

    pub fn is_scheduling_error(&self) -> bool {
        matches!(self, SimulationError::Scheduling { .. })
    }

    pub fn is_model_transition_error(&self) -> bool {
        matches!(self, SimulationError::ModelTransition { .. })
    }
}
