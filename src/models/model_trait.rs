use super::{Bag, Port};
use crate::utils::errors::SimulationError;

pub trait ModelClone {
    fn clone_box(&self) -> Box<dyn AtomicModel>;
}

impl<T> ModelClone for T
where
    T: 'static + AtomicModel + Clone,
{
    fn clone_box(&self) -> Box<dyn AtomicModel> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn AtomicModel> {
    fn clone(&self) -> Box<dyn AtomicModel> {
        self.clone_box()
    }
}

/// Type naming and state snapshots, usually provided by
/// `#[derive(SerializableModel)]`.  The snapshot is what observers receive
/// after every transition.
pub trait SerializableModel {
    fn get_type(&self) -> &'static str {
        "Model"
    }
    fn serialize(&self) -> serde_yaml::Value {
        serde_yaml::Value::Null
    }
}

/// The `AtomicModel` trait defines everything required for a leaf model to
/// operate within the Parallel DEVS simulation.  The formalism requires
/// `time_advance`, `internal_transition`, `external_transition`,
/// `confluent_transition`, and `output`.  Port declarations let the kernel
/// validate couplings before a run starts.
///
/// Any error returned from a transition or output function is fatal to the
/// run, since model state consistency cannot be guaranteed afterwards.
pub trait AtomicModel: ModelClone + SerializableModel {
    fn ports_in(&self) -> Vec<Port>;

    fn ports_out(&self) -> Vec<Port>;

    /// Time until the next internal event, given the current state.
    /// `f64::INFINITY` means the model is passive.
    fn time_advance(&self) -> f64;

    fn internal_transition(&mut self) -> Result<(), SimulationError>;

    /// `elapsed` is the time since the last transition of any kind.
    fn external_transition(&mut self, elapsed: f64, inputs: &Bag) -> Result<(), SimulationError>;

    /// Applied when inputs arrive at the instant an internal event is due.
    /// Defaults to the internal transition followed by an external
    /// transition with zero elapsed time.  Models overriding this should
    /// document their tie-break.
    fn confluent_transition(&mut self, inputs: &Bag) -> Result<(), SimulationError> {
        self.internal_transition()?;
        self.external_transition(0.0, inputs)
    }

    /// Output values, computed from the current state just before an
    /// internal or confluent transition.
    fn output(&self) -> Result<Bag, SimulationError>;

    fn status(&self) -> String {
        String::from(self.get_type())
    }
}
