use super::atomic::Simulator;
use super::coordinator::Coordinator;
use super::services::Services;
use crate::models::{Bag, Model, ModelKind};
use crate::utils::errors::SimulationError;

/// Separator between the IDs of a model path, e.g. `top.sensors.a4`.
pub const PATH_SEPARATOR: char = '.';

/// Every node of the executing model tree, atomic or coupled, shares one
/// scheduling contract: `next_event_time`, `collect_output`, and `advance`.
#[derive(Clone)]
pub enum Processor {
    Simulator(Simulator),
    Coordinator(Coordinator),
}

impl Processor {
    /// Builds the processor tree for a model.  Processor IDs are model
    /// paths from the root, so diagnostics identify nested models uniquely.
    pub fn new(model: Model, parent_id: Option<&str>) -> Self {
        let id = match parent_id {
            Some(parent_id) => format!["{}{}{}", parent_id, PATH_SEPARATOR, model.id()],
            None => model.id().to_string(),
        };
        match model.into_kind() {
            ModelKind::Atomic(inner) => Processor::Simulator(Simulator::new(id, inner)),
            ModelKind::Coupled(coupled) => Processor::Coordinator(Coordinator::new(id, coupled)),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Processor::Simulator(simulator) => simulator.id(),
            Processor::Coordinator(coordinator) => coordinator.id(),
        }
    }

    pub fn initialize(&mut self, start_time: f64) -> Result<(), SimulationError> {
        match self {
            Processor::Simulator(simulator) => simulator.initialize(start_time),
            Processor::Coordinator(coordinator) => coordinator.initialize(start_time),
        }
    }

    pub fn last_event_time(&self) -> f64 {
        match self {
            Processor::Simulator(simulator) => simulator.last_event_time(),
            Processor::Coordinator(coordinator) => coordinator.last_event_time(),
        }
    }

    pub fn next_event_time(&self) -> f64 {
        match self {
            Processor::Simulator(simulator) => simulator.next_event_time(),
            Processor::Coordinator(coordinator) => coordinator.next_event_time(),
        }
    }

    pub fn collect_output(
        &mut self,
        time: f64,
        services: &mut Services,
    ) -> Result<Bag, SimulationError> {
        match self {
            Processor::Simulator(simulator) => simulator.collect_output(time, services),
            Processor::Coordinator(coordinator) => coordinator.collect_output(time, services),
        }
    }

    pub fn advance(
        &mut self,
        time: f64,
        inputs: Bag,
        services: &mut Services,
    ) -> Result<(), SimulationError> {
        match self {
            Processor::Simulator(simulator) => simulator.advance(time, inputs, services),
            Processor::Coordinator(coordinator) => coordinator.advance(time, inputs, services),
        }
    }

    /// All simulators in this subtree, in construction order (depth first).
    pub fn simulators(&self) -> Vec<&Simulator> {
        match self {
            Processor::Simulator(simulator) => vec![simulator],
            Processor::Coordinator(coordinator) => coordinator
                .components()
                .iter()
                .flat_map(Processor::simulators)
                .collect(),
        }
    }

    /// Finds a simulator by its model path.
    pub fn simulator(&self, path: &str) -> Option<&Simulator> {
        self.simulators()
            .into_iter()
            .find(|simulator| simulator.id() == path)
    }
}
