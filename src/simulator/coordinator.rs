use std::mem;

use log::trace;

use super::coupling::CouplingTable;
use super::observer::{EventRecord, Payload};
use super::processor::Processor;
use super::services::Services;
use crate::models::{Bag, Coupled, Model};
use crate::utils::errors::{EventKind, SimulationError};
use crate::utils::{earliest, equivalent_f64};

/// The `Coordinator` executes one coupled model.  It is due as early as its
/// earliest component, collects outputs from imminent components in
/// construction order, and routes them to siblings and to its own outputs.
#[derive(Clone)]
pub struct Coordinator {
    id: String,
    components: Vec<Processor>,
    couplings: CouplingTable,
    last_event_time: f64,
    next_event_time: f64,
    // Component inputs routed by the last `collect_output`, consumed by the
    // next `advance`
    routed: Vec<Bag>,
    collected_at: Option<f64>,
}

impl Coordinator {
    pub fn new(id: String, coupled: Coupled) -> Self {
        let (components, external_input, external_output, internal) = coupled.into_parts();
        let component_ids: Vec<&str> = components.iter().map(Model::id).collect();
        let couplings =
            CouplingTable::new(&component_ids, &external_input, &external_output, &internal);
        let components = components
            .into_iter()
            .map(|component| Processor::new(component, Some(id.as_str())))
            .collect();
        Self {
            id,
            components,
            couplings,
            last_event_time: 0.0,
            next_event_time: f64::INFINITY,
            routed: Vec::new(),
            collected_at: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn components(&self) -> &[Processor] {
        &self.components
    }

    pub fn last_event_time(&self) -> f64 {
        self.last_event_time
    }

    pub fn next_event_time(&self) -> f64 {
        self.next_event_time
    }

    pub fn initialize(&mut self, start_time: f64) -> Result<(), SimulationError> {
        self.components
            .iter_mut()
            .try_for_each(|component| component.initialize(start_time))?;
        self.last_event_time = start_time;
        self.next_event_time = self.earliest_component();
        self.routed = Vec::new();
        self.collected_at = None;
        Ok(())
    }

    /// Collects the outputs of the imminent components and routes them.
    /// Sibling inputs are held for the following `advance`; the bag on the
    /// coordinator's own output ports is returned for the parent to route.
    pub fn collect_output(
        &mut self,
        time: f64,
        services: &mut Services,
    ) -> Result<Bag, SimulationError> {
        if !equivalent_f64(time, self.next_event_time) {
            return Err(SimulationError::scheduling(
                &self.id,
                time,
                format![
                    "output requested, but the next event is at t={}",
                    self.next_event_time
                ],
            ));
        }
        let outputs: Vec<(usize, Bag)> = self
            .components
            .iter_mut()
            .enumerate()
            .filter(|(_, component)| equivalent_f64(component.next_event_time(), time))
            .map(|(index, component)| -> Result<(usize, Bag), SimulationError> {
                Ok((index, component.collect_output(time, services)?))
            })
            .collect::<Result<_, SimulationError>>()?;
        trace!(
            "t={} {} collected outputs from {} imminent components",
            time,
            self.id,
            outputs.len()
        );
        let (routed, external) = self.couplings.route_outputs(&outputs);
        self.routed = routed;
        self.collected_at = Some(time);
        if !external.is_empty() {
            let id = &self.id;
            services.observe(|| EventRecord {
                time,
                model_id: id.clone(),
                kind: EventKind::Output,
                payload: Payload::Bag(external.clone()),
            });
        }
        Ok(external)
    }

    /// Delivers `inputs` through the external input couplings, merged after
    /// the internally routed values, and advances every component that is
    /// imminent or has inputs.  Other components are left untouched.
    pub fn advance(
        &mut self,
        time: f64,
        inputs: Bag,
        services: &mut Services,
    ) -> Result<(), SimulationError> {
        let imminent = equivalent_f64(time, self.next_event_time);
        if time < self.last_event_time || time > self.next_event_time {
            return Err(SimulationError::scheduling(
                &self.id,
                time,
                format![
                    "advance requested outside the window [{}, {}]",
                    self.last_event_time, self.next_event_time
                ],
            ));
        }
        if imminent && self.collected_at.map_or(true, |collected| !equivalent_f64(collected, time)) {
            return Err(SimulationError::scheduling(
                &self.id,
                time,
                "advance requested before collecting the imminent outputs",
            ));
        }
        if !imminent && inputs.is_empty() {
            return Err(SimulationError::scheduling(
                &self.id,
                time,
                format![
                    "transition requested without inputs, but the next event is at t={}",
                    self.next_event_time
                ],
            ));
        }
        let mut bags = if imminent {
            mem::take(&mut self.routed)
        } else {
            vec![Bag::new(); self.components.len()]
        };
        self.couplings
            .route_inputs(&inputs)
            .into_iter()
            .zip(bags.iter_mut())
            .for_each(|(external, bag)| bag.merge(external));
        self.components
            .iter_mut()
            .zip(bags.into_iter())
            .filter(|(component, bag)| {
                !bag.is_empty() || equivalent_f64(component.next_event_time(), time)
            })
            .try_for_each(|(component, bag)| component.advance(time, bag, services))?;
        self.last_event_time = time;
        self.next_event_time = self.earliest_component();
        self.collected_at = None;
        Ok(())
    }

    fn earliest_component(&self) -> f64 {
        earliest(self.components.iter().map(Processor::next_event_time))
    }
}
