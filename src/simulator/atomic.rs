use log::trace;

use super::observer::{EventRecord, Payload};
use super::services::Services;
use crate::models::{AtomicModel, Bag, Port};
use crate::utils::errors::{EventKind, SimulationError};
use crate::utils::{equivalent_f64, valid_time_advance};

/// The `Simulator` wraps one atomic model, owns its state exclusively, and
/// caches its last and next event times.  Transitions are selected from the
/// simulation time and the input bag, as per Parallel DEVS.
#[derive(Clone)]
pub struct Simulator {
    id: String,
    model: Box<dyn AtomicModel>,
    ports_out: Vec<Port>,
    last_event_time: f64,
    next_event_time: f64,
}

impl Simulator {
    pub fn new(id: String, model: Box<dyn AtomicModel>) -> Self {
        let ports_out = model.ports_out();
        Self {
            id,
            model,
            ports_out,
            last_event_time: 0.0,
            next_event_time: f64::INFINITY,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn model(&self) -> &dyn AtomicModel {
        &*self.model
    }

    pub fn last_event_time(&self) -> f64 {
        self.last_event_time
    }

    pub fn next_event_time(&self) -> f64 {
        self.next_event_time
    }

    /// Starts the model's clock at `start_time`.
    pub fn initialize(&mut self, start_time: f64) -> Result<(), SimulationError> {
        self.last_event_time = start_time;
        self.next_event_time = self.schedule(start_time)?;
        Ok(())
    }

    /// Computes the model output, which is only valid at the model's next
    /// event time.  The bag is checked against the declared output ports.
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
        let bag = self
            .model
            .output()
            .and_then(|bag| self.check_output(bag))
            .map_err(|err| SimulationError::transition(&self.id, time, EventKind::Output, err))?;
        if !bag.is_empty() {
            trace!("t={} {} output {} values", time, self.id, bag.len());
            let id = &self.id;
            services.observe(|| EventRecord {
                time,
                model_id: id.clone(),
                kind: EventKind::Output,
                payload: Payload::Bag(bag.clone()),
            });
        }
        Ok(bag)
    }

    /// Executes the transition due at `time`: external when inputs arrive
    /// before the next event, confluent when inputs arrive at the next
    /// event, and internal when the next event is reached without inputs.
    pub fn advance(
        &mut self,
        time: f64,
        inputs: Bag,
        services: &mut Services,
    ) -> Result<(), SimulationError> {
        let imminent = equivalent_f64(time, self.next_event_time);
        let kind = match (inputs.is_empty(), imminent) {
            (true, true) => EventKind::Internal,
            (false, true) => EventKind::Confluent,
            (false, false) if time >= self.last_event_time && time < self.next_event_time => {
                EventKind::External
            }
            (true, false) => {
                return Err(SimulationError::scheduling(
                    &self.id,
                    time,
                    format![
                        "transition requested without inputs, but the next event is at t={}",
                        self.next_event_time
                    ],
                ))
            }
            (false, false) => {
                return Err(SimulationError::scheduling(
                    &self.id,
                    time,
                    format![
                        "inputs delivered outside the window [{}, {})",
                        self.last_event_time, self.next_event_time
                    ],
                ))
            }
        };
        let result = match kind {
            EventKind::Internal => self.model.internal_transition(),
            EventKind::Confluent => self.model.confluent_transition(&inputs),
            _ => self
                .model
                .external_transition(time - self.last_event_time, &inputs),
        };
        result.map_err(|err| SimulationError::transition(&self.id, time, kind, err))?;
        self.last_event_time = time;
        self.next_event_time = self.schedule(time)?;
        services.record_transition();
        trace!(
            "t={} {} {} transition ({}), next event at t={}",
            time,
            self.id,
            kind,
            self.model.status(),
            self.next_event_time
        );
        let (id, model) = (&self.id, &self.model);
        services.observe(|| EventRecord {
            time,
            model_id: id.clone(),
            kind,
            payload: Payload::State(model.serialize()),
        });
        Ok(())
    }

    fn schedule(&self, time: f64) -> Result<f64, SimulationError> {
        let time_advance = self.model.time_advance();
        if valid_time_advance(time_advance) {
            Ok(time + time_advance)
        } else {
            Err(SimulationError::scheduling(
                &self.id,
                time,
                format!["invalid time advance {}", time_advance],
            ))
        }
    }

    fn check_output(&self, bag: Bag) -> Result<Bag, SimulationError> {
        bag.iter().try_for_each(|(port, values)| {
            let declared = self
                .ports_out
                .iter()
                .find(|declared| declared.name == *port)
                .ok_or_else(|| SimulationError::PortNotFound(port.clone()))?;
            match values.iter().find(|value| !declared.kind.admits(value)) {
                Some(value) => Err(SimulationError::InvalidMessage(format![
                    "{:?} does not match the {} kind of port `{}`",
                    value, declared.kind, port
                ])),
                None => Ok(()),
            }
        })?;
        Ok(bag)
    }
}
