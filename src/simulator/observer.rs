//! Observation hooks.  Observers receive a record for every transition and
//! every non-empty output bag, in execution order.  They cannot influence
//! scheduling.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use log::{debug, trace};
use serde::Serialize;

use crate::models::Bag;
use crate::utils::errors::EventKind;

/// What an observer sees alongside an event: the model state after a
/// transition, or the bag transmitted by an output function.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Payload {
    State(serde_yaml::Value),
    Bag(Bag),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub time: f64,
    pub model_id: String,
    pub kind: EventKind,
    pub payload: Payload,
}

pub trait Observer {
    fn observe(&mut self, record: &EventRecord);
}

impl<F> Observer for F
where
    F: FnMut(&EventRecord),
{
    fn observe(&mut self, record: &EventRecord) {
        self(record)
    }
}

/// Keeps every record in memory.  Clones share the same record list, so a
/// clone can be handed to the runner and the original read afterwards.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    records: Rc<RefCell<Vec<EventRecord>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Ref<'_, Vec<EventRecord>> {
        self.records.borrow()
    }

    /// Records for a single model, in execution order.
    pub fn records_for(&self, model_id: &str) -> Vec<EventRecord> {
        self.records
            .borrow()
            .iter()
            .filter(|record| record.model_id == model_id)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }
}

impl Observer for RecordingObserver {
    fn observe(&mut self, record: &EventRecord) {
        self.records.borrow_mut().push(record.clone());
    }
}

/// Forwards records to the `log` facade: transitions at `debug`, output
/// bags at `trace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn observe(&mut self, record: &EventRecord) {
        match &record.payload {
            Payload::State(state) => debug!(
                "t={} {} {} transition, state {:?}",
                record.time, record.model_id, record.kind, state
            ),
            Payload::Bag(bag) => trace!(
                "t={} {} output {:?}",
                record.time,
                record.model_id,
                bag
            ),
        }
    }
}
