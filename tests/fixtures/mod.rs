#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use pdevs::models::{AtomicModel, Bag, Port, Value, ValueKind};
use pdevs::utils::errors::SimulationError;
use pdevs_derive::{register, SerializableModel};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn register_fixtures() {
    register!(Counter);
    register!(Passive);
    register!(AnalogSource);
    register!(Averager);
    register!(Echo);
    register!(Faulty);
}

/// The counter emits `count + 1` every `period`, then counts the internal
/// event.  External inputs are kept, and do not reset the schedule.
#[derive(Debug, Clone, Serialize, Deserialize, SerializableModel)]
#[serde(rename_all = "camelCase")]
pub struct Counter {
    period: f64,
    #[serde(default)]
    state: CounterState,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterState {
    pub until_next: Option<f64>,
    pub count: i64,
    pub received: Vec<i64>,
    pub history: Vec<String>,
}

impl Counter {
    pub fn new(period: f64) -> Self {
        Self {
            period,
            state: CounterState::default(),
        }
    }

    /// A counter whose first internal event happens at the start time.
    pub fn immediate(period: f64) -> Self {
        let mut counter = Self::new(period);
        counter.state.until_next = Some(0.0);
        counter
    }

    fn until_next(&self) -> f64 {
        self.state.until_next.unwrap_or(self.period)
    }
}

impl AtomicModel for Counter {
    fn ports_in(&self) -> Vec<Port> {
        vec![Port::new("in", ValueKind::Integer)]
    }

    fn ports_out(&self) -> Vec<Port> {
        vec![Port::new("out", ValueKind::Integer)]
    }

    fn time_advance(&self) -> f64 {
        self.until_next()
    }

    fn internal_transition(&mut self) -> Result<(), SimulationError> {
        self.state.count += 1;
        self.state.until_next = Some(self.period);
        self.state.history.push(String::from("internal"));
        Ok(())
    }

    fn external_transition(&mut self, elapsed: f64, inputs: &Bag) -> Result<(), SimulationError> {
        self.state.until_next = Some(self.until_next() - elapsed);
        self.state.history.push(String::from("external"));
        inputs.get("in").iter().try_for_each(|value| {
            let value = value
                .as_integer()
                .ok_or_else(|| SimulationError::InvalidMessage(format!["{:?}", value]))?;
            self.state.received.push(value);
            Ok(())
        })
    }

    fn output(&self) -> Result<Bag, SimulationError> {
        Ok(Bag::new().with("out", self.state.count + 1))
    }
}

/// Like `Counter`, but with an external-before-internal confluent
/// tie-break.
#[derive(Debug, Clone, Serialize, Deserialize, SerializableModel)]
pub struct ExternalFirstCounter {
    pub inner: Counter,
}

impl AtomicModel for ExternalFirstCounter {
    fn ports_in(&self) -> Vec<Port> {
        self.inner.ports_in()
    }

    fn ports_out(&self) -> Vec<Port> {
        self.inner.ports_out()
    }

    fn time_advance(&self) -> f64 {
        self.inner.time_advance()
    }

    fn internal_transition(&mut self) -> Result<(), SimulationError> {
        self.inner.internal_transition()
    }

    fn external_transition(&mut self, elapsed: f64, inputs: &Bag) -> Result<(), SimulationError> {
        self.inner.external_transition(elapsed, inputs)
    }

    // External first, then internal
    fn confluent_transition(&mut self, inputs: &Bag) -> Result<(), SimulationError> {
        self.inner.external_transition(0.0, inputs)?;
        self.inner.internal_transition()
    }

    fn output(&self) -> Result<Bag, SimulationError> {
        self.inner.output()
    }
}

/// The passive model never schedules an internal event, and keeps whatever
/// it receives.
#[derive(Debug, Clone, Default, Serialize, Deserialize, SerializableModel)]
#[serde(rename_all = "camelCase")]
pub struct Passive {
    #[serde(default)]
    pub received: Vec<Value>,
    #[serde(default)]
    pub transitions: usize,
}

impl AtomicModel for Passive {
    fn ports_in(&self) -> Vec<Port> {
        vec![Port::any("in")]
    }

    fn ports_out(&self) -> Vec<Port> {
        vec![Port::any("out")]
    }

    fn time_advance(&self) -> f64 {
        f64::INFINITY
    }

    fn internal_transition(&mut self) -> Result<(), SimulationError> {
        Err(SimulationError::InvalidModelState)
    }

    fn external_transition(&mut self, _elapsed: f64, inputs: &Bag) -> Result<(), SimulationError> {
        self.transitions += 1;
        self.received.extend(inputs.get("in").iter().cloned());
        Ok(())
    }

    fn output(&self) -> Result<Bag, SimulationError> {
        Ok(Bag::new())
    }
}

/// Emits a fixed sequence of readings, one every `period`, then goes
/// passive.  Stands in for an analog input pin.
#[derive(Debug, Clone, Serialize, Deserialize, SerializableModel)]
#[serde(rename_all = "camelCase")]
pub struct AnalogSource {
    readings: Vec<f64>,
    period: f64,
    #[serde(default)]
    index: usize,
}

impl AnalogSource {
    pub fn new(readings: Vec<f64>, period: f64) -> Self {
        Self {
            readings,
            period,
            index: 0,
        }
    }
}

impl AtomicModel for AnalogSource {
    fn ports_in(&self) -> Vec<Port> {
        Vec::new()
    }

    fn ports_out(&self) -> Vec<Port> {
        vec![Port::new("out", ValueKind::Float)]
    }

    fn time_advance(&self) -> f64 {
        if self.index < self.readings.len() {
            self.period
        } else {
            f64::INFINITY
        }
    }

    fn internal_transition(&mut self) -> Result<(), SimulationError> {
        self.index += 1;
        Ok(())
    }

    fn external_transition(&mut self, _elapsed: f64, _inputs: &Bag) -> Result<(), SimulationError> {
        Err(SimulationError::InvalidModelState)
    }

    fn output(&self) -> Result<Bag, SimulationError> {
        let reading = self
            .readings
            .get(self.index)
            .ok_or(SimulationError::InvalidModelState)?;
        Ok(Bag::new().with("out", *reading))
    }
}

/// Averages the latest reading of each input, and emits the average
/// immediately after any input changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, SerializableModel)]
#[serde(rename_all = "camelCase")]
pub struct Averager {
    #[serde(default)]
    latest: Vec<Option<f64>>,
    #[serde(default)]
    pending: bool,
}

impl Averager {
    pub fn new() -> Self {
        Self {
            latest: vec![None, None],
            pending: false,
        }
    }

    fn average(&self) -> Option<f64> {
        let readings: Vec<f64> = self.latest.iter().filter_map(|reading| *reading).collect();
        if readings.is_empty() {
            None
        } else {
            Some(readings.iter().sum::<f64>() / readings.len() as f64)
        }
    }
}

impl AtomicModel for Averager {
    fn ports_in(&self) -> Vec<Port> {
        vec![
            Port::new("in1", ValueKind::Float),
            Port::new("in2", ValueKind::Float),
        ]
    }

    fn ports_out(&self) -> Vec<Port> {
        vec![Port::new("out", ValueKind::Float)]
    }

    fn time_advance(&self) -> f64 {
        if self.pending {
            0.0
        } else {
            f64::INFINITY
        }
    }

    fn internal_transition(&mut self) -> Result<(), SimulationError> {
        self.pending = false;
        Ok(())
    }

    fn external_transition(&mut self, _elapsed: f64, inputs: &Bag) -> Result<(), SimulationError> {
        self.latest.resize(2, None);
        for (slot, port) in ["in1", "in2"].iter().enumerate() {
            // The last of several same-step readings wins
            if let Some(reading) = inputs.get(port).last() {
                self.latest[slot] = reading.as_float();
            }
        }
        self.pending = true;
        Ok(())
    }

    fn output(&self) -> Result<Bag, SimulationError> {
        match self.average() {
            Some(average) => Ok(Bag::new().with("out", average)),
            None => Ok(Bag::new()),
        }
    }
}

/// Fails its first internal transition.
#[derive(Debug, Clone, Serialize, Deserialize, SerializableModel)]
pub struct Faulty {
    pub fail_at_count: i64,
    pub count: i64,
}

impl AtomicModel for Faulty {
    fn ports_in(&self) -> Vec<Port> {
        Vec::new()
    }

    fn ports_out(&self) -> Vec<Port> {
        Vec::new()
    }

    fn time_advance(&self) -> f64 {
        1.0
    }

    fn internal_transition(&mut self) -> Result<(), SimulationError> {
        self.count += 1;
        if self.count >= self.fail_at_count {
            Err(SimulationError::InvalidModelState)
        } else {
            Ok(())
        }
    }

    fn external_transition(&mut self, _elapsed: f64, _inputs: &Bag) -> Result<(), SimulationError> {
        Ok(())
    }

    fn output(&self) -> Result<Bag, SimulationError> {
        Ok(Bag::new())
    }
}

/// Echoes every input immediately.  Two echoes coupled in a ring, once
/// primed, exchange messages forever without advancing time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, SerializableModel)]
pub struct Echo {
    pub primed: bool,
    pub last: Option<Value>,
}

impl AtomicModel for Echo {
    fn ports_in(&self) -> Vec<Port> {
        vec![Port::any("in")]
    }

    fn ports_out(&self) -> Vec<Port> {
        vec![Port::any("out")]
    }

    fn time_advance(&self) -> f64 {
        if self.primed {
            0.0
        } else {
            f64::INFINITY
        }
    }

    fn internal_transition(&mut self) -> Result<(), SimulationError> {
        self.primed = false;
        Ok(())
    }

    fn external_transition(&mut self, _elapsed: f64, inputs: &Bag) -> Result<(), SimulationError> {
        self.last = inputs.get("in").last().cloned();
        self.primed = true;
        Ok(())
    }

    fn output(&self) -> Result<Bag, SimulationError> {
        Ok(Bag::new().with("out", self.last.clone().unwrap_or(Value::Bool(true))))
    }
}
