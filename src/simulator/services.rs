use super::observer::{EventRecord, Observer};

/// The runner provides step accounting and the optional observation sink to
/// simulators and coordinators during the execution of a simulation step.
/// The simulation clock itself is passed explicitly to every call.
#[derive(Default)]
pub struct Services {
    observer: Option<Box<dyn Observer>>,
    step_transitions: usize,
    total_transitions: usize,
}

impl Services {
    pub fn new(observer: Option<Box<dyn Observer>>) -> Self {
        Self {
            observer,
            ..Self::default()
        }
    }

    pub fn set_observer(&mut self, observer: Box<dyn Observer>) {
        self.observer = Some(observer);
    }

    /// Builds and delivers a record, only when an observer is attached.
    pub fn observe<F: FnOnce() -> EventRecord>(&mut self, record: F) {
        if let Some(observer) = self.observer.as_mut() {
            observer.observe(&record());
        }
    }

    pub fn begin_step(&mut self) {
        self.step_transitions = 0;
    }

    pub fn record_transition(&mut self) {
        self.step_transitions += 1;
        self.total_transitions += 1;
    }

    /// Transitions executed since the start of the current step.
    pub fn step_transitions(&self) -> usize {
        self.step_transitions
    }

    pub fn total_transitions(&self) -> usize {
        self.total_transitions
    }
}
