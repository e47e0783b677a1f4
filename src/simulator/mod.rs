//! The simulator module provides the mechanics to execute a model tree via
//! discrete event simulation.  The specific formalism for simulation
//! execution is Parallel DEVS: every atomic model is wrapped by a
//! `Simulator`, every coupled model by a `Coordinator`, and a
//! `RootCoordinator` drives the top of the tree and owns the global clock.
//!
//! Each step, the root collects the outputs of the imminent models
//! (recursively, routing them through the coupling tables) and then advances
//! every imminent or influenced model with its input bag.  Observers attached
//! to the root receive every transition and transmitted bag.

pub mod atomic;
pub mod config;
pub mod coordinator;
pub mod coupling;
pub mod observer;
pub mod processor;
pub mod runner;
pub mod services;

pub use self::atomic::Simulator;
pub use self::config::RunConfig;
pub use self::coordinator::Coordinator;
pub use self::coupling::CouplingTable;
pub use self::observer::{EventRecord, LogObserver, Observer, Payload, RecordingObserver};
pub use self::processor::Processor;
pub use self::runner::{run_until, RootCoordinator, RunReport, RunStatus, RunnerConfig};
pub use self::services::Services;
