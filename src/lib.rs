//! # Overview
//! "pdevs" provides a hierarchical Parallel DEVS simulation kernel, for
//! composing atomic models (sensor readers, fusion logic, actuators) into
//! coupled models and executing them in simulated time.
//!
//! This repository contains:
//!
//! * Modeling framework - ports, message bags, the atomic model contract,
//! and validated coupled models, with YAML/JSON model tree configuration.
//! * Simulator engine - simulators, coordinators, and a root coordinator
//! that drives a model tree to a fixed or open time horizon.
//! * Observation hooks, for tracing transitions and transmitted bags without
//! influencing scheduling.
//!
//! The kernel is single-threaded and step-synchronous.  It does not require
//! nightly Rust.

// Lets the derive macros refer to `pdevs::...` from inside this crate too.
extern crate self as pdevs;

pub mod models;
pub mod simulator;
pub mod utils;

pub use serde_yaml;
