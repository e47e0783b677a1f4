//! The models module provides the building blocks of a model tree: ports,
//! message bags, the `AtomicModel` contract that every leaf model
//! implements, and validated coupled models.  The kernel ships no domain
//! models; sensor readers, fusion logic, and actuators are plug-ins that
//! implement `AtomicModel`.

pub mod bag;
pub mod coupled;
pub mod model;
pub mod port;

pub mod model_factory;
pub mod model_repr;
pub mod model_trait;

pub use self::bag::Bag;
pub use self::coupled::{Coupled, ExternalInputCoupling, ExternalOutputCoupling, InternalCoupling};
pub use self::model::{Model, ModelKind};
pub use self::model_trait::{AtomicModel, ModelClone, SerializableModel};
pub use self::port::{Direction, Port, Value, ValueKind};

pub use self::model_repr::ModelRepr;
