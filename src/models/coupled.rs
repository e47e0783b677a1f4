use std::collections::HashSet;
use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use super::port::{find_port, Direction, Port};
use super::Model;
use crate::utils::errors::{ConstructionError, SimulationError};

/// Placeholder ID for the coupled model's own ports in construction errors,
/// when a `Coupled` is built without knowing the ID of its `Model`.
const OWN_PORTS: &str = "<coupled>";

/// A coupled model is a composite of components (atomic or coupled) plus
/// its coupling table.  Couplings are validated on construction: every
/// referenced component and port must exist, couplings must run from an
/// output-side port to an input-side port, value kinds must be compatible,
/// and no component may be coupled to itself.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "CoupledRepr")]
pub struct Coupled {
    ports_in: Vec<Port>,
    ports_out: Vec<Port>,
    components: Vec<Model>,
    external_input_couplings: Vec<ExternalInputCoupling>,
    external_output_couplings: Vec<ExternalOutputCoupling>,
    internal_couplings: Vec<InternalCoupling>,
}

/// Routes a value arriving on one of the coupled model's input ports to a
/// component input port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalInputCoupling {
    #[serde(rename = "targetID")]
    pub target_id: String,
    pub source_port: String,
    pub target_port: String,
}

/// Routes a value from a component output port to one of the coupled
/// model's output ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalOutputCoupling {
    #[serde(rename = "sourceID")]
    pub source_id: String,
    pub source_port: String,
    pub target_port: String,
}

/// Routes a value from a component output port to a sibling component
/// input port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalCoupling {
    #[serde(rename = "sourceID")]
    pub source_id: String,
    #[serde(rename = "targetID")]
    pub target_id: String,
    pub source_port: String,
    pub target_port: String,
}

impl ExternalInputCoupling {
    pub fn new(source_port: &str, target_id: &str, target_port: &str) -> Self {
        Self {
            target_id: target_id.to_string(),
            source_port: source_port.to_string(),
            target_port: target_port.to_string(),
        }
    }
}

impl ExternalOutputCoupling {
    pub fn new(source_id: &str, source_port: &str, target_port: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            source_port: source_port.to_string(),
            target_port: target_port.to_string(),
        }
    }
}

impl InternalCoupling {
    pub fn new(source_id: &str, source_port: &str, target_id: &str, target_port: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            source_port: source_port.to_string(),
            target_port: target_port.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoupledRepr {
    #[serde(default)]
    ports_in: Vec<Port>,
    #[serde(default)]
    ports_out: Vec<Port>,
    components: Vec<Model>,
    #[serde(default)]
    external_input_couplings: Vec<ExternalInputCoupling>,
    #[serde(default)]
    external_output_couplings: Vec<ExternalOutputCoupling>,
    #[serde(default)]
    internal_couplings: Vec<InternalCoupling>,
}

impl TryFrom<CoupledRepr> for Coupled {
    type Error = SimulationError;

    fn try_from(repr: CoupledRepr) -> Result<Self, Self::Error> {
        Coupled::from_repr(OWN_PORTS, repr)
    }
}

/// The declared ports of one component, gathered once for validation.
struct ComponentPorts {
    id: String,
    ports_in: Vec<Port>,
    ports_out: Vec<Port>,
}

impl Coupled {
    pub fn new(
        ports_in: Vec<Port>,
        ports_out: Vec<Port>,
        components: Vec<Model>,
        external_input_couplings: Vec<ExternalInputCoupling>,
        external_output_couplings: Vec<ExternalOutputCoupling>,
        internal_couplings: Vec<InternalCoupling>,
    ) -> Result<Self, SimulationError> {
        Self::from_repr(
            OWN_PORTS,
            CoupledRepr {
                ports_in,
                ports_out,
                components,
                external_input_couplings,
                external_output_couplings,
                internal_couplings,
            },
        )
    }

    /// Deserializes and validates a coupled model whose ID is already known,
    /// so construction errors about its own ports name it.
    pub(crate) fn from_value(id: &str, value: serde_yaml::Value) -> Result<Self, SimulationError> {
        Self::from_repr(id, serde_yaml::from_value::<CoupledRepr>(value)?)
    }

    fn from_repr(id: &str, repr: CoupledRepr) -> Result<Self, SimulationError> {
        let coupled = Self {
            ports_in: repr.ports_in,
            ports_out: repr.ports_out,
            components: repr.components,
            external_input_couplings: repr.external_input_couplings,
            external_output_couplings: repr.external_output_couplings,
            internal_couplings: repr.internal_couplings,
        };
        coupled.validate(id)?;
        Ok(coupled)
    }

    pub fn ports_in(&self) -> &[Port] {
        &self.ports_in
    }

    pub fn ports_out(&self) -> &[Port] {
        &self.ports_out
    }

    pub fn components(&self) -> &[Model] {
        &self.components
    }

    pub fn external_input_couplings(&self) -> &[ExternalInputCoupling] {
        &self.external_input_couplings
    }

    pub fn external_output_couplings(&self) -> &[ExternalOutputCoupling] {
        &self.external_output_couplings
    }

    pub fn internal_couplings(&self) -> &[InternalCoupling] {
        &self.internal_couplings
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Vec<Model>,
        Vec<ExternalInputCoupling>,
        Vec<ExternalOutputCoupling>,
        Vec<InternalCoupling>,
    ) {
        (
            self.components,
            self.external_input_couplings,
            self.external_output_couplings,
            self.internal_couplings,
        )
    }

    fn validate(&self, own_id: &str) -> Result<(), ConstructionError> {
        unique_ports(own_id, &self.ports_in)?;
        unique_ports(own_id, &self.ports_out)?;

        let mut ids = HashSet::new();
        let components: Vec<ComponentPorts> = self
            .components
            .iter()
            .map(|component| -> Result<ComponentPorts, ConstructionError> {
                if !ids.insert(component.id()) {
                    return Err(ConstructionError::DuplicateModelId(
                        component.id().to_string(),
                    ));
                }
                let ports = ComponentPorts {
                    id: component.id().to_string(),
                    ports_in: component.ports_in(),
                    ports_out: component.ports_out(),
                };
                unique_ports(&ports.id, &ports.ports_in)?;
                unique_ports(&ports.id, &ports.ports_out)?;
                Ok(ports)
            })
            .collect::<Result<_, _>>()?;
        self.external_input_couplings
            .iter()
            .try_for_each(|coupling| -> Result<(), ConstructionError> {
                let source = resolve_port(
                    own_id,
                    &self.ports_in,
                    &self.ports_out,
                    &coupling.source_port,
                    Direction::Input,
                )?;
                let target_component = find_component(&components, &coupling.target_id)?;
                let target = resolve_port(
                    &target_component.id,
                    &target_component.ports_in,
                    &target_component.ports_out,
                    &coupling.target_port,
                    Direction::Input,
                )?;
                check_kinds(own_id, source, &target_component.id, target)
            })?;

        self.external_output_couplings
            .iter()
            .try_for_each(|coupling| -> Result<(), ConstructionError> {
                let source_component = find_component(&components, &coupling.source_id)?;
                let source = resolve_port(
                    &source_component.id,
                    &source_component.ports_out,
                    &source_component.ports_in,
                    &coupling.source_port,
                    Direction::Output,
                )?;
                let target = resolve_port(
                    own_id,
                    &self.ports_out,
                    &self.ports_in,
                    &coupling.target_port,
                    Direction::Output,
                )?;
                check_kinds(&source_component.id, source, own_id, target)
            })?;

        self.internal_couplings
            .iter()
            .try_for_each(|coupling| -> Result<(), ConstructionError> {
                let source_component = find_component(&components, &coupling.source_id)?;
                let target_component = find_component(&components, &coupling.target_id)?;
                if coupling.source_id == coupling.target_id {
                    if coupling.source_port == coupling.target_port {
                        return Err(ConstructionError::SelfCoupling {
                            model_id: coupling.source_id.clone(),
                            port: coupling.source_port.clone(),
                        });
                    }
                    return Err(ConstructionError::CouplingCycle(coupling.source_id.clone()));
                }
                let source = resolve_port(
                    &source_component.id,
                    &source_component.ports_out,
                    &source_component.ports_in,
                    &coupling.source_port,
                    Direction::Output,
                )?;
                let target = resolve_port(
                    &target_component.id,
                    &target_component.ports_in,
                    &target_component.ports_out,
                    &coupling.target_port,
                    Direction::Input,
                )?;
                check_kinds(&source_component.id, source, &target_component.id, target)
            })
    }
}

fn find_component<'a>(
    components: &'a [ComponentPorts],
    id: &str,
) -> Result<&'a ComponentPorts, ConstructionError> {
    components
        .iter()
        .find(|component| component.id == id)
        .ok_or_else(|| ConstructionError::ModelNotFound(id.to_string()))
}

fn unique_ports(model_id: &str, ports: &[Port]) -> Result<(), ConstructionError> {
    let mut names = HashSet::new();
    ports.iter().try_for_each(|port| {
        if names.insert(port.name.as_str()) {
            Ok(())
        } else {
            Err(ConstructionError::DuplicatePort {
                model_id: model_id.to_string(),
                port: port.name.clone(),
            })
        }
    })
}

/// Finds `name` among the ports of the `expected` direction.  A port found
/// only on the other side is a direction mismatch.
fn resolve_port<'a>(
    model_id: &str,
    expected_side: &'a [Port],
    other_side: &[Port],
    name: &str,
    expected: Direction,
) -> Result<&'a Port, ConstructionError> {
    match find_port(expected_side, name) {
        Some(port) => Ok(port),
        None if find_port(other_side, name).is_some() => {
            Err(ConstructionError::DirectionMismatch {
                model_id: model_id.to_string(),
                port: name.to_string(),
                expected,
                found: match expected {
                    Direction::Input => Direction::Output,
                    Direction::Output => Direction::Input,
                },
            })
        }
        None => Err(ConstructionError::PortNotFound {
            model_id: model_id.to_string(),
            port: name.to_string(),
        }),
    }
}

fn check_kinds(
    source_model: &str,
    source: &Port,
    target_model: &str,
    target: &Port,
) -> Result<(), ConstructionError> {
    if source.kind.compatible(target.kind) {
        Ok(())
    } else {
        Err(ConstructionError::PortKindMismatch {
            source_model: source_model.to_string(),
            source_port: source.name.clone(),
            source_kind: source.kind.to_string(),
            target_model: target_model.to_string(),
            target_port: target.name.clone(),
            target_kind: target.kind.to_string(),
        })
    }
}
