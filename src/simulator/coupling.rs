use log::trace;

use crate::models::{Bag, ExternalInputCoupling, ExternalOutputCoupling, InternalCoupling};

/// Internal coupling, resolved to component indexes.
#[derive(Debug, Clone)]
struct Internal {
    source: usize,
    source_port: String,
    target: usize,
    target_port: String,
}

/// External input coupling, resolved to a component index.
#[derive(Debug, Clone)]
struct ExternalInput {
    source_port: String,
    target: usize,
    target_port: String,
}

/// External output coupling, resolved to a component index.
#[derive(Debug, Clone)]
struct ExternalOutput {
    source: usize,
    source_port: String,
    target_port: String,
}

/// The coupling table of one coordinator, with model IDs resolved to the
/// construction-order index of each component.  Routing is a pure function
/// of the table and the bags passed in.
#[derive(Debug, Clone, Default)]
pub struct CouplingTable {
    component_count: usize,
    external_input: Vec<ExternalInput>,
    external_output: Vec<ExternalOutput>,
    internal: Vec<Internal>,
}

impl CouplingTable {
    /// Resolves validated couplings against the component IDs, in
    /// construction order.  Couplings naming unknown IDs are skipped, since
    /// `Coupled` construction has already rejected them.
    pub fn new(
        component_ids: &[&str],
        external_input_couplings: &[ExternalInputCoupling],
        external_output_couplings: &[ExternalOutputCoupling],
        internal_couplings: &[InternalCoupling],
    ) -> Self {
        let index = |id: &str| component_ids.iter().position(|component| *component == id);
        Self {
            component_count: component_ids.len(),
            external_input: external_input_couplings
                .iter()
                .filter_map(|coupling| {
                    Some(ExternalInput {
                        source_port: coupling.source_port.clone(),
                        target: index(coupling.target_id.as_str())?,
                        target_port: coupling.target_port.clone(),
                    })
                })
                .collect(),
            external_output: external_output_couplings
                .iter()
                .filter_map(|coupling| {
                    Some(ExternalOutput {
                        source: index(coupling.source_id.as_str())?,
                        source_port: coupling.source_port.clone(),
                        target_port: coupling.target_port.clone(),
                    })
                })
                .collect(),
            internal: internal_couplings
                .iter()
                .filter_map(|coupling| {
                    Some(Internal {
                        source: index(coupling.source_id.as_str())?,
                        source_port: coupling.source_port.clone(),
                        target: index(coupling.target_id.as_str())?,
                        target_port: coupling.target_port.clone(),
                    })
                })
                .collect(),
        }
    }

    pub fn component_count(&self) -> usize {
        self.component_count
    }

    /// Routes the outputs of imminent components, given as `(component
    /// index, output bag)` pairs in construction order.  Returns one input
    /// bag per component (internal couplings) and the coordinator's own
    /// output bag (external output couplings).  Fan-in accumulates in
    /// component order, then port order, then value order, then coupling
    /// declaration order.
    pub fn route_outputs(&self, outputs: &[(usize, Bag)]) -> (Vec<Bag>, Bag) {
        let mut component_inputs = vec![Bag::new(); self.component_count];
        let mut external_outputs = Bag::new();
        outputs.iter().for_each(|(source, bag)| {
            bag.iter().for_each(|(port, values)| {
                values.iter().for_each(|value| {
                    self.internal
                        .iter()
                        .filter(|coupling| {
                            coupling.source == *source && coupling.source_port == *port
                        })
                        .for_each(|coupling| {
                            trace!(
                                "routing {:?} from component {}.{} to component {}.{}",
                                value,
                                source,
                                port,
                                coupling.target,
                                coupling.target_port
                            );
                            component_inputs[coupling.target]
                                .push(&coupling.target_port, value.clone());
                        });
                    self.external_output
                        .iter()
                        .filter(|coupling| {
                            coupling.source == *source && coupling.source_port == *port
                        })
                        .for_each(|coupling| {
                            trace!(
                                "routing {:?} from component {}.{} to output {}",
                                value,
                                source,
                                port,
                                coupling.target_port
                            );
                            external_outputs.push(&coupling.target_port, value.clone());
                        });
                })
            })
        });
        (component_inputs, external_outputs)
    }

    /// Routes a bag arriving on the coordinator's own input ports to the
    /// components, through the external input couplings.
    pub fn route_inputs(&self, inputs: &Bag) -> Vec<Bag> {
        let mut component_inputs = vec![Bag::new(); self.component_count];
        inputs.iter().for_each(|(port, values)| {
            values.iter().for_each(|value| {
                self.external_input
                    .iter()
                    .filter(|coupling| coupling.source_port == *port)
                    .for_each(|coupling| {
                        component_inputs[coupling.target]
                            .push(&coupling.target_port, value.clone());
                    });
            })
        });
        component_inputs
    }
}
