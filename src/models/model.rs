use serde::de;
use serde::ser::{self, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::coupled::Coupled;
use super::model_trait::AtomicModel;
use super::Port;

/// The two kinds of model in a model tree.  Coupled models exclusively own
/// their components, so the tree is finite and acyclic, and every leaf is
/// atomic.
#[derive(Clone)]
pub enum ModelKind {
    Atomic(Box<dyn AtomicModel>),
    Coupled(Coupled),
}

/// `Model` wraps a `ModelKind` and provides common ID functionality (a
/// struct field and associated accessor method).  The simulator requires all
/// models to have an ID, unique among siblings.
#[derive(Clone)]
pub struct Model {
    id: String,
    kind: ModelKind,
}

impl Model {
    pub fn new(id: String, kind: ModelKind) -> Self {
        Self { id, kind }
    }

    pub fn atomic(id: &str, inner: Box<dyn AtomicModel>) -> Self {
        Self::new(id.to_string(), ModelKind::Atomic(inner))
    }

    pub fn coupled(id: &str, coupled: Coupled) -> Self {
        Self::new(id.to_string(), ModelKind::Coupled(coupled))
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn kind(&self) -> &ModelKind {
        &self.kind
    }

    pub fn into_kind(self) -> ModelKind {
        self.kind
    }

    pub fn ports_in(&self) -> Vec<Port> {
        match &self.kind {
            ModelKind::Atomic(inner) => inner.ports_in(),
            ModelKind::Coupled(coupled) => coupled.ports_in().to_vec(),
        }
    }

    pub fn ports_out(&self) -> Vec<Port> {
        match &self.kind {
            ModelKind::Atomic(inner) => inner.ports_out(),
            ModelKind::Coupled(coupled) => coupled.ports_out().to_vec(),
        }
    }

    pub fn get_type(&self) -> &'static str {
        match &self.kind {
            ModelKind::Atomic(inner) => inner.get_type(),
            ModelKind::Coupled(_) => "Coupled",
        }
    }

    /// The number of atomic models in this subtree.
    pub fn atomic_count(&self) -> usize {
        match &self.kind {
            ModelKind::Atomic(_) => 1,
            ModelKind::Coupled(coupled) => coupled
                .components()
                .iter()
                .map(Model::atomic_count)
                .sum(),
        }
    }
}

impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra_fields: serde_yaml::Value = match &self.kind {
            ModelKind::Atomic(inner) => inner.serialize(),
            ModelKind::Coupled(coupled) => {
                serde_yaml::to_value(coupled).map_err(ser::Error::custom)?
            }
        };
        let mut model = serializer.serialize_map(None)?;
        model.serialize_entry("id", &self.id)?;
        model.serialize_entry("type", self.get_type())?;
        if let serde_yaml::Value::Mapping(map) = extra_fields {
            for (key, value) in map.iter() {
                model.serialize_entry(&key, &value)?;
            }
        }
        model.end()
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let model_repr = super::ModelRepr::deserialize(deserializer)?;
        let id = model_repr.id;
        let extra = model_repr.extra;
        let kind = if model_repr.model_type == "Coupled" {
            ModelKind::Coupled(Coupled::from_value(&id, extra).map_err(|err| {
                de::Error::custom(format!["coupled model `{}`: {}", id, err])
            })?)
        } else {
            ModelKind::Atomic(super::model_factory::create::<D>(
                &model_repr.model_type[..],
                extra,
            )?)
        };
        Ok(Model::new(id, kind))
    }
}
