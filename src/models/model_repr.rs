use serde::{Deserialize, Serialize};

/// The configuration representation of any model in a model tree: an ID, a
/// type name, and the type-specific fields.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelRepr {
    pub id: String,
    #[serde(rename = "type")]
    pub model_type: String,
    #[serde(flatten)]
    pub extra: serde_yaml::Value,
}
