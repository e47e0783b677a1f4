//! Atomic model registry, for building model trees from YAML/JSON
//! configuration.  Types are registered by name, typically through the
//! `pdevs_derive::register!` macro on a `#[derive(SerializableModel)]` type.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use lazy_static::lazy_static;
use serde::de;
use serde::Deserializer;

use super::model_trait::AtomicModel;
use crate::utils::errors::ConstructionError;

pub type ModelConstructor = fn(serde_yaml::Value) -> Option<Box<dyn AtomicModel>>;

lazy_static! {
    static ref CONSTRUCTORS: Mutex<HashMap<&'static str, ModelConstructor>> =
        Mutex::new(HashMap::new());
}

fn constructors() -> MutexGuard<'static, HashMap<&'static str, ModelConstructor>> {
    // The map holds plain function pointers, so a poisoned lock is still usable
    CONSTRUCTORS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn register(model_type: &'static str, model_constructor: ModelConstructor) {
    constructors().insert(model_type, model_constructor);
}

pub fn is_registered(model_type: &str) -> bool {
    constructors().contains_key(model_type)
}

/// Registered type names, sorted.
pub fn variants() -> Vec<&'static str> {
    let mut variants: Vec<&'static str> = constructors().keys().copied().collect();
    variants.sort_unstable();
    variants
}

pub fn create<'de, D: Deserializer<'de>>(
    model_type: &str,
    extra_fields: serde_yaml::Value,
) -> Result<Box<dyn AtomicModel>, D::Error> {
    let constructor = constructors().get(model_type).copied();
    match constructor {
        Some(constructor) => constructor(extra_fields).ok_or_else(|| {
            de::Error::custom(format![
                "invalid configuration for model type `{}`",
                model_type
            ])
        }),
        None => Err(de::Error::custom(format![
            "{}, expected one of: {}",
            ConstructionError::UnknownModelType(model_type.to_string()),
            variants().join(", ")
        ])),
    }
}
