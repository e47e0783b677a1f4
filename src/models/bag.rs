use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::port::Value;

/// A `Bag` holds the values present on each port of a model during one
/// simulation step.  Values on a port keep their arrival order; the bag
/// never reorders or deduplicates them.  Ports iterate in name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bag {
    values: BTreeMap<String, Vec<Value>>,
}

impl Bag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value to a port, after any values already on that port.
    pub fn push<V: Into<Value>>(&mut self, port: &str, value: V) {
        self.values
            .entry(port.to_string())
            .or_insert_with(Vec::new)
            .push(value.into());
    }

    /// Builder-style variant of `push`, for models producing small outputs.
    pub fn with<V: Into<Value>>(mut self, port: &str, value: V) -> Self {
        self.push(port, value);
        self
    }

    /// The values on a port, in arrival order.  Ports without values yield
    /// an empty slice.
    pub fn get(&self, port: &str) -> &[Value] {
        self.values.get(port).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(Vec::is_empty)
    }

    /// Total number of values across all ports.
    pub fn len(&self) -> usize {
        self.values.values().map(Vec::len).sum()
    }

    pub fn ports(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<Value>> {
        self.values.iter()
    }

    /// Moves every value of `other` after the values already in this bag,
    /// port by port.
    pub fn merge(&mut self, other: Bag) {
        other.values.into_iter().for_each(|(port, values)| {
            self.values
                .entry(port)
                .or_insert_with(Vec::new)
                .extend(values);
        });
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl<'a> IntoIterator for &'a Bag {
    type Item = (&'a String, &'a Vec<Value>);
    type IntoIter = btree_map::Iter<'a, String, Vec<Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
