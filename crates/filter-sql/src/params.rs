//! Named parameter bindings produced during one compilation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Parameter name to bound value, referenced from SQL as `:name`.
///
/// A single instance must be used by one compilation at a time; names are
/// only unique within the map they were allocated from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bindings(BTreeMap<String, Value>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the first free `{base}_{n}` name, counting from 1.
    ///
    /// The name is not reserved until a value is inserted under it.
    pub fn next_name(&self, base: &str) -> String {
        let mut index = 1;
        loop {
            let name = format!("{base}_{index}");
            if !self.0.contains_key(&name) {
                return name;
            }
            index += 1;
        }
    }

    /// Allocates the next free name for `base`, binds `value` to it and
    /// returns the name.
    pub fn bind(&mut self, base: &str, value: Value) -> String {
        let name = self.next_name(base);
        self.0.insert(name.clone(), value);
        name
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Base parameter name for a JSON path: `property` when the path has no
/// nested parts, otherwise `property_part1_part2...`.
pub fn json_base_name(property: &str, nested: &[&str]) -> String {
    if nested.is_empty() {
        property.to_string()
    } else {
        format!("{}_{}", property, nested.join("_"))
    }
}
