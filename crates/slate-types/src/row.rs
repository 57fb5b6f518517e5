//! The row-shaped object exchanged between validation and storage.

use crate::Value;

/// An ordered sequence of named values.
///
/// Rows preserve field declaration order so that storage binds parameters in
/// column order and JSON output is deterministic. Lookups are linear — rows
/// are small (one per model instance), so a map would buy nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    entries: Vec<(String, Value)>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a named value. Order of insertion is preserved.
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.entries.push((name.into(), value));
    }

    /// Returns the value for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Replaces the value for `name`, appending if absent.
    pub fn set(&mut self, name: &str, value: Value) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    /// Number of entries in the row.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the row has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Converts the row into a JSON object, preserving entry order.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::with_capacity(self.entries.len());
        for (name, value) in &self.entries {
            map.insert(name.clone(), value.to_json());
        }
        serde_json::Value::Object(map)
    }
}
