//! The model registry.
//!
//! The registry is an explicit context object owned by the caller: construct
//! it at startup, register every model once, then share it read-only with
//! whatever consumes the compiled schemas. There is no process-global
//! registry; lifecycle stays with the application.

use crate::error::SchemaError;
use crate::model::Model;

/// Registry of compiled models, in registration order.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    models: Vec<Model>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a compiled model.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateTable`] if the table name is already
    /// registered. Re-registering a name is only expected in test-reset
    /// scenarios, after [`SchemaRegistry::clear`].
    pub fn register(&mut self, model: Model) -> Result<(), SchemaError> {
        if self.get(model.table_name()).is_some() {
            return Err(SchemaError::DuplicateTable(model.table_name().to_string()));
        }
        tracing::debug!(table = model.table_name(), "registered model");
        self.models.push(model);
        Ok(())
    }

    /// Looks up a model by table name.
    pub fn get(&self, table: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.table_name() == table)
    }

    /// Iterates models in registration order.
    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.iter()
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Wipes the registry. Exists to isolate test cases that share a
    /// process; production code has no reason to call it.
    pub fn clear(&mut self) {
        self.models.clear();
    }
}
