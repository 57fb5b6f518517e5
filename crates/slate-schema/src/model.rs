//! Compiled models and their projections.
//!
//! A model is defined once, through [`ModelBuilder`], and compiled into the
//! pair every consumer works from: a [`TableSchema`] for storage and a
//! [`FieldSpec`] list for validation. Variants of a model (create-request
//! shape, read shape) are not separate definitions — they are projections of
//! the one canonical field set.

use crate::decide::is_auto_generated;
use crate::descriptor::{resolve, FieldDecl, FieldDescriptor};
use crate::emit::{emit, ColumnSpec, FieldSpec, TableSchema};
use crate::error::SchemaError;

/// A compiled model: one table's storage schema plus its validation fields.
#[derive(Debug, Clone)]
pub struct Model {
    schema: TableSchema,
    fields: Vec<FieldSpec>,
    auto_key: Option<String>,
}

/// Fluent definition of a model, evaluated once by [`ModelBuilder::build`].
#[derive(Debug)]
pub struct ModelBuilder {
    table: String,
    decls: Vec<FieldDecl>,
}

impl Model {
    /// Starts a model definition for the given table.
    pub fn builder(table: impl Into<String>) -> ModelBuilder {
        ModelBuilder {
            table: table.into(),
            decls: Vec::new(),
        }
    }

    /// The table name.
    pub fn table_name(&self) -> &str {
        self.schema.name()
    }

    /// The compiled storage schema.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// The compiled validation fields, in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Looks up one validation field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Looks up one storage column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.schema.column(name)
    }

    /// Name of the auto-generated integer key column, if the model has one.
    ///
    /// The storage layer omits this column from inserts when its value is
    /// null, letting the backend assign it.
    pub fn auto_key(&self) -> Option<&str> {
        self.auto_key.as_deref()
    }

    /// An explicit subset view of the validation fields, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownField`] if a name is not declared on
    /// this model.
    pub fn projection(&self, names: &[&str]) -> Result<Vec<FieldSpec>, SchemaError> {
        names
            .iter()
            .map(|name| {
                self.field(name).cloned().ok_or_else(|| SchemaError::UnknownField {
                    table: self.table_name().to_string(),
                    field: name.to_string(),
                })
            })
            .collect()
    }

    /// The create-request view: every field except the auto-generated key.
    pub fn input_projection(&self) -> Vec<FieldSpec> {
        self.fields
            .iter()
            .filter(|f| self.auto_key.as_deref() != Some(f.name.as_str()))
            .cloned()
            .collect()
    }
}

impl ModelBuilder {
    /// Adds one field declaration. Declaration order is column order.
    pub fn field(mut self, decl: FieldDecl) -> Self {
        self.decls.push(decl);
        self
    }

    /// Resolves, decides, and emits the model.
    ///
    /// # Errors
    ///
    /// Fails fast on the first unsupported type, duplicate field name, or an
    /// empty definition. A successfully built model cannot fail later.
    pub fn build(self) -> Result<Model, SchemaError> {
        if self.decls.is_empty() {
            return Err(SchemaError::NoFields(self.table));
        }

        let mut descriptors: Vec<FieldDescriptor> = Vec::with_capacity(self.decls.len());
        for decl in self.decls {
            let desc = resolve(decl)?;
            if descriptors.iter().any(|d| d.name == desc.name) {
                return Err(SchemaError::DuplicateField {
                    table: self.table,
                    field: desc.name,
                });
            }
            descriptors.push(desc);
        }

        let auto_key = single_auto_key(&descriptors);
        let (schema, fields) = emit(&self.table, &descriptors)?;

        tracing::debug!(
            table = schema.name(),
            columns = schema.columns().len(),
            "compiled model"
        );

        Ok(Model {
            schema,
            fields,
            auto_key,
        })
    }
}

/// The auto-generation convention applies only to a *single* integer key;
/// composite keys are never backend-assigned.
fn single_auto_key(descriptors: &[FieldDescriptor]) -> Option<String> {
    let mut keys = descriptors.iter().filter(|d| d.is_primary_key);
    match (keys.next(), keys.next()) {
        (Some(only), None) if is_auto_generated(only) => Some(only.name.clone()),
        _ => None,
    }
}
