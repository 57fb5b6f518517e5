//! Error types for model definition and registration.

use thiserror::Error;

/// Errors raised while building or registering a model.
///
/// All of these surface at model-build time (the moment a definition is
/// evaluated), never later: a model that builds successfully cannot fail
/// schema emission afterwards.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A declared field type has no storage mapping.
    #[error("field '{field}' has type '{type_name}' with no storage mapping")]
    UnsupportedType {
        /// Name of the offending field.
        field: String,
        /// Name of the unmapped declared type.
        type_name: String,
    },

    /// The same field name was declared twice on one model.
    #[error("duplicate field '{field}' in table '{table}'")]
    DuplicateField {
        /// Table being defined.
        table: String,
        /// The repeated field name.
        field: String,
    },

    /// A model was built with no fields at all.
    #[error("model for table '{0}' declares no fields")]
    NoFields(String),

    /// A table name was registered twice without clearing the registry.
    #[error("table '{0}' is already registered")]
    DuplicateTable(String),

    /// A projection referenced a field the model does not declare.
    #[error("unknown field '{field}' in projection of table '{table}'")]
    UnknownField {
        /// Table the projection was taken from.
        table: String,
        /// The unknown field name.
        field: String,
    },
}
