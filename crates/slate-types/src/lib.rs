//! Shared type vocabulary for the Slate workspace.
//!
//! This crate provides the foundational types used across all Slate crates:
//! the declared field types a model can carry, the runtime [`Value`]
//! representation that flows between the validation and storage layers, and
//! the ordered [`Row`] shape both layers exchange.
//!
//! No crate in the workspace depends on anything *except* `slate-types` for
//! cross-cutting type definitions. This keeps the dependency graph clean and
//! prevents circular dependencies.

mod row;
mod value;

pub use row::Row;
pub use value::Value;

/// Declared type of a model field.
///
/// This is the *validation-layer* type of a field; the storage layer renders
/// it to a SQL column type during schema emission. `Custom` exists for
/// declared types that have no storage mapping — resolving a field of such a
/// type is a hard error at model-build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// 64-bit signed integer.
    Integer,
    /// 64-bit floating point.
    Float,
    /// Boolean.
    Boolean,
    /// UTF-8 text, optionally length-constrained at the column level.
    Text,
    /// A type with no built-in storage mapping, identified by name.
    Custom(&'static str),
}

impl FieldType {
    /// Returns the type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Text => "text",
            Self::Custom(name) => name,
        }
    }
}
