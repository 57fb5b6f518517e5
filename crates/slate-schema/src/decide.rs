//! The nullability and required-ness decision engine.
//!
//! Column nullability and validation required-ness come from two different
//! rule systems with different defaults. [`decide`] reconciles them for one
//! field:
//!
//! - Column side: an explicit `nullable` override wins outright; otherwise a
//!   column is nullable iff the declared type is optional and the field is
//!   not a primary key.
//! - Field side: required-ness is governed purely by defaulting. A field is
//!   non-required when it has an explicit default value (explicit null
//!   included), when it is an auto-generated integer key, or when the
//!   declared type is optional with no default rule at all (optional types
//!   carry an implicit null default at the validation layer). The required
//!   sentinel forces presence.
//!
//! The two sides are evaluated independently. That permits the deliberately
//! divergent corner case: optional type + `nullable(false)` + no default
//! yields a `NOT NULL` column *and* a non-required field with no recorded
//! default — validation will accept a null value there, and the storage
//! backend rejects it at write time.

use slate_types::{FieldType, Value};

use crate::descriptor::{DefaultRule, FieldDescriptor};

/// Outcome of the decision for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Whether the storage column admits NULL.
    pub column_nullable: bool,
    /// Whether the validation layer demands a value.
    pub field_required: bool,
    /// The explicit default recorded for the validation layer, if any.
    /// Implicit defaults (optional types, auto-generated keys) stay unset.
    pub field_default: Option<Value>,
}

/// True when the auto-generation convention applies: a single-column integer
/// primary key is assigned by the storage backend if no value is supplied.
pub(crate) fn is_auto_generated(desc: &FieldDescriptor) -> bool {
    desc.is_primary_key && desc.field_type == FieldType::Integer
}

/// Resolves column nullability and field required-ness for one descriptor.
pub fn decide(desc: &FieldDescriptor) -> Decision {
    let column_nullable = match desc.nullable_override {
        Some(explicit) => explicit,
        None => desc.is_optional && !desc.is_primary_key,
    };

    let (field_required, field_default) = match &desc.default {
        DefaultRule::Value(value) => (false, Some(value.clone())),
        DefaultRule::Required => (true, None),
        DefaultRule::Unset => {
            let required = !desc.is_optional && !is_auto_generated(desc);
            (required, None)
        }
    };

    Decision {
        column_nullable,
        field_required,
        field_default,
    }
}
