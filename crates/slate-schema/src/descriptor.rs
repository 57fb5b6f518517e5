//! Field declarations and their normalization into canonical descriptors.
//!
//! A [`FieldDecl`] is what a model definition writes down: declared type,
//! optional-ness, and the per-field metadata (default rule, nullability
//! override, primary key, length constraint). [`resolve`] normalizes a
//! declaration into a [`FieldDescriptor`], the immutable fact sheet the
//! decision engine and schema emission work from.

use slate_types::{FieldType, Value};

use crate::error::SchemaError;

/// The default rule attached to a field declaration.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DefaultRule {
    /// No default of any kind was declared.
    #[default]
    Unset,
    /// Explicitly declared required: no default, a value must be provided.
    ///
    /// This forces presence even when the declared type is optional, which
    /// would otherwise carry an implicit null default.
    Required,
    /// A concrete default value. An explicit null default is a real default
    /// and is distinct from declaring no default at all.
    Value(Value),
}

impl DefaultRule {
    /// True unless the rule is [`DefaultRule::Unset`].
    ///
    /// The required sentinel counts: it is an explicitly declared default
    /// *rule*, even though it forces presence rather than supplying a value.
    pub fn is_explicit(&self) -> bool {
        !matches!(self, Self::Unset)
    }
}

/// One field of a model definition, as written by the caller.
///
/// Declarations are built fluently and consumed by [`crate::ModelBuilder`]:
///
/// ```
/// use slate_schema::FieldDecl;
/// use slate_types::{FieldType, Value};
///
/// let key = FieldDecl::new("id", FieldType::Integer)
///     .optional()
///     .default(Value::Null)
///     .primary_key();
/// let name = FieldDecl::new("name", FieldType::Text).max_length(120);
/// ```
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub(crate) name: String,
    pub(crate) field_type: FieldType,
    pub(crate) optional: bool,
    pub(crate) max_length: Option<u32>,
    pub(crate) default: DefaultRule,
    pub(crate) nullable: Option<bool>,
    pub(crate) primary_key: bool,
}

impl FieldDecl {
    /// Declares a field of the given type. Without further qualification the
    /// field is non-optional with no default, i.e. it must be provided.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            optional: false,
            max_length: None,
            default: DefaultRule::Unset,
            nullable: None,
            primary_key: false,
        }
    }

    /// Marks the declared type as optional (the type-level "absent" marker).
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Attaches an explicit default value. `Value::Null` is a real default.
    pub fn default(mut self, value: Value) -> Self {
        self.default = DefaultRule::Value(value);
        self
    }

    /// Attaches the explicit required sentinel: no default, presence forced.
    pub fn required(mut self) -> Self {
        self.default = DefaultRule::Required;
        self
    }

    /// Overrides column nullability, independent of type and default. This
    /// wins over everything the engine would otherwise infer.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    /// Marks the field as (part of) the primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Constrains the maximum length of a text field; renders as
    /// `VARCHAR(n)` in the column type.
    pub fn max_length(mut self, n: u32) -> Self {
        self.max_length = Some(n);
        self
    }
}

/// The canonical, normalized form of one field declaration.
///
/// Immutable after creation; one descriptor is produced per declared field
/// at model-build time.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Field name (also the column name).
    pub name: String,
    /// Declared validation-layer type.
    pub field_type: FieldType,
    /// Whether the declared type carries the optional marker.
    pub is_optional: bool,
    /// Maximum length constraint for text fields.
    pub max_length: Option<u32>,
    /// Whether any default rule was declared (value or required sentinel).
    pub has_explicit_default: bool,
    /// The declared default rule.
    pub default: DefaultRule,
    /// Verbatim nullability override, if declared.
    pub nullable_override: Option<bool>,
    /// Whether the field is part of the primary key.
    pub is_primary_key: bool,
}

/// Normalizes a declaration into a [`FieldDescriptor`].
///
/// # Errors
///
/// Returns [`SchemaError::UnsupportedType`] when the declared type has no
/// storage mapping. This is checked here so a bad declaration fails the
/// moment the model is built, not on first use of the schema.
pub fn resolve(decl: FieldDecl) -> Result<FieldDescriptor, SchemaError> {
    if let FieldType::Custom(type_name) = decl.field_type {
        return Err(SchemaError::UnsupportedType {
            field: decl.name,
            type_name: type_name.to_string(),
        });
    }

    Ok(FieldDescriptor {
        name: decl.name,
        field_type: decl.field_type,
        is_optional: decl.optional,
        max_length: decl.max_length,
        has_explicit_default: decl.default.is_explicit(),
        default: decl.default,
        nullable_override: decl.nullable,
        is_primary_key: decl.primary_key,
    })
}
