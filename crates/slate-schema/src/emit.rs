//! Schema emission: descriptors to column and field specs.
//!
//! Emission is deterministic and order-preserving — column order equals
//! declaration order — and has no side effects. Registering the result is a
//! separate, explicit step performed by the caller.

use slate_types::{FieldType, Value};

use crate::decide::decide;
use crate::descriptor::FieldDescriptor;
use crate::error::SchemaError;

/// One column of the storage schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    /// Column name (same as the field name).
    pub name: String,
    /// Rendered SQL type, e.g. `INTEGER` or `VARCHAR(512)`.
    pub sql_type: String,
    /// Whether the column admits NULL.
    pub nullable: bool,
    /// Whether the column is part of the primary key.
    pub primary_key: bool,
}

/// One field of the validation schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Field name.
    pub name: String,
    /// Declared type, used for input coercion and storage decode.
    pub field_type: FieldType,
    /// Whether null is an acceptable *value* (the declared type is optional).
    pub accepts_null: bool,
    /// Whether a value must be provided at validation time.
    pub required: bool,
    /// Explicit default, if one was declared. Non-required fields without an
    /// explicit default fall back to null when input omits them.
    pub default: Option<Value>,
    /// Maximum length for text fields, enforced at validation time.
    pub max_length: Option<u32>,
}

/// The compiled storage schema of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    table: String,
    columns: Vec<ColumnSpec>,
}

impl TableSchema {
    /// The table name.
    pub fn name(&self) -> &str {
        &self.table
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of the primary-key columns, in declaration order.
    pub fn primary_key(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Renders the `CREATE TABLE` statement for this schema.
    ///
    /// The exact text is part of the storage contract: one tab-indented part
    /// per column (`name TYPE[ NOT NULL]`), parts joined by `, \n\t`, and a
    /// trailing `PRIMARY KEY (...)` table constraint when keys are declared.
    pub fn create_table_sql(&self) -> String {
        let mut parts: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                let mut part = format!("{} {}", c.name, c.sql_type);
                if !c.nullable {
                    part.push_str(" NOT NULL");
                }
                part
            })
            .collect();

        let keys = self.primary_key();
        if !keys.is_empty() {
            parts.push(format!("PRIMARY KEY ({})", keys.join(", ")));
        }

        format!("CREATE TABLE {} (\n\t{}\n)", self.table, parts.join(", \n\t"))
    }
}

/// Renders the SQL type for a descriptor.
///
/// Kept fallible even though [`crate::descriptor::resolve`] already rejects
/// unmapped types: emission must never panic on a descriptor constructed by
/// other means.
fn sql_type(desc: &FieldDescriptor) -> Result<String, SchemaError> {
    match desc.field_type {
        FieldType::Integer => Ok("INTEGER".to_string()),
        FieldType::Float => Ok("FLOAT".to_string()),
        FieldType::Boolean => Ok("BOOLEAN".to_string()),
        FieldType::Text => Ok(match desc.max_length {
            Some(n) => format!("VARCHAR({n})"),
            None => "VARCHAR".to_string(),
        }),
        FieldType::Custom(type_name) => Err(SchemaError::UnsupportedType {
            field: desc.name.clone(),
            type_name: type_name.to_string(),
        }),
    }
}

/// Materializes the storage and validation schemas for one table.
///
/// # Errors
///
/// Returns [`SchemaError::UnsupportedType`] if any descriptor's type cannot
/// be rendered to a column type.
pub fn emit(
    table: &str,
    descriptors: &[FieldDescriptor],
) -> Result<(TableSchema, Vec<FieldSpec>), SchemaError> {
    let mut columns = Vec::with_capacity(descriptors.len());
    let mut fields = Vec::with_capacity(descriptors.len());

    for desc in descriptors {
        let decision = decide(desc);
        columns.push(ColumnSpec {
            name: desc.name.clone(),
            sql_type: sql_type(desc)?,
            nullable: decision.column_nullable,
            primary_key: desc.is_primary_key,
        });
        fields.push(FieldSpec {
            name: desc.name.clone(),
            field_type: desc.field_type,
            accepts_null: desc.is_optional,
            required: decision.field_required,
            default: decision.field_default,
            max_length: desc.max_length,
        });
    }

    let schema = TableSchema {
        table: table.to_string(),
        columns,
    };
    Ok((schema, fields))
}
