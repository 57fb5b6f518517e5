//! Validation of untrusted JSON input against compiled field specs.
//!
//! [`validate`] walks a model's (or projection's) [`FieldSpec`] list and
//! turns a JSON object into a [`Row`] ready for storage:
//!
//! - missing required fields are errors; missing non-required fields take
//!   their explicit default, or null when none was declared,
//! - an explicit JSON null is a *value* and is accepted exactly when the
//!   declared type is optional — independent of whether the storage column
//!   admits NULL (a NOT NULL breach surfaces at write time, not here),
//! - scalar types are checked with bounded coercion (numeric strings parse,
//!   integral floats narrow to integers, nothing else converts),
//! - every failure is collected; the caller gets the full list at once.
//!
//! Unknown input keys are ignored. Validation never mutates its input and is
//! deterministic.

mod error;

pub use error::{FieldError, ValidationError};

use slate_schema::FieldSpec;
use slate_types::{FieldType, Row, Value};

/// Validates a JSON object against the given field specs, producing a row
/// with one entry per spec, in spec order.
///
/// # Errors
///
/// Returns [`ValidationError`] carrying every per-field failure.
pub fn validate(fields: &[FieldSpec], input: &serde_json::Value) -> Result<Row, ValidationError> {
    let Some(object) = input.as_object() else {
        return Err(ValidationError::new(vec![FieldError::new(
            "__root__",
            format!("expected an object, got {}", json_type_name(input)),
            "object_type",
        )]));
    };

    let mut row = Row::new();
    let mut errors = Vec::new();

    for field in fields {
        match object.get(&field.name) {
            None => {
                if field.required {
                    errors.push(FieldError::new(&field.name, "field required", "missing"));
                } else {
                    // Explicit default if declared, otherwise the implicit
                    // null every non-required field falls back to.
                    row.push(&field.name, field.default.clone().unwrap_or(Value::Null));
                }
            }
            Some(serde_json::Value::Null) => {
                if field.accepts_null {
                    row.push(&field.name, Value::Null);
                } else {
                    errors.push(FieldError::new(
                        &field.name,
                        "none is not an allowed value",
                        "none_not_allowed",
                    ));
                }
            }
            Some(value) => match coerce(field, value) {
                Ok(coerced) => row.push(&field.name, coerced),
                Err(e) => errors.push(e),
            },
        }
    }

    if errors.is_empty() {
        Ok(row)
    } else {
        Err(ValidationError::new(errors))
    }
}

/// Type-directed conversion of one non-null JSON value.
fn coerce(field: &FieldSpec, value: &serde_json::Value) -> Result<Value, FieldError> {
    match field.field_type {
        FieldType::Integer => coerce_integer(field, value),
        FieldType::Float => coerce_float(field, value),
        FieldType::Boolean => value.as_bool().map(Value::Boolean).ok_or_else(|| {
            type_error(field, value, "value is not a valid boolean", "bool_type")
        }),
        FieldType::Text => coerce_text(field, value),
        FieldType::Custom(type_name) => Err(FieldError::new(
            &field.name,
            format!("no validator for type '{type_name}'"),
            "unsupported_type",
        )),
    }
}

fn coerce_integer(field: &FieldSpec, value: &serde_json::Value) -> Result<Value, FieldError> {
    if let Some(n) = value.as_i64() {
        return Ok(Value::Integer(n));
    }
    if let Some(f) = value.as_f64() {
        // Integral floats narrow losslessly; anything else is a type error.
        if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
            return Ok(Value::Integer(f as i64));
        }
    }
    if let Some(s) = value.as_str() {
        if let Ok(n) = s.trim().parse::<i64>() {
            return Ok(Value::Integer(n));
        }
    }
    Err(type_error(field, value, "value is not a valid integer", "integer_type"))
}

fn coerce_float(field: &FieldSpec, value: &serde_json::Value) -> Result<Value, FieldError> {
    if let Some(f) = value.as_f64() {
        return Ok(Value::Float(f));
    }
    if let Some(s) = value.as_str() {
        if let Ok(f) = s.trim().parse::<f64>() {
            return Ok(Value::Float(f));
        }
    }
    Err(type_error(field, value, "value is not a valid float", "float_type"))
}

fn coerce_text(field: &FieldSpec, value: &serde_json::Value) -> Result<Value, FieldError> {
    let Some(s) = value.as_str() else {
        return Err(type_error(field, value, "value is not a valid string", "string_type"));
    };
    if let Some(max) = field.max_length {
        let len = s.chars().count();
        if len > max as usize {
            return Err(FieldError::new(
                &field.name,
                format!("string of length {len} exceeds maximum length {max}"),
                "string_too_long",
            ));
        }
    }
    Ok(Value::Text(s.to_string()))
}

fn type_error(
    field: &FieldSpec,
    value: &serde_json::Value,
    message: &str,
    kind: &'static str,
) -> FieldError {
    FieldError::new(
        &field.name,
        format!("{message} (got {})", json_type_name(value)),
        kind,
    )
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
