//! Row storage over compiled models.
//!
//! These free functions bind a [`Row`] to SQL in column (declaration) order,
//! and decode query results back into rows using the declared field types,
//! so a value survives the write/read cycle unchanged.

use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use slate_schema::{FieldSpec, Model};
use slate_types::{FieldType, Row, Value};

use crate::error::DbError;

/// Inserts a row, returning the stored key (the backend rowid).
///
/// Values are bound in declaration order; fields absent from the row are
/// written as NULL. An auto-generated key whose value is null is omitted from
/// the statement entirely so the backend assigns it — the column itself stays
/// NOT NULL.
///
/// # Errors
///
/// Constraint breaches (NULL into a NOT NULL column, duplicate key) surface
/// as [`DbError::IntegrityViolation`]; anything else as [`DbError::Database`].
pub fn insert(conn: &Connection, model: &Model, row: &Row) -> Result<i64, DbError> {
    let mut columns: Vec<&str> = Vec::with_capacity(model.fields().len());
    let mut values: Vec<rusqlite::types::Value> = Vec::with_capacity(model.fields().len());

    for field in model.fields() {
        let value = row.get(&field.name).cloned().unwrap_or(Value::Null);
        if value.is_null() && model.auto_key() == Some(field.name.as_str()) {
            continue;
        }
        columns.push(field.name.as_str());
        values.push(bind_value(value));
    }

    let sql = if columns.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES", model.table_name())
    } else {
        let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{i}")).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            model.table_name(),
            columns.join(", "),
            placeholders.join(", ")
        )
    };

    conn.execute(&sql, params_from_iter(values))
        .map_err(|e| DbError::from_write(model.table_name(), e))?;

    Ok(conn.last_insert_rowid())
}

/// Fetches one row by primary-key value.
///
/// # Errors
///
/// Returns [`DbError::NoPrimaryKey`] for models without a single-column key.
pub fn get(conn: &Connection, model: &Model, key: &Value) -> Result<Option<Row>, DbError> {
    let key_columns = model.schema().primary_key();
    let [key_column] = key_columns.as_slice() else {
        return Err(DbError::NoPrimaryKey(model.table_name().to_string()));
    };

    let sql = format!(
        "SELECT {} FROM {} WHERE {} = ?1",
        select_list(model),
        model.table_name(),
        key_column
    );

    let row = conn
        .query_row(&sql, [bind_value(key.clone())], |r| decode_row(model.fields(), r))
        .optional()?;
    Ok(row)
}

/// Lists rows in insertion (rowid) order, `limit` rows starting at `offset`.
pub fn list(conn: &Connection, model: &Model, offset: u32, limit: u32) -> Result<Vec<Row>, DbError> {
    let sql = format!(
        "SELECT {} FROM {} ORDER BY rowid LIMIT ?1 OFFSET ?2",
        select_list(model),
        model.table_name()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([i64::from(limit), i64::from(offset)], |r| {
        decode_row(model.fields(), r)
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn select_list(model: &Model) -> String {
    model
        .fields()
        .iter()
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Converts a [`Value`] into the owned form rusqlite binds. Booleans are
/// stored as integers, SQLite's native representation.
fn bind_value(value: Value) -> rusqlite::types::Value {
    match value {
        Value::Null => rusqlite::types::Value::Null,
        Value::Integer(n) => rusqlite::types::Value::Integer(n),
        Value::Float(f) => rusqlite::types::Value::Real(f),
        Value::Boolean(b) => rusqlite::types::Value::Integer(i64::from(b)),
        Value::Text(s) => rusqlite::types::Value::Text(s),
    }
}

fn decode_row(fields: &[FieldSpec], r: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
    let mut row = Row::new();
    for (idx, field) in fields.iter().enumerate() {
        row.push(&field.name, decode_column(idx, field, r.get_ref(idx)?)?);
    }
    Ok(row)
}

/// Decodes one stored value using the declared field type, so integers come
/// back as booleans for boolean fields and as floats for float fields.
fn decode_column(idx: usize, field: &FieldSpec, raw: ValueRef<'_>) -> rusqlite::Result<Value> {
    match raw {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(n) => Ok(match field.field_type {
            FieldType::Boolean => Value::Boolean(n != 0),
            FieldType::Float => Value::Float(n as f64),
            _ => Value::Integer(n),
        }),
        ValueRef::Real(f) => Ok(Value::Float(f)),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|s| Value::Text(s.to_string()))
            .map_err(rusqlite::Error::Utf8Error),
        ValueRef::Blob(_) => Err(rusqlite::Error::InvalidColumnType(
            idx,
            field.name.clone(),
            rusqlite::types::Type::Blob,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ddl::create_all;
    use slate_schema::{FieldDecl, SchemaRegistry};

    fn track_model() -> Model {
        Model::builder("track")
            .field(
                FieldDecl::new("id", FieldType::Integer)
                    .optional()
                    .default(Value::Null)
                    .primary_key(),
            )
            .field(FieldDecl::new("title", FieldType::Text))
            .field(FieldDecl::new("artist", FieldType::Text).optional())
            .field(FieldDecl::new("rating", FieldType::Float).optional())
            .field(FieldDecl::new("explicit", FieldType::Boolean).default(Value::from(false)))
            .build()
            .unwrap()
    }

    fn setup() -> (Connection, Model) {
        let conn = Connection::open_in_memory().unwrap();
        let model = track_model();
        let mut registry = SchemaRegistry::new();
        registry.register(model.clone()).unwrap();
        create_all(&conn, &registry).unwrap();
        (conn, model)
    }

    fn sample_row(title: &str) -> Row {
        let mut row = Row::new();
        row.push("id", Value::Null);
        row.push("title", Value::from(title));
        row.push("artist", Value::from("someone"));
        row.push("rating", Value::from(4.5));
        row.push("explicit", Value::from(true));
        row
    }

    #[test]
    fn insert_assigns_auto_key() {
        let (conn, model) = setup();
        let first = insert(&conn, &model, &sample_row("one")).unwrap();
        let second = insert(&conn, &model, &sample_row("two")).unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[test]
    fn round_trip_preserves_values_and_types() {
        let (conn, model) = setup();
        let key = insert(&conn, &model, &sample_row("one")).unwrap();

        let stored = get(&conn, &model, &Value::Integer(key)).unwrap().unwrap();
        assert_eq!(stored.get("id"), Some(&Value::Integer(key)));
        assert_eq!(stored.get("title"), Some(&Value::from("one")));
        assert_eq!(stored.get("artist"), Some(&Value::from("someone")));
        assert_eq!(stored.get("rating"), Some(&Value::Float(4.5)));
        assert_eq!(stored.get("explicit"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn get_missing_key_is_none() {
        let (conn, model) = setup();
        assert_eq!(get(&conn, &model, &Value::Integer(99)).unwrap(), None);
    }

    #[test]
    fn null_into_not_null_column_is_an_integrity_violation() {
        let (conn, model) = setup();
        let mut row = sample_row("one");
        row.set("title", Value::Null);

        let err = insert(&conn, &model, &row).unwrap_err();
        match err {
            DbError::IntegrityViolation { table, message } => {
                assert_eq!(table, "track");
                assert!(message.contains("NOT NULL"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn absent_fields_are_written_as_null() {
        let (conn, model) = setup();
        let mut row = Row::new();
        row.push("title", Value::from("bare"));

        let key = insert(&conn, &model, &row).unwrap();
        let stored = get(&conn, &model, &Value::Integer(key)).unwrap().unwrap();
        assert_eq!(stored.get("artist"), Some(&Value::Null));
        // `explicit` was absent too: the default is the validator's concern,
        // not the store's.
        assert_eq!(stored.get("explicit"), Some(&Value::Null));
    }

    #[test]
    fn list_returns_insertion_order_window() {
        let (conn, model) = setup();
        for title in ["a", "b", "c", "d", "e"] {
            insert(&conn, &model, &sample_row(title)).unwrap();
        }

        let window = list(&conn, &model, 1, 2).unwrap();
        let titles: Vec<_> = window
            .iter()
            .map(|r| r.get("title").cloned().unwrap())
            .collect();
        assert_eq!(titles, vec![Value::from("b"), Value::from("c")]);

        // Offset past the tail clamps to what is left.
        let tail = list(&conn, &model, 4, 10).unwrap();
        assert_eq!(tail.len(), 1);
        let past = list(&conn, &model, 10, 10).unwrap();
        assert!(past.is_empty());
    }

    #[test]
    fn keyless_model_refuses_keyed_lookup() {
        let conn = Connection::open_in_memory().unwrap();
        let model = Model::builder("note")
            .field(FieldDecl::new("body", FieldType::Text))
            .build()
            .unwrap();
        let mut registry = SchemaRegistry::new();
        registry.register(model.clone()).unwrap();
        create_all(&conn, &registry).unwrap();

        let err = get(&conn, &model, &Value::Integer(1)).unwrap_err();
        assert!(matches!(err, DbError::NoPrimaryKey(_)));
    }
}
