//! End-to-end coverage of the pipeline: model definition → validation →
//! storage → read-back, against a pooled on-disk database.

use serde_json::json;
use slate_db::{create_all, insert, open, DbError, DbSettings};
use slate_schema::{FieldDecl, Model, SchemaRegistry};
use slate_types::{FieldType, Value};
use slate_validate::validate;

fn catalog_model() -> Model {
    Model::builder("item")
        .field(
            FieldDecl::new("id", FieldType::Integer)
                .optional()
                .default(Value::Null)
                .primary_key(),
        )
        .field(FieldDecl::new("name", FieldType::Text).max_length(120))
        .field(FieldDecl::new("description", FieldType::Text).optional())
        .field(FieldDecl::new("quantity", FieldType::Integer).default(Value::from(0)))
        .build()
        .unwrap()
}

fn registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry.register(catalog_model()).unwrap();
    registry
}

#[test]
fn create_all_is_idempotent_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("catalog.db");
    let pool = open(db_path.to_str().unwrap(), DbSettings::default()).unwrap();
    let registry = registry();

    let conn = pool.get().unwrap();
    assert_eq!(create_all(&conn, &registry).unwrap(), 1);
    assert_eq!(create_all(&conn, &registry).unwrap(), 0);

    // A second connection from the pool sees the same single table.
    let conn2 = pool.get().unwrap();
    assert_eq!(create_all(&conn2, &registry).unwrap(), 0);
}

#[test]
fn validated_input_round_trips_through_storage() {
    let pool = open(":memory:", DbSettings::default()).unwrap();
    let registry = registry();
    let model = registry.get("item").unwrap();

    let conn = pool.get().unwrap();
    create_all(&conn, &registry).unwrap();

    let row = validate(
        model.fields(),
        &json!({"name": "anvil", "description": "heavy", "quantity": 3}),
    )
    .unwrap();
    let key = insert(&conn, model, &row).unwrap();

    let stored = slate_db::get(&conn, model, &Value::Integer(key))
        .unwrap()
        .expect("stored row should be readable");

    // Equal for all declared fields, modulo the assigned key.
    for field in model.fields() {
        if Some(field.name.as_str()) == model.auto_key() {
            continue;
        }
        assert_eq!(stored.get(&field.name), row.get(&field.name), "{}", field.name);
    }
    assert_eq!(stored.get("id"), Some(&Value::Integer(key)));
}

#[test]
fn defaults_apply_before_storage() {
    let pool = open(":memory:", DbSettings::default()).unwrap();
    let registry = registry();
    let model = registry.get("item").unwrap();

    let conn = pool.get().unwrap();
    create_all(&conn, &registry).unwrap();

    let row = validate(model.fields(), &json!({"name": "bolt"})).unwrap();
    let key = insert(&conn, model, &row).unwrap();

    let stored = slate_db::get(&conn, model, &Value::Integer(key)).unwrap().unwrap();
    assert_eq!(stored.get("quantity"), Some(&Value::Integer(0)));
    assert_eq!(stored.get("description"), Some(&Value::Null));
}

#[test]
fn non_nullable_optional_field_fails_at_commit_not_validation() {
    // The regression-sensitive divergence, end to end: the DDL says NOT
    // NULL, validation accepts an explicit null, and the write is where it
    // breaks.
    let model = Model::builder("move")
        .field(
            FieldDecl::new("id", FieldType::Integer)
                .optional()
                .default(Value::Null)
                .primary_key(),
        )
        .field(
            FieldDecl::new("target", FieldType::Text)
                .optional()
                .nullable(false),
        )
        .build()
        .unwrap();

    let sql = model.schema().create_table_sql();
    assert!(sql.contains("id INTEGER NOT NULL, "), "{sql}");
    assert!(sql.contains("target VARCHAR NOT NULL, "), "{sql}");

    let mut registry = SchemaRegistry::new();
    registry.register(model.clone()).unwrap();

    let pool = open(":memory:", DbSettings::default()).unwrap();
    let conn = pool.get().unwrap();
    create_all(&conn, &registry).unwrap();

    // Validation succeeds with target explicitly null.
    let row = validate(model.fields(), &json!({"id": 123, "target": null})).unwrap();
    assert_eq!(row.get("target"), Some(&Value::Null));

    // The commit is what fails.
    let err = insert(&conn, &model, &row).unwrap_err();
    assert!(
        matches!(err, DbError::IntegrityViolation { .. }),
        "unexpected error: {err:?}"
    );
}

#[test]
fn list_window_is_exact() {
    let pool = open(":memory:", DbSettings::default()).unwrap();
    let registry = registry();
    let model = registry.get("item").unwrap();

    let conn = pool.get().unwrap();
    create_all(&conn, &registry).unwrap();

    let total = 7u32;
    for i in 0..total {
        let row = validate(model.fields(), &json!({"name": format!("item-{i}")})).unwrap();
        insert(&conn, model, &row).unwrap();
    }

    // min(limit, total - offset) rows, in insertion order.
    for (offset, limit, expect) in [(0, 3, 3), (5, 5, 2), (7, 3, 0), (2, 100, 5)] {
        let rows = slate_db::list(&conn, model, offset, limit).unwrap();
        assert_eq!(rows.len(), expect, "offset={offset} limit={limit}");
        if let Some(first) = rows.first() {
            assert_eq!(
                first.get("name"),
                Some(&Value::from(format!("item-{offset}"))),
            );
        }
    }
}
