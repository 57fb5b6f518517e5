//! Idempotent schema materialization.

use rusqlite::Connection;
use slate_schema::SchemaRegistry;

use crate::error::DbError;

/// Creates every registered table that does not yet exist in the backend.
///
/// Tables are created in registration order, each from the exact DDL the
/// schema layer renders. Running this twice is safe: existing tables are
/// skipped, never altered, so the second run is a no-op.
///
/// Returns the number of tables created.
///
/// # Errors
///
/// Returns [`DbError`] if the existence check or a `CREATE TABLE` fails.
pub fn create_all(conn: &Connection, registry: &SchemaRegistry) -> Result<usize, DbError> {
    let mut created = 0;

    for model in registry.models() {
        if table_exists(conn, model.table_name())? {
            tracing::debug!(table = model.table_name(), "table already exists, skipping");
            continue;
        }

        let sql = model.schema().create_table_sql();
        tracing::info!(table = model.table_name(), "creating table");
        tracing::debug!(ddl = %sql, "executing ddl");
        conn.execute_batch(&sql)?;
        created += 1;
    }

    Ok(created)
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool, rusqlite::Error> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [table],
        |row| row.get(0),
    )
}
