//! Storage layer for the Slate workspace.
//!
//! Provides pooled SQLite access, registry-driven schema materialization,
//! and typed row storage over compiled models.
//!
//! # Design decisions
//!
//! - **SQLite**: a real backend with real constraint enforcement — NOT NULL
//!   breaches are detected by the engine at write time and surfaced as
//!   [`DbError::IntegrityViolation`], which is exactly the contract the
//!   schema layer defers to.
//! - **DDL comes from the registry**: `create_all` executes the byte-exact
//!   `CREATE TABLE` text the schema layer renders, so what is logged, what
//!   is tested, and what runs are the same string.
//! - **Type-directed decode**: SQLite stores booleans as integers; reading a
//!   row back consults the declared field types so values round-trip.

mod ddl;
mod error;
mod store;

pub use ddl::create_all;
pub use error::DbError;
pub use store::{get, insert, list};

use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};

/// A pooled SQLite connection handle.
pub type DbPool = r2d2::Pool<SqliteConnectionManager>;

/// Tunables for opening a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbSettings {
    /// How long a connection waits on a locked database, in milliseconds.
    pub busy_timeout_ms: u64,

    /// Upper bound on pooled connections.
    pub max_connections: u32,
}

impl Default for DbSettings {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
            max_connections: 8,
        }
    }
}

/// Opens a pooled database at `path`; `:memory:` gives an in-memory database
/// (useful for tests).
///
/// Every connection the pool hands out has gone through the same setup:
/// WAL journal mode, foreign keys on, and the configured busy timeout.
///
/// # Errors
///
/// Returns [`DbError::Pool`] if the pool cannot be built.
pub fn open(path: &str, settings: DbSettings) -> Result<DbPool, DbError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;

    let manager = SqliteConnectionManager::file(path)
        .with_flags(flags)
        .with_init(move |conn| init_connection(conn, settings.busy_timeout_ms));

    let pool = r2d2::Pool::builder()
        .max_size(settings.max_connections)
        .build(manager)?;

    Ok(pool)
}

/// Per-connection setup. The WAL switch is verified: SQLite silently falls
/// back on filesystems that cannot support it, and an undetected fallback
/// would change locking behavior under load. In-memory databases report
/// `memory`, which is accepted.
fn init_connection(conn: &Connection, busy_timeout_ms: u64) -> rusqlite::Result<()> {
    let mode: String = conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
    if mode != "wal" && mode != "memory" {
        return Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
            Some(format!("journal_mode is '{mode}', expected wal")),
        ));
    }

    conn.execute_batch(&format!(
        "PRAGMA foreign_keys = ON;\n         PRAGMA busy_timeout = {busy_timeout_ms};"
    ))
}
