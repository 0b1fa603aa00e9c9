// ==========================================
// Vendas Ingest - SQLite connection initialization
// ==========================================
// Goals:
// - Unify PRAGMA behavior for every Connection::open so no module
//   runs with foreign keys off while another runs with them on
// - Unify busy_timeout to reduce spurious busy errors when two
//   ingestion runs land on the same database
// - Bootstrap the schema, including the uniqueness constraints the
//   reconciler relies on as its concurrency backstop
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// Default busy_timeout (milliseconds)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Apply the unified PRAGMAs to a connection.
///
/// Notes:
/// - foreign_keys must be enabled per connection
/// - busy_timeout must be configured per connection
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the unified configuration applied.
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Create the record-store tables if they do not exist yet.
///
/// The UNIQUE constraints on stores.name and (operators.name,
/// operators.store_id) turn a duplicate-insert race between concurrent
/// ingestion runs into a detectable conflict; the reconciler re-fetches
/// on that conflict instead of failing the row.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS stores (
            id              INTEGER PRIMARY KEY,
            name            TEXT NOT NULL UNIQUE,
            monthly_target  REAL NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS operators (
            id              INTEGER PRIMARY KEY,
            name            TEXT NOT NULL,
            store_id        INTEGER NOT NULL REFERENCES stores(id),
            monthly_target  REAL NOT NULL DEFAULT 0,
            active          INTEGER NOT NULL DEFAULT 1,
            UNIQUE(name, store_id)
        );

        CREATE TABLE IF NOT EXISTS sales (
            id                 INTEGER PRIMARY KEY,
            sale_date          TEXT NOT NULL,
            operator_id        INTEGER NOT NULL REFERENCES operators(id),
            store_id           INTEGER REFERENCES stores(id),
            cost_amount        REAL NOT NULL DEFAULT 0,
            commission_amount  REAL NOT NULL DEFAULT 0,
            sale_amount        REAL NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS ingestion_runs (
            run_id        TEXT PRIMARY KEY,
            filename      TEXT NOT NULL,
            rows_emitted  INTEGER NOT NULL,
            status        TEXT NOT NULL,
            created_at    TEXT NOT NULL
        );
        "#,
    )
}
