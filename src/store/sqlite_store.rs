// ==========================================
// Vendas Ingest - SQLite record store
// ==========================================
// rusqlite-backed implementation of the RecordStore trait.
// One connection behind a mutex; the pipeline is sequential,
// the lock only guards against a second run sharing the handle.
// ==========================================

use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::domain::{IngestionRun, NewSale, Operator, RunStatus, Sale, StoreRecord};
use crate::store::error::{StoreError, StoreResult};
use crate::store::record_store::RecordStore;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// SqliteRecordStore
// ==========================================
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    /// Open (or create) a database file and bootstrap the schema.
    pub fn new(db_path: &str) -> StoreResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| StoreError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory database, mainly for tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::DatabaseConnectionError(e.to_string()))?;
        configure_sqlite_connection(&conn)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::LockError(e.to_string()))
    }

    fn map_store(row: &Row) -> rusqlite::Result<StoreRecord> {
        Ok(StoreRecord {
            id: row.get(0)?,
            name: row.get(1)?,
            monthly_target: row.get(2)?,
        })
    }

    fn map_operator(row: &Row) -> rusqlite::Result<Operator> {
        Ok(Operator {
            id: row.get(0)?,
            name: row.get(1)?,
            store_id: row.get(2)?,
            monthly_target: row.get(3)?,
            active: row.get(4)?,
        })
    }

    fn map_run(row: &Row) -> rusqlite::Result<IngestionRun> {
        let status_raw: String = row.get(3)?;
        let created_at: DateTime<Utc> = row.get(4)?;
        Ok(IngestionRun {
            run_id: row.get(0)?,
            filename: row.get(1)?,
            rows_emitted: row.get(2)?,
            status: RunStatus::parse(&status_raw),
            created_at,
        })
    }
}

impl RecordStore for SqliteRecordStore {
    fn find_store_by_name(&self, name: &str) -> StoreResult<Option<StoreRecord>> {
        let conn = self.lock()?;
        let store = conn
            .query_row(
                "SELECT id, name, monthly_target FROM stores WHERE name = ?1",
                params![name],
                Self::map_store,
            )
            .optional()?;
        Ok(store)
    }

    fn insert_store(&self, name: &str, monthly_target: f64) -> StoreResult<StoreRecord> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO stores (name, monthly_target) VALUES (?1, ?2)",
            params![name, monthly_target],
        )?;
        Ok(StoreRecord {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            monthly_target,
        })
    }

    fn find_operator_by_name(&self, name: &str) -> StoreResult<Option<Operator>> {
        let conn = self.lock()?;
        let operator = conn
            .query_row(
                "SELECT id, name, store_id, monthly_target, active FROM operators WHERE name = ?1",
                params![name],
                Self::map_operator,
            )
            .optional()?;
        Ok(operator)
    }

    fn find_operator_in_store(&self, name: &str, store_id: i64) -> StoreResult<Option<Operator>> {
        let conn = self.lock()?;
        let operator = conn
            .query_row(
                "SELECT id, name, store_id, monthly_target, active \
                 FROM operators WHERE name = ?1 AND store_id = ?2",
                params![name, store_id],
                Self::map_operator,
            )
            .optional()?;
        Ok(operator)
    }

    fn insert_operator(
        &self,
        name: &str,
        store_id: i64,
        monthly_target: f64,
        active: bool,
    ) -> StoreResult<Operator> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO operators (name, store_id, monthly_target, active) \
             VALUES (?1, ?2, ?3, ?4)",
            params![name, store_id, monthly_target, active],
        )?;
        Ok(Operator {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            store_id,
            monthly_target,
            active,
        })
    }

    fn insert_sale(&self, sale: &NewSale) -> StoreResult<Sale> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sales (sale_date, operator_id, store_id, cost_amount, \
             commission_amount, sale_amount) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                sale.sale_date,
                sale.operator_id,
                sale.store_id,
                sale.cost_amount,
                sale.commission_amount,
                sale.sale_amount,
            ],
        )?;
        Ok(Sale {
            id: conn.last_insert_rowid(),
            sale_date: sale.sale_date,
            operator_id: sale.operator_id,
            store_id: sale.store_id,
            cost_amount: sale.cost_amount,
            commission_amount: sale.commission_amount,
            sale_amount: sale.sale_amount,
        })
    }

    fn insert_run(&self, run: &IngestionRun) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO ingestion_runs (run_id, filename, rows_emitted, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                run.run_id,
                run.filename,
                run.rows_emitted,
                run.status.as_str(),
                run.created_at,
            ],
        )?;
        Ok(())
    }

    fn list_runs(&self) -> StoreResult<Vec<IngestionRun>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT run_id, filename, rows_emitted, status, created_at \
             FROM ingestion_runs ORDER BY created_at DESC",
        )?;
        let runs = stmt
            .query_map([], Self::map_run)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(runs)
    }
}
