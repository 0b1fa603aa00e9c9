// ==========================================
// Vendas Ingest - record-store trait
// ==========================================
// Defines the persistence interface the ingestion core depends
// on (no implementation here). The pipeline receives an
// implementation by constructor injection, which is what makes
// test doubles possible.
// ==========================================

use crate::domain::{IngestionRun, NewSale, Operator, Sale, StoreRecord};
use crate::store::error::StoreResult;

// ==========================================
// RecordStore Trait
// ==========================================
// Implementor: SqliteRecordStore
pub trait RecordStore: Send + Sync {
    /// Look up a store by exact, case-sensitive name.
    fn find_store_by_name(&self, name: &str) -> StoreResult<Option<StoreRecord>>;

    /// Insert a new store.
    ///
    /// # Errors
    /// - UniqueConstraintViolation when the name already exists
    ///   (the reconciler re-fetches on this)
    fn insert_store(&self, name: &str, monthly_target: f64) -> StoreResult<StoreRecord>;

    /// Look up an operator by exact name, across all stores.
    ///
    /// Used by the static-mapping variant, whose names are
    /// globally unique.
    fn find_operator_by_name(&self, name: &str) -> StoreResult<Option<Operator>>;

    /// Look up an operator by exact name within one store.
    ///
    /// Used by the filename-scoped variant; never creates.
    fn find_operator_in_store(&self, name: &str, store_id: i64) -> StoreResult<Option<Operator>>;

    /// Insert a new operator.
    ///
    /// # Errors
    /// - UniqueConstraintViolation when (name, store_id) already
    ///   exists (the reconciler re-fetches on this)
    fn insert_operator(
        &self,
        name: &str,
        store_id: i64,
        monthly_target: f64,
        active: bool,
    ) -> StoreResult<Operator>;

    /// Insert one normalized sale row.
    fn insert_sale(&self, sale: &NewSale) -> StoreResult<Sale>;

    /// Record a completed ingestion run.
    fn insert_run(&self, run: &IngestionRun) -> StoreResult<()>;

    /// Ingestion-run history, newest first.
    fn list_runs(&self) -> StoreResult<Vec<IngestionRun>>;
}
