// ==========================================
// Vendas Ingest - record-store layer
// ==========================================
// External persistence collaborator consumed by the ingestion
// core. The pipeline only ever looks records up and inserts
// them; no bulk writes, updates, or deletes.
// ==========================================

pub mod error;
pub mod record_store;
pub mod sqlite_store;

pub use error::{StoreError, StoreResult};
pub use record_store::RecordStore;
pub use sqlite_store::SqliteRecordStore;
