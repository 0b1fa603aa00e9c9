// ==========================================
// Vendas Ingest - domain layer
// ==========================================
// Entities written by the ingestion pipeline.
// ==========================================

pub mod sales;

pub use sales::{IngestionRun, NewSale, Operator, RunStatus, Sale, StoreRecord};
