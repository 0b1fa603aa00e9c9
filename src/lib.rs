// ==========================================
// Vendas Ingest - core library
// ==========================================
// Ledger ingestion & entity reconciliation pipeline:
// parses semicolon-delimited sales-ledger exports with
// Brazilian-locale dates/currency, resolves employee names
// to stores and canonical operators, and emits normalized
// sale records with per-row error isolation.
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - entities
pub mod domain;

// Record-store layer - external persistence collaborator
pub mod store;

// Ingestion layer - parsers, resolution, reconciliation, pipeline
pub mod ingest;

// Configuration layer - injectable mapping tables and policies
pub mod config;

// Database infrastructure (connection init / unified PRAGMAs / schema)
pub mod db;

// Logging
pub mod logging;

// ==========================================
// Re-exports
// ==========================================

// Domain entities
pub use domain::{IngestionRun, NewSale, Operator, RunStatus, Sale, StoreRecord};

// Configuration
pub use config::{IngestConfig, YearPolicy};

// Ingestion pipeline
pub use ingest::{
    IngestError, IngestResult, IngestionReport, IngestionSummary, LedgerIngestor, SkipReason,
};

// Record store
pub use store::{RecordStore, SqliteRecordStore, StoreError, StoreResult};

// ==========================================
// Constants
// ==========================================

// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// System name
pub const APP_NAME: &str = "Vendas Ingest";
