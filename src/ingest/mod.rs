// ==========================================
// Vendas Ingest - ingestion layer
// ==========================================
// Responsibility: raw ledger text in, validated de-duplicated
// domain records out.
// Flow: parse -> resolve -> reconcile -> emit -> report
// ==========================================

// Module declarations
pub mod error;
pub mod locale;
pub mod pipeline;
pub mod reconciler;
pub mod report;
pub mod resolver;

// Re-export core types
pub use error::{IngestError, IngestResult};
pub use pipeline::LedgerIngestor;
pub use reconciler::EntityReconciler;
pub use report::{
    IngestionReport, IngestionSummary, RowErrorCounters, SkipReason, MAX_ERROR_SAMPLES,
};
pub use resolver::{NameResolver, ResolvedName};
