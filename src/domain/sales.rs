// ==========================================
// Vendas Ingest - sales domain model
// ==========================================
// Entities mirror the record-store tables one to one.
// The pipeline only ever creates these records; updates and
// deletes happen in administrative flows outside this crate.
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// StoreRecord - a physical retail location (branch)
// ==========================================
// Unique by exact, case-sensitive name. Created on first
// reference by the reconciler, never deleted by the pipeline.
// Named StoreRecord rather than Store to stay clear of the
// record-store (persistence) vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub id: i64,
    pub name: String,
    /// Monthly sales target; always 0 when created by the pipeline,
    /// maintained by a separate administrative flow.
    pub monthly_target: f64,
}

// ==========================================
// Operator - a named seller/employee
// ==========================================
// Unique by (name, store_id); the static-mapping pipeline resolves
// names globally, the filename-scoped pipeline within one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    pub id: i64,
    pub name: String,
    pub store_id: i64,
    pub monthly_target: f64,
    pub active: bool,
}

// ==========================================
// Sale - one normalized ledger row
// ==========================================
// Immutable once created by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: i64,
    pub sale_date: NaiveDate,
    pub operator_id: i64,
    /// Populated by the static-mapping variant; intentionally left
    /// unset by the filename-scoped variant, which defers store
    /// attribution to a downstream derivation from operator_id.
    pub store_id: Option<i64>,
    pub cost_amount: f64,
    pub commission_amount: f64,
    pub sale_amount: f64,
}

/// Insert payload for a Sale; the record store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSale {
    pub sale_date: NaiveDate,
    pub operator_id: i64,
    pub store_id: Option<i64>,
    pub cost_amount: f64,
    pub commission_amount: f64,
    pub sale_amount: f64,
}

// ==========================================
// IngestionRun - one record per ingested file
// ==========================================
// Written after the pipeline completes (success or partial
// success), never on a hard abort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionRun {
    pub run_id: String,
    pub filename: String,
    pub rows_emitted: i64,
    pub status: RunStatus,
    pub created_at: DateTime<Utc>,
}

/// Terminal status of an ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Every scanned row was emitted.
    Processed,
    /// The run completed but some rows were skipped or errored.
    ProcessedWithErrors,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Processed => "PROCESSED",
            RunStatus::ProcessedWithErrors => "PROCESSED_WITH_ERRORS",
        }
    }

    pub fn parse(raw: &str) -> RunStatus {
        match raw {
            "PROCESSED" => RunStatus::Processed,
            _ => RunStatus::ProcessedWithErrors,
        }
    }
}
