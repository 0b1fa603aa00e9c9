// ==========================================
// Vendas Ingest - ingestion report
// ==========================================
// Run-level accumulator: scanned/emitted counters, per-reason
// skip counters, distinct matched/unmatched operator names, and
// a capped sample of human-readable error strings. The counters
// always keep the full totals; only the sample list is capped.
// ==========================================

use crate::domain::RunStatus;
use serde::Serialize;
use std::collections::BTreeSet;

/// Maximum number of error strings retained for operator feedback.
pub const MAX_ERROR_SAMPLES: usize = 10;

/// Why a row was skipped (or recovered) instead of emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Row could not be decoded from the input stream.
    MalformedRow,
    /// Fewer than the 5 required columns.
    ShortRow,
    /// Blank date or employee-name field.
    BlankFields,
    /// Date token did not match `<day> de <MonthName>`.
    UnparsableDate,
    /// No operator with that exact name registered in the inferred store.
    OperatorNotFound,
    /// Record-store failure while reconciling store/operator.
    StorageError,
    /// Record-store failure while inserting the sale.
    InsertFailed,
}

/// Per-reason row counters.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RowErrorCounters {
    pub malformed_row: usize,
    pub short_row: usize,
    pub blank_fields: usize,
    pub unparsable_date: usize,
    pub operator_not_found: usize,
    pub storage_error: usize,
    pub insert_failed: usize,
}

impl RowErrorCounters {
    fn bump(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::MalformedRow => self.malformed_row += 1,
            SkipReason::ShortRow => self.short_row += 1,
            SkipReason::BlankFields => self.blank_fields += 1,
            SkipReason::UnparsableDate => self.unparsable_date += 1,
            SkipReason::OperatorNotFound => self.operator_not_found += 1,
            SkipReason::StorageError => self.storage_error += 1,
            SkipReason::InsertFailed => self.insert_failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.malformed_row
            + self.short_row
            + self.blank_fields
            + self.unparsable_date
            + self.operator_not_found
            + self.storage_error
            + self.insert_failed
    }
}

// ==========================================
// IngestionReport
// ==========================================
#[derive(Debug, Clone)]
pub struct IngestionReport {
    pub run_id: String,
    pub filename: String,
    /// Store inferred for the whole file (filename-scoped variant);
    /// None in the static-mapping variant, which resolves per row.
    pub inferred_store: Option<String>,
    pub rows_scanned: usize,
    pub rows_emitted: usize,
    pub errors: RowErrorCounters,
    matched_operators: BTreeSet<String>,
    unmatched_operators: BTreeSet<String>,
    error_samples: Vec<String>,
    errors_total: usize,
}

impl IngestionReport {
    pub fn new(run_id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            filename: filename.into(),
            inferred_store: None,
            rows_scanned: 0,
            rows_emitted: 0,
            errors: RowErrorCounters::default(),
            matched_operators: BTreeSet::new(),
            unmatched_operators: BTreeSet::new(),
            error_samples: Vec::new(),
            errors_total: 0,
        }
    }

    pub fn row_scanned(&mut self) {
        self.rows_scanned += 1;
    }

    /// Record an emitted sale for the given operator name.
    pub fn row_emitted(&mut self, operator_name: &str) {
        self.rows_emitted += 1;
        self.matched_operators.insert(operator_name.to_string());
    }

    /// Record a skipped row with an optional error sample.
    pub fn row_skipped(&mut self, reason: SkipReason, detail: Option<String>) {
        self.errors.bump(reason);
        if let Some(message) = detail {
            self.push_error(message);
        }
    }

    /// Record a recovered unparsable date (row still emitted); counts
    /// under unparsable_date without terminating the row.
    pub fn date_recovered(&mut self, raw_token: &str) {
        self.errors.bump(SkipReason::UnparsableDate);
        self.push_error(format!("invalid date, reference date used: {}", raw_token));
    }

    /// Record an operator name that could not be matched in scope.
    pub fn operator_unmatched(&mut self, name: &str) {
        self.unmatched_operators.insert(name.to_string());
        self.row_skipped(
            SkipReason::OperatorNotFound,
            Some(format!("operator not found: {}", name)),
        );
    }

    fn push_error(&mut self, message: String) {
        self.errors_total += 1;
        // Samples beyond the cap are dropped, not hidden from counters
        if self.error_samples.len() < MAX_ERROR_SAMPLES {
            self.error_samples.push(message);
        }
    }

    pub fn operators_matched(&self) -> usize {
        self.matched_operators.len()
    }

    pub fn operators_unmatched(&self) -> usize {
        self.unmatched_operators.len()
    }

    pub fn error_samples(&self) -> &[String] {
        &self.error_samples
    }

    pub fn errors_total(&self) -> usize {
        self.errors_total
    }

    /// Status written to the ingestion-run record.
    pub fn run_status(&self) -> RunStatus {
        if self.errors.total() == 0 {
            RunStatus::Processed
        } else {
            RunStatus::ProcessedWithErrors
        }
    }

    /// Caller-facing summary.
    pub fn summary(&self) -> IngestionSummary {
        IngestionSummary {
            run_id: self.run_id.clone(),
            filename: self.filename.clone(),
            inferred_store: self.inferred_store.clone(),
            rows_scanned: self.rows_scanned,
            rows_emitted: self.rows_emitted,
            errors: self.errors.clone(),
            operators_matched: self.operators_matched(),
            operators_unmatched: self.operators_unmatched(),
            error_samples: self.error_samples.clone(),
            errors_total: self.errors_total,
        }
    }
}

/// Serializable run summary returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct IngestionSummary {
    pub run_id: String,
    pub filename: String,
    pub inferred_store: Option<String>,
    pub rows_scanned: usize,
    pub rows_emitted: usize,
    pub errors: RowErrorCounters,
    pub operators_matched: usize,
    pub operators_unmatched: usize,
    /// First MAX_ERROR_SAMPLES error strings; errors_total keeps the
    /// full count.
    pub error_samples: Vec<String>,
    pub errors_total: usize,
}
