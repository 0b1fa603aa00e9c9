// ==========================================
// Vendas Ingest - row pipeline
// ==========================================
// Drives per-row parsing, name resolution, entity
// reconciliation, and sale emission, with isolated per-row
// failure handling. Flow: parse -> resolve -> reconcile ->
// emit; every failure short of a file-level precondition is
// folded into the report instead of aborting the run.
//
// Two variants share the machinery:
// - ingest_mapped: store resolved per row via the static
//   employee->store table, permissive operator creation
// - ingest_scoped: store inferred once from the filename,
//   operator matching restricted to that store, fail closed
// ==========================================

use crate::config::IngestConfig;
use crate::domain::{IngestionRun, NewSale};
use crate::ingest::error::{IngestError, IngestResult};
use crate::ingest::locale;
use crate::ingest::reconciler::EntityReconciler;
use crate::ingest::report::{IngestionReport, SkipReason};
use crate::ingest::resolver::NameResolver;
use crate::store::record_store::RecordStore;
use chrono::{Datelike, NaiveDate, Utc};
use csv::{Reader, ReaderBuilder, StringRecord};
use std::io::Read;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Leading banner/totals rows every back-office export starts with
/// (static-mapping exports only).
const BANNER_ROWS: usize = 3;

/// Positional columns: date, employee, cost, commission, sale amount.
const LEDGER_COLUMNS: usize = 5;

/// A row whose first cell starts with this token (case-insensitive)
/// is the end-of-ledger sentinel; nothing after it is scanned.
const SENTINEL_PREFIX: &str = "total";

/// A first row whose first cell contains this token is a column
/// header, not data.
const HEADER_TOKEN: &str = "Data";

fn cell<'r>(record: &'r StringRecord, idx: usize) -> &'r str {
    record.get(idx).unwrap_or("").trim()
}

fn is_sentinel(record: &StringRecord) -> bool {
    cell(record, 0).to_lowercase().starts_with(SENTINEL_PREFIX)
}

// ==========================================
// LedgerIngestor
// ==========================================
pub struct LedgerIngestor<'a, S: RecordStore> {
    records: &'a S,
    config: &'a IngestConfig,
}

impl<'a, S: RecordStore> LedgerIngestor<'a, S> {
    /// Record store and configuration are injected; nothing here
    /// touches global state.
    pub fn new(records: &'a S, config: &'a IngestConfig) -> Self {
        Self { records, config }
    }

    fn ledger_reader<R: Read>(input: R) -> Reader<R> {
        ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true)
            .from_reader(input)
    }

    /// Fallback date for the static-mapping variant: today, pinned
    /// to the configured reference year.
    fn reference_date(reference_year: i32) -> NaiveDate {
        let today = chrono::Local::now().date_naive();
        today.with_year(reference_year).unwrap_or(today)
    }

    /// Static-mapping variant.
    ///
    /// Skips the 3-row banner block, then per row: parses the locale
    /// fields, maps the employee token to a store (identity fallback
    /// for unmapped tokens), get-or-creates store and operator, and
    /// emits a sale carrying both ids. An unparsable date falls back
    /// to the reference date and the row still emits.
    #[instrument(skip(self, input), fields(filename = %filename))]
    pub fn ingest_mapped<R: Read>(&self, input: R, filename: &str) -> IngestResult<IngestionReport> {
        let run_id = Uuid::new_v4().to_string();
        info!(run_id = %run_id, "starting static-mapping ingestion run");

        let mut report = IngestionReport::new(run_id, filename);
        let resolver = NameResolver::new(self.config);
        let reconciler = EntityReconciler::new(self.records);
        let reference_year = self.config.year_policy.reference_year();
        let fallback_date = Self::reference_date(reference_year);

        let mut reader = Self::ledger_reader(input);
        let mut data_rows_seen = false;
        let mut saw_sentinel = false;

        for (idx, result) in reader.records().enumerate() {
            if idx < BANNER_ROWS {
                continue;
            }
            data_rows_seen = true;

            // Undecodable rows (invalid UTF-8) are isolated like any
            // other bad row; aborting here would lose the run record
            // for sales already inserted
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!(row = idx + 1, error = %e, "undecodable row");
                    report.row_skipped(
                        SkipReason::MalformedRow,
                        Some(format!("undecodable row: {}", e)),
                    );
                    continue;
                }
            };

            if is_sentinel(&record) {
                debug!(row = idx + 1, "end-of-ledger sentinel reached");
                saw_sentinel = true;
                break;
            }

            if record.len() < LEDGER_COLUMNS {
                report.row_skipped(SkipReason::ShortRow, None);
                continue;
            }
            report.row_scanned();

            let date_token = cell(&record, 0);
            let employee = cell(&record, 1);
            if date_token.is_empty() || employee.is_empty() {
                report.row_skipped(SkipReason::BlankFields, None);
                continue;
            }

            let sale_date = match locale::parse_ledger_date(date_token, reference_year) {
                Ok(date) => date,
                Err(_) => {
                    report.date_recovered(date_token);
                    fallback_date
                }
            };

            let cost_amount = locale::parse_currency(cell(&record, 2));
            let commission_amount = locale::parse_currency(cell(&record, 3));
            let sale_amount = locale::parse_currency(cell(&record, 4));

            let resolved = resolver.resolve_mapped(employee);

            let store = match reconciler.get_or_create_store(&resolved.store_name) {
                Ok(store) => store,
                Err(e) => {
                    warn!(row = idx + 1, error = %e, "store reconciliation failed");
                    report.row_skipped(
                        SkipReason::StorageError,
                        Some(format!("failed to reconcile store {}: {}", resolved.store_name, e)),
                    );
                    continue;
                }
            };

            let operator =
                match reconciler.get_or_create_operator(&resolved.operator_name, store.id) {
                    Ok(operator) => operator,
                    Err(e) => {
                        warn!(row = idx + 1, error = %e, "operator reconciliation failed");
                        report.row_skipped(
                            SkipReason::StorageError,
                            Some(format!(
                                "failed to reconcile operator {}: {}",
                                resolved.operator_name, e
                            )),
                        );
                        continue;
                    }
                };

            let sale = NewSale {
                sale_date,
                operator_id: operator.id,
                store_id: Some(store.id),
                cost_amount,
                commission_amount,
                sale_amount,
            };
            match self.records.insert_sale(&sale) {
                Ok(_) => report.row_emitted(&resolved.operator_name),
                Err(e) => {
                    warn!(row = idx + 1, error = %e, "sale insert failed");
                    report.row_skipped(
                        SkipReason::InsertFailed,
                        Some(format!("failed to insert sale for {}: {}", employee, e)),
                    );
                }
            }
        }

        if !data_rows_seen && !saw_sentinel {
            return Err(IngestError::EmptyFile(filename.to_string()));
        }

        self.finish_run(&report)?;
        Ok(report)
    }

    /// Filename-scoped variant.
    ///
    /// The store is inferred once from the filename or the run is
    /// rejected before any row is read. Operators are matched by
    /// exact name within that store only; a miss skips the row as
    /// "operator not found" (no implicit creation), and an
    /// unparsable date skips the row outright. Emitted sales leave
    /// store_id unset; attribution is derived downstream from the
    /// operator.
    #[instrument(skip(self, input), fields(filename = %filename))]
    pub fn ingest_scoped<R: Read>(&self, input: R, filename: &str) -> IngestResult<IngestionReport> {
        let run_id = Uuid::new_v4().to_string();
        let resolver = NameResolver::new(self.config);

        let store_name = resolver
            .infer_store_from_filename(filename)
            .ok_or_else(|| IngestError::StoreNotIdentified(filename.to_string()))?;
        info!(run_id = %run_id, store = %store_name, "starting filename-scoped ingestion run");

        let mut report = IngestionReport::new(run_id, filename);
        report.inferred_store = Some(store_name.clone());

        // The store may not be registered yet; every row then records
        // as operator-not-found, consistent with no implicit creation
        let store = self.records.find_store_by_name(&store_name)?;
        if store.is_none() {
            warn!(store = %store_name, "inferred store not registered");
        }

        let reconciler = EntityReconciler::new(self.records);
        let reference_year = self.config.year_policy.reference_year();

        let mut reader = Self::ledger_reader(input);
        let mut records = reader.records();

        // One-row lookahead instead of a stream rewind: a first row
        // whose first cell contains "Data" is the column header
        let mut pending: Option<StringRecord> = None;
        let mut data_rows_seen = false;
        match records.next() {
            None => return Err(IngestError::EmptyFile(filename.to_string())),
            Some(Ok(first)) => {
                if !cell(&first, 0).contains(HEADER_TOKEN) {
                    pending = Some(first);
                    data_rows_seen = true;
                }
            }
            Some(Err(e)) => {
                warn!(error = %e, "undecodable row");
                report.row_skipped(
                    SkipReason::MalformedRow,
                    Some(format!("undecodable row: {}", e)),
                );
                data_rows_seen = true;
            }
        }

        let mut saw_sentinel = false;

        loop {
            let record = match pending.take() {
                Some(buffered) => buffered,
                None => match records.next() {
                    Some(Ok(record)) => {
                        data_rows_seen = true;
                        record
                    }
                    Some(Err(e)) => {
                        data_rows_seen = true;
                        warn!(error = %e, "undecodable row");
                        report.row_skipped(
                            SkipReason::MalformedRow,
                            Some(format!("undecodable row: {}", e)),
                        );
                        continue;
                    }
                    None => break,
                },
            };

            if is_sentinel(&record) {
                debug!("end-of-ledger sentinel reached");
                saw_sentinel = true;
                break;
            }

            if record.len() < LEDGER_COLUMNS {
                report.row_skipped(SkipReason::ShortRow, None);
                continue;
            }
            report.row_scanned();

            let date_token = cell(&record, 0);
            let employee = cell(&record, 1);
            if date_token.is_empty() || employee.is_empty() {
                report.row_skipped(SkipReason::BlankFields, None);
                continue;
            }

            let sale_date = match locale::parse_ledger_date(date_token, reference_year) {
                Ok(date) => date,
                Err(_) => {
                    report.row_skipped(
                        SkipReason::UnparsableDate,
                        Some(format!("invalid date: {}", date_token)),
                    );
                    continue;
                }
            };

            let cost_amount = locale::parse_currency(cell(&record, 2));
            let commission_amount = locale::parse_currency(cell(&record, 3));
            let sale_amount = locale::parse_currency(cell(&record, 4));

            let operator = match &store {
                Some(store) => match reconciler.find_operator_in_store(employee, store.id) {
                    Ok(operator) => operator,
                    Err(e) => {
                        warn!(error = %e, "operator lookup failed");
                        report.row_skipped(
                            SkipReason::StorageError,
                            Some(format!("failed to look up operator {}: {}", employee, e)),
                        );
                        continue;
                    }
                },
                None => None,
            };

            match operator {
                Some(operator) => {
                    let sale = NewSale {
                        sale_date,
                        operator_id: operator.id,
                        // Deferred to downstream derivation from operator_id
                        store_id: None,
                        cost_amount,
                        commission_amount,
                        sale_amount,
                    };
                    match self.records.insert_sale(&sale) {
                        Ok(_) => report.row_emitted(employee),
                        Err(e) => {
                            warn!(error = %e, "sale insert failed");
                            report.row_skipped(
                                SkipReason::InsertFailed,
                                Some(format!("failed to insert sale for {}: {}", employee, e)),
                            );
                        }
                    }
                }
                None => report.operator_unmatched(employee),
            }
        }

        if !data_rows_seen && !saw_sentinel {
            // Header-only upload
            return Err(IngestError::EmptyFile(filename.to_string()));
        }

        self.finish_run(&report)?;
        Ok(report)
    }

    /// Record the completed run. Called on success and partial
    /// success, never on a hard abort.
    fn finish_run(&self, report: &IngestionReport) -> IngestResult<()> {
        let run = IngestionRun {
            run_id: report.run_id.clone(),
            filename: report.filename.clone(),
            rows_emitted: report.rows_emitted as i64,
            status: report.run_status(),
            created_at: Utc::now(),
        };
        self.records.insert_run(&run)?;

        info!(
            run_id = %report.run_id,
            scanned = report.rows_scanned,
            emitted = report.rows_emitted,
            skipped = report.errors.total(),
            matched = report.operators_matched(),
            unmatched = report.operators_unmatched(),
            status = run.status.as_str(),
            "ingestion run recorded"
        );
        Ok(())
    }
}
