// ==========================================
// Vendas Ingest - entity reconciler
// ==========================================
// Idempotent get-or-create for Store and Operator entities
// against the injected record store. Lookup-before-insert;
// when a concurrent run wins the insert race the UNIQUE
// constraint turns it into a conflict we answer by re-fetching,
// never by failing the row.
// ==========================================

use crate::domain::{Operator, StoreRecord};
use crate::store::error::{StoreError, StoreResult};
use crate::store::record_store::RecordStore;
use tracing::debug;

// ==========================================
// EntityReconciler
// ==========================================
pub struct EntityReconciler<'a, S: RecordStore> {
    records: &'a S,
}

impl<'a, S: RecordStore> EntityReconciler<'a, S> {
    pub fn new(records: &'a S) -> Self {
        Self { records }
    }

    /// Find a store by exact name or create it with a zero monthly
    /// target. Safe to call repeatedly with the same name within and
    /// across runs.
    pub fn get_or_create_store(&self, name: &str) -> StoreResult<StoreRecord> {
        if let Some(existing) = self.records.find_store_by_name(name)? {
            return Ok(existing);
        }

        match self.records.insert_store(name, 0.0) {
            Ok(created) => {
                debug!(store = %name, id = created.id, "created store");
                Ok(created)
            }
            Err(StoreError::UniqueConstraintViolation(_)) => {
                // Lost the insert race; the record exists now
                self.records
                    .find_store_by_name(name)?
                    .ok_or_else(|| StoreError::InternalError(format!(
                        "store {} vanished after unique conflict",
                        name
                    )))
            }
            Err(e) => Err(e),
        }
    }

    /// Find an operator by globally unique name or create it under
    /// the given store, active and with a zero monthly target.
    /// Global lookup scope is the static-mapping variant's
    /// uniqueness rule.
    pub fn get_or_create_operator(&self, name: &str, store_id: i64) -> StoreResult<Operator> {
        if let Some(existing) = self.records.find_operator_by_name(name)? {
            return Ok(existing);
        }

        match self.records.insert_operator(name, store_id, 0.0, true) {
            Ok(created) => {
                debug!(operator = %name, id = created.id, store_id, "created operator");
                Ok(created)
            }
            Err(StoreError::UniqueConstraintViolation(_)) => self
                .records
                .find_operator_by_name(name)?
                .ok_or_else(|| {
                    StoreError::InternalError(format!(
                        "operator {} vanished after unique conflict",
                        name
                    ))
                }),
            Err(e) => Err(e),
        }
    }

    /// Exact-name lookup within one store, no creation. This is the
    /// filename-scoped variant's uniqueness rule; a miss is the
    /// caller's "operator not found" outcome.
    pub fn find_operator_in_store(
        &self,
        name: &str,
        store_id: i64,
    ) -> StoreResult<Option<Operator>> {
        self.records.find_operator_in_store(name, store_id)
    }
}
