//! In-memory stores for tests and dry runs.
//!
//! Each store can be told to fail on its Nth call to exercise the abort path.

use std::collections::HashMap;

use chrono::Utc;
use tracing::debug;

use vcard_model::{BatchId, BatchStatus, IdempotencyKey, NormalizedRecord, RecordId};

use crate::contract::{NarrowRecord, NarrowStore, RecordEnvelope, StatusTracker, WideStore};
use crate::error::{Result, StoreError};

/// Narrow store that keeps staged rows apart from checkpointed ones.
#[derive(Debug, Default)]
pub struct MemoryNarrowStore {
    staged: Vec<NarrowRecord>,
    committed: Vec<NarrowRecord>,
    inserts: usize,
    checkpoints: usize,
    fail_insert_at: Option<usize>,
    fail_checkpoint_at: Option<usize>,
}

impl MemoryNarrowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the `n`th insert (1-based).
    pub fn failing_insert_at(mut self, n: usize) -> Self {
        self.fail_insert_at = Some(n);
        self
    }

    /// Fails the `n`th checkpoint (1-based).
    pub fn failing_checkpoint_at(mut self, n: usize) -> Self {
        self.fail_checkpoint_at = Some(n);
        self
    }

    pub fn committed(&self) -> &[NarrowRecord] {
        &self.committed
    }

    /// Rows inserted since the last checkpoint.
    pub fn staged(&self) -> &[NarrowRecord] {
        &self.staged
    }

    pub fn checkpoints(&self) -> usize {
        self.checkpoints
    }
}

impl NarrowStore for MemoryNarrowStore {
    fn insert(&mut self, envelope: &RecordEnvelope<'_>) -> Result<()> {
        self.inserts += 1;
        if self.fail_insert_at == Some(self.inserts) {
            return Err(StoreError::Injected {
                store: "narrow",
                operation: "insert",
                count: self.inserts,
            });
        }
        self.staged.push(NarrowRecord::project(envelope));
        Ok(())
    }

    fn checkpoint(&mut self) -> Result<()> {
        self.checkpoints += 1;
        if self.fail_checkpoint_at == Some(self.checkpoints) {
            return Err(StoreError::Injected {
                store: "narrow",
                operation: "checkpoint",
                count: self.checkpoints,
            });
        }
        debug!(rows = self.staged.len(), "narrow checkpoint");
        self.committed.append(&mut self.staged);
        Ok(())
    }
}

/// A full record as held by [`MemoryWideStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideRecord {
    pub id: RecordId,
    pub batch_id: BatchId,
    pub idempotency_key: IdempotencyKey,
    pub record: NormalizedRecord,
}

/// Wide store where every insert is immediately visible.
#[derive(Debug, Default)]
pub struct MemoryWideStore {
    records: Vec<WideRecord>,
    inserts: usize,
    fail_insert_at: Option<usize>,
}

impl MemoryWideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the `n`th insert (1-based).
    pub fn failing_insert_at(mut self, n: usize) -> Self {
        self.fail_insert_at = Some(n);
        self
    }

    pub fn records(&self) -> &[WideRecord] {
        &self.records
    }

    pub fn get(&self, id: &RecordId) -> Option<&WideRecord> {
        self.records.iter().find(|record| &record.id == id)
    }
}

impl WideStore for MemoryWideStore {
    fn insert(&mut self, envelope: &RecordEnvelope<'_>) -> Result<()> {
        self.inserts += 1;
        if self.fail_insert_at == Some(self.inserts) {
            return Err(StoreError::Injected {
                store: "wide",
                operation: "insert",
                count: self.inserts,
            });
        }
        self.records.push(WideRecord {
            id: envelope.id,
            batch_id: envelope.batch_id.clone(),
            idempotency_key: envelope.idempotency_key,
            record: envelope.record.clone(),
        });
        Ok(())
    }
}

/// Status tracker keyed by batch id.
#[derive(Debug, Default)]
pub struct MemoryStatusStore {
    batches: HashMap<BatchId, BatchStatus>,
    fail_begin: bool,
}

impl MemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every `begin` call fail, as an unreachable database would.
    pub fn failing_begin(mut self) -> Self {
        self.fail_begin = true;
        self
    }

    pub fn status(&self, batch_id: &BatchId) -> Option<&BatchStatus> {
        self.batches.get(batch_id)
    }

    fn entry(&mut self, batch_id: &BatchId) -> &mut BatchStatus {
        self.batches
            .entry(batch_id.clone())
            .or_insert_with(|| BatchStatus::new(batch_id.clone()))
    }
}

impl StatusTracker for MemoryStatusStore {
    fn begin(&mut self, batch_id: &BatchId) -> Result<()> {
        if self.fail_begin {
            return Err(StoreError::Injected {
                store: "status",
                operation: "begin",
                count: 1,
            });
        }
        self.entry(batch_id).begin(Utc::now())?;
        Ok(())
    }

    fn complete(&mut self, batch_id: &BatchId, total: usize, processed: usize) -> Result<()> {
        self.entry(batch_id).complete(total, processed, Utc::now())?;
        Ok(())
    }

    fn fail(&mut self, batch_id: &BatchId, message: &str) -> Result<()> {
        self.entry(batch_id).fail(message, Utc::now())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use vcard_model::BatchState;

    use super::*;

    fn envelope<'a>(batch_id: &'a BatchId, record: &'a NormalizedRecord) -> RecordEnvelope<'a> {
        RecordEnvelope {
            id: RecordId::new_v4(),
            batch_id,
            idempotency_key: IdempotencyKey::for_row(batch_id, 0),
            record,
            written_at: Utc::now(),
        }
    }

    #[test]
    fn narrow_rows_become_visible_on_checkpoint() {
        let batch_id = BatchId::new("b").unwrap();
        let record = NormalizedRecord::default();
        let mut store = MemoryNarrowStore::new();
        store.insert(&envelope(&batch_id, &record)).unwrap();
        assert_eq!(store.staged().len(), 1);
        assert!(store.committed().is_empty());
        store.checkpoint().unwrap();
        assert_eq!(store.committed().len(), 1);
        assert!(store.staged().is_empty());
    }

    #[test]
    fn injected_failures_fire_once() {
        let batch_id = BatchId::new("b").unwrap();
        let record = NormalizedRecord::default();
        let mut store = MemoryWideStore::new().failing_insert_at(2);
        store.insert(&envelope(&batch_id, &record)).unwrap();
        assert!(store.insert(&envelope(&batch_id, &record)).is_err());
        store.insert(&envelope(&batch_id, &record)).unwrap();
        assert_eq!(store.records().len(), 2);
    }

    #[test]
    fn status_follows_lifecycle() {
        let batch_id = BatchId::new("b").unwrap();
        let mut store = MemoryStatusStore::new();
        store.begin(&batch_id).unwrap();
        store.fail(&batch_id, "boom").unwrap();
        assert!(store.complete(&batch_id, 1, 1).is_err());
        assert_eq!(store.status(&batch_id).unwrap().state, BatchState::Error);
    }
}
