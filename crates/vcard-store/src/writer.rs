//! Dual-store commit of normalized records.
//!
//! A record is written in two phases: [`DualStoreWriter::stage_narrow`]
//! inserts the searchable projection under a fresh [`RecordId`], then
//! [`DualStoreWriter::append_wide`] inserts the full record under the same
//! id. Between the two phases the narrow row exists without a wide
//! counterpart; a failed wide insert leaves it that way and reports the
//! orphaned id in [`WriteError::WideInsert`].
//!
//! The narrow side is checkpointed every `checkpoint_interval` records and
//! on [`DualStoreWriter::finish`]. The wide side is durable per record.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use vcard_model::{BatchId, IdempotencyKey, NormalizedRecord, RecordId};

use crate::contract::{NarrowStore, RecordEnvelope, WideStore};
use crate::error::WriteError;

/// Default number of records between narrow checkpoints.
pub const DEFAULT_CHECKPOINT_INTERVAL: usize = 100;

/// A record whose narrow projection has been inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a staged record must be appended to the wide store"]
pub struct StagedRecord {
    pub row_index: usize,
    pub record_id: RecordId,
    pub idempotency_key: IdempotencyKey,
    pub written_at: DateTime<Utc>,
}

/// Proof that a record reached both stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitReceipt {
    pub row_index: usize,
    pub record_id: RecordId,
    pub idempotency_key: IdempotencyKey,
    /// True when this record triggered a narrow checkpoint.
    pub checkpointed: bool,
}

/// Writes records of one batch into a narrow and a wide store.
pub struct DualStoreWriter<'s> {
    batch_id: BatchId,
    narrow: &'s mut dyn NarrowStore,
    wide: &'s mut dyn WideStore,
    checkpoint_interval: usize,
    written: usize,
}

impl<'s> DualStoreWriter<'s> {
    pub fn new(
        batch_id: BatchId,
        narrow: &'s mut dyn NarrowStore,
        wide: &'s mut dyn WideStore,
    ) -> Self {
        Self {
            batch_id,
            narrow,
            wide,
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            written: 0,
        }
    }

    /// Sets the checkpoint interval; zero is treated as one.
    pub fn with_checkpoint_interval(mut self, interval: usize) -> Self {
        self.checkpoint_interval = interval.max(1);
        self
    }

    pub fn batch_id(&self) -> &BatchId {
        &self.batch_id
    }

    /// Records committed to both stores so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Phase one: inserts the narrow projection under a new record id.
    pub fn stage_narrow(
        &mut self,
        row_index: usize,
        record: &NormalizedRecord,
    ) -> Result<StagedRecord, WriteError> {
        let staged = StagedRecord {
            row_index,
            record_id: RecordId::new_v4(),
            idempotency_key: IdempotencyKey::for_row(&self.batch_id, row_index),
            written_at: Utc::now(),
        };
        self.narrow
            .insert(&envelope(&self.batch_id, &staged, record))
            .map_err(|source| WriteError::NarrowInsert { row_index, source })?;
        Ok(staged)
    }

    /// Phase two: inserts the full record under the staged id.
    pub fn append_wide(
        &mut self,
        staged: StagedRecord,
        record: &NormalizedRecord,
    ) -> Result<CommitReceipt, WriteError> {
        self.wide
            .insert(&envelope(&self.batch_id, &staged, record))
            .map_err(|source| WriteError::WideInsert {
                row_index: staged.row_index,
                record_id: staged.record_id,
                source,
            })?;
        self.written += 1;

        let checkpointed = self.written % self.checkpoint_interval == 0;
        if checkpointed {
            self.checkpoint()?;
            info!(records = self.written, "checkpoint");
        }
        Ok(CommitReceipt {
            row_index: staged.row_index,
            record_id: staged.record_id,
            idempotency_key: staged.idempotency_key,
            checkpointed,
        })
    }

    /// Both phases for one record.
    pub fn write(
        &mut self,
        row_index: usize,
        record: &NormalizedRecord,
    ) -> Result<CommitReceipt, WriteError> {
        let staged = self.stage_narrow(row_index, record)?;
        self.append_wide(staged, record)
    }

    /// Makes staged narrow rows durable.
    pub fn checkpoint(&mut self) -> Result<(), WriteError> {
        self.narrow
            .checkpoint()
            .map_err(|source| WriteError::Checkpoint {
                written: self.written,
                source,
            })?;
        debug!(records = self.written, "narrow store checkpointed");
        Ok(())
    }

    /// Final checkpoint; returns the number of records written.
    pub fn finish(mut self) -> Result<usize, WriteError> {
        self.checkpoint()?;
        Ok(self.written)
    }
}

fn envelope<'r>(
    batch_id: &'r BatchId,
    staged: &StagedRecord,
    record: &'r NormalizedRecord,
) -> RecordEnvelope<'r> {
    RecordEnvelope {
        id: staged.record_id,
        batch_id,
        idempotency_key: staged.idempotency_key,
        record,
        written_at: staged.written_at,
    }
}
