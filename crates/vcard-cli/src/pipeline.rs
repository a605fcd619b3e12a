//! Batch orchestration.
//!
//! One batch runs these stages in order:
//! 1. **Begin**: mark the batch `PARSING`
//! 2. **Download**: fetch the source file behind a cleanup guard
//! 3. **Ingest**: read the file into a raw table
//! 4. **Map + Write**: normalize each row and commit it to both stores
//! 5. **Finish**: final checkpoint, then mark the batch `PARSED`
//!
//! Any failure stops the batch where it is. Rows already written stay
//! written; the narrow store is checkpointed so they become visible, and the
//! batch is marked `ERROR` with the failure message.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{error, info, info_span, warn};

use vcard_ingest::read_table;
use vcard_map::FieldMapper;
use vcard_model::{
    AliasTable, BatchId, BatchReport, CanonicalField, PhoneNormalizationPolicy,
};
use vcard_store::{
    DEFAULT_CHECKPOINT_INTERVAL, DualStoreWriter, NarrowStore, StatusTracker, WideStore,
};

use crate::logging::redact_value;
use crate::storage::{DownloadedFile, StorageClient};

/// Message recorded when the input yields no data rows.
pub const NO_DATA_MESSAGE: &str = "No data extracted from file";

/// Per-batch settings.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub batch_id: BatchId,
    pub file_path: PathBuf,
    pub policy: PhoneNormalizationPolicy,
    pub checkpoint_interval: usize,
}

impl BatchConfig {
    pub fn new(batch_id: BatchId, file_path: impl Into<PathBuf>) -> Self {
        Self {
            batch_id,
            file_path: file_path.into(),
            policy: PhoneNormalizationPolicy::default(),
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: PhoneNormalizationPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_checkpoint_interval(mut self, interval: usize) -> Self {
        self.checkpoint_interval = interval;
        self
    }
}

/// The three stores a batch writes to.
pub struct BatchStores<'s> {
    pub narrow: &'s mut dyn NarrowStore,
    pub wide: &'s mut dyn WideStore,
    pub status: &'s mut dyn StatusTracker,
}

/// Row counts of a completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Counts {
    total: usize,
    processed: usize,
}

/// Runs one batch end to end and reports the outcome.
///
/// Never panics and never returns early without recording a terminal status,
/// unless the status store itself is unreachable.
pub fn run_batch(
    config: &BatchConfig,
    storage: &dyn StorageClient,
    stores: BatchStores<'_>,
) -> BatchReport {
    let span = info_span!("batch", batch_id = %config.batch_id);
    let _guard = span.enter();
    let start = Instant::now();
    let BatchStores {
        narrow,
        wide,
        status,
    } = stores;

    if let Err(error) = status
        .begin(&config.batch_id)
        .context("mark batch as parsing")
    {
        return abort(config, status, &error);
    }

    match process(config, storage, narrow, wide) {
        Ok(counts) => {
            if let Err(error) = status
                .complete(&config.batch_id, counts.total, counts.processed)
                .context("mark batch as parsed")
            {
                return abort(config, status, &error);
            }
            info!(
                total = counts.total,
                processed = counts.processed,
                duration_ms = start.elapsed().as_millis(),
                "batch parsed"
            );
            BatchReport::success(counts.total, counts.processed)
        }
        Err(error) => abort(config, status, &error),
    }
}

/// Records the failure and builds the failure report.
fn abort(
    config: &BatchConfig,
    status: &mut dyn StatusTracker,
    error: &anyhow::Error,
) -> BatchReport {
    let message = failure_message(error);
    error!(error = %message, "batch failed");
    if let Err(status_error) = status.fail(&config.batch_id, &message) {
        warn!(error = %status_error, "could not record batch failure");
    }
    BatchReport::failure(message)
}

/// Joins the error chain, skipping causes a parent message already embeds.
fn failure_message(error: &anyhow::Error) -> String {
    let mut parts: Vec<String> = Vec::new();
    for cause in error.chain() {
        let text = cause.to_string();
        if parts.last().is_some_and(|parent| parent.contains(&text)) {
            continue;
        }
        parts.push(text);
    }
    parts.join(": ")
}

fn process(
    config: &BatchConfig,
    storage: &dyn StorageClient,
    narrow: &mut dyn NarrowStore,
    wide: &mut dyn WideStore,
) -> Result<Counts> {
    let source = DownloadedFile::acquire(storage, &config.file_path)
        .with_context(|| format!("download {}", config.file_path.display()))?;

    let aliases = AliasTable::default_table();
    let table = read_table(source.path(), aliases)
        .with_context(|| format!("read {}", config.file_path.display()))?;
    if table.is_empty() {
        bail!(NO_DATA_MESSAGE);
    }
    let rows = table.into_raw_rows();
    let total = rows.len();
    info!(rows = total, "file ingested");

    let mapper = FieldMapper::new(aliases, config.policy.clone()).context("phone policy")?;
    let mut writer = DualStoreWriter::new(config.batch_id.clone(), narrow, wide)
        .with_checkpoint_interval(config.checkpoint_interval);

    for (row_index, row) in rows.iter().enumerate() {
        let record = mapper.normalize(row);
        if let Err(write_error) = writer.write(row_index, &record) {
            error!(
                row = row_index + 1,
                email = redact_value(record.get(CanonicalField::Email).unwrap_or_default()),
                "row failed"
            );
            // Rows before this one stay committed.
            if let Err(checkpoint_error) = writer.checkpoint() {
                warn!(error = %checkpoint_error, "checkpoint after row failure failed");
            }
            return Err(write_error.into());
        }
    }

    let processed = writer.finish().context("final checkpoint")?;
    Ok(Counts { total, processed })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use vcard_model::BatchState;
    use vcard_store::{MemoryNarrowStore, MemoryStatusStore, MemoryWideStore};

    use super::*;
    use crate::storage;

    /// Serves fixed text under any path through a temp directory.
    struct FixtureStorage {
        dir: tempfile::TempDir,
        name: &'static str,
        contents: &'static str,
    }

    impl FixtureStorage {
        fn new(name: &'static str, contents: &'static str) -> Self {
            Self {
                dir: tempfile::TempDir::new().unwrap(),
                name,
                contents,
            }
        }
    }

    impl StorageClient for FixtureStorage {
        fn download(&self, _path: &Path) -> storage::Result<PathBuf> {
            let path = self.dir.path().join(self.name);
            std::fs::write(&path, self.contents).unwrap();
            Ok(path)
        }

        fn cleanup(&self, local: &Path) -> storage::Result<()> {
            std::fs::remove_file(local).unwrap();
            Ok(())
        }
    }

    fn batch_id() -> BatchId {
        BatchId::new("batch-7").unwrap()
    }

    #[test]
    fn header_only_file_has_no_data() {
        let storage = FixtureStorage::new("empty.csv", "Nombre,Correo\n");
        let mut narrow = MemoryNarrowStore::new();
        let mut wide = MemoryWideStore::new();
        let mut status = MemoryStatusStore::new();
        let config = BatchConfig::new(batch_id(), "empty.csv");

        let report = run_batch(
            &config,
            &storage,
            BatchStores {
                narrow: &mut narrow,
                wide: &mut wide,
                status: &mut status,
            },
        );

        assert_eq!(report, BatchReport::failure(NO_DATA_MESSAGE));
        let stored = status.status(&batch_id()).unwrap();
        assert_eq!(stored.state, BatchState::Error);
        assert_eq!(stored.error_message.as_deref(), Some(NO_DATA_MESSAGE));
        assert!(!storage.dir.path().join("empty.csv").exists());
    }

    #[test]
    fn unreachable_status_store_still_reports() {
        let storage = FixtureStorage::new("a.csv", "Nombre\nAna\n");
        let mut narrow = MemoryNarrowStore::new();
        let mut wide = MemoryWideStore::new();
        let mut status = MemoryStatusStore::new().failing_begin();
        let config = BatchConfig::new(batch_id(), "a.csv");

        let report = run_batch(
            &config,
            &storage,
            BatchStores {
                narrow: &mut narrow,
                wide: &mut wide,
                status: &mut status,
            },
        );

        assert!(!report.success);
        assert!(report.error.unwrap().starts_with("mark batch as parsing"));
        assert!(wide.records().is_empty());
        // Created -> Error is still recorded.
        assert_eq!(
            status.status(&batch_id()).map(|s| s.state),
            Some(BatchState::Error)
        );
    }

    #[test]
    fn invalid_policy_fails_before_writing() {
        let storage = FixtureStorage::new("a.csv", "Nombre\nAna\n");
        let mut narrow = MemoryNarrowStore::new();
        let mut wide = MemoryWideStore::new();
        let mut status = MemoryStatusStore::new();
        let config = BatchConfig::new(batch_id(), "a.csv").with_policy(
            PhoneNormalizationPolicy::default().with_work_phone_prefix("ext"),
        );

        let report = run_batch(
            &config,
            &storage,
            BatchStores {
                narrow: &mut narrow,
                wide: &mut wide,
                status: &mut status,
            },
        );

        assert!(!report.success);
        assert!(narrow.committed().is_empty());
        assert!(wide.records().is_empty());
    }
}
