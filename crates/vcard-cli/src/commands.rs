use anyhow::{Context, Result};
use tracing::debug;

use vcard_cli::pipeline::{BatchConfig, BatchStores, run_batch};
use vcard_cli::storage::{LocalStorage, StagedStorage, StorageClient};
use vcard_model::{BatchId, BatchReport, PhoneNormalizationPolicy};
use vcard_store::{SqliteNarrowStore, SqliteStatusStore, SqliteWideStore};

use crate::cli::{Cli, StorageModeArg};

/// Opens the stores named on the command line and runs the batch.
///
/// Errors here happen before a status can be recorded; the caller turns them
/// into a failure report.
pub fn run(cli: &Cli) -> Result<BatchReport> {
    let batch_id = BatchId::new(cli.batch_id.as_str()).context("batch id")?;
    let policy = PhoneNormalizationPolicy::new(
        cli.work_phone_prefix.clone(),
        cli.country_code.clone(),
    );
    let config = BatchConfig::new(batch_id, &cli.file_path)
        .with_policy(policy)
        .with_checkpoint_interval(cli.checkpoint_interval as usize);

    let mut status = SqliteStatusStore::open(&cli.narrow_db)
        .with_context(|| format!("open status store {}", cli.narrow_db.display()))?;
    let mut narrow = SqliteNarrowStore::open(&cli.narrow_db)
        .with_context(|| format!("open narrow store {}", cli.narrow_db.display()))?;
    let mut wide = SqliteWideStore::open(&cli.wide_db)
        .with_context(|| format!("open wide store {}", cli.wide_db.display()))?;
    debug!(
        narrow = %cli.narrow_db.display(),
        wide = %cli.wide_db.display(),
        "stores opened"
    );

    let storage: Box<dyn StorageClient> = match cli.storage_mode {
        StorageModeArg::Local => Box::new(LocalStorage::new(cli.storage_root.clone())),
        StorageModeArg::Staged => Box::new(StagedStorage::new(cli.storage_root.clone())),
    };

    Ok(run_batch(
        &config,
        &*storage,
        BatchStores {
            narrow: &mut narrow,
            wide: &mut wide,
            status: &mut status,
        },
    ))
}
