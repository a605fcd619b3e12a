//! Error types for record stores and the dual-store writer.

use std::path::PathBuf;

use thiserror::Error;

use vcard_model::{ModelError, RecordId};

/// Errors raised by a single store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not create the directory holding a database file.
    #[error("failed to create store directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// SQLite reported an error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A status change violated the batch lifecycle.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A persisted status row could not be read back.
    #[error("corrupt status row for batch {batch_id}: {detail}")]
    CorruptStatus { batch_id: String, detail: String },

    /// Failure raised on purpose by an in-memory store.
    #[error("{store} store rejected {operation} #{count}")]
    Injected {
        store: &'static str,
        operation: &'static str,
        count: usize,
    },
}

/// Errors raised while committing one record to both stores.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The narrow insert failed; nothing was written for this row.
    #[error("narrow insert failed for row {row_index}: {source}")]
    NarrowInsert {
        row_index: usize,
        #[source]
        source: StoreError,
    },

    /// The wide insert failed after the narrow insert succeeded. The narrow
    /// row `record_id` has no wide counterpart.
    #[error("wide insert failed for row {row_index} (record {record_id}): {source}")]
    WideInsert {
        row_index: usize,
        record_id: RecordId,
        #[source]
        source: StoreError,
    },

    /// Staged narrow rows could not be made durable.
    #[error("narrow checkpoint failed after {written} records: {source}")]
    Checkpoint {
        written: usize,
        #[source]
        source: StoreError,
    },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::Injected {
            store: "wide",
            operation: "insert",
            count: 3,
        };
        assert_eq!(err.to_string(), "wide store rejected insert #3");

        let wrapped = WriteError::NarrowInsert {
            row_index: 2,
            source: err,
        };
        assert_eq!(
            wrapped.to_string(),
            "narrow insert failed for row 2: wide store rejected insert #3"
        );
    }
}
