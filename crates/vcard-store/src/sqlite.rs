//! SQLite-backed stores.
//!
//! The narrow store and the status table share one database file; the wide
//! store usually lives in a second file. Each store owns its own connection.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use tracing::debug;

use vcard_model::{BatchId, BatchState, BatchStatus, CanonicalField};

use crate::contract::{NarrowRecord, NarrowStore, RecordEnvelope, StatusTracker, WideStore};
use crate::error::{Result, StoreError};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const NARROW_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS batch_records (
    id               TEXT PRIMARY KEY,
    batch_id         TEXT NOT NULL,
    idempotency_key  TEXT NOT NULL,
    full_name        TEXT,
    work_phone       TEXT,
    mobile_phone     TEXT,
    email            TEXT,
    business_name    TEXT,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS batch_records_batch_id ON batch_records (batch_id);
"#;

const STATUS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS batches (
    id                    TEXT PRIMARY KEY,
    status                TEXT NOT NULL,
    parsing_started_at    TEXT,
    parsing_completed_at  TEXT,
    records_count         INTEGER,
    records_processed     INTEGER,
    error_message         TEXT,
    updated_at            TEXT NOT NULL
);
"#;

/// Columns of `contact_records` that precede the canonical fields.
const WIDE_LEADING_COLUMNS: [&str; 5] = [
    "batch_record_id",
    "batch_id",
    "idempotency_key",
    "created_at",
    "updated_at",
];

fn open_connection(path: &Path, schema: &str) -> Result<Connection> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    let journal_mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    conn.execute_batch(schema)?;
    debug!(path = %path.display(), %journal_mode, "opened sqlite store");
    Ok(conn)
}

fn wide_schema() -> String {
    let mut columns: Vec<String> = vec![
        "batch_record_id  TEXT PRIMARY KEY".to_string(),
        "batch_id         TEXT NOT NULL".to_string(),
        "idempotency_key  TEXT NOT NULL".to_string(),
        "created_at       TEXT NOT NULL".to_string(),
        "updated_at       TEXT NOT NULL".to_string(),
    ];
    columns.extend(
        CanonicalField::ALL
            .iter()
            .map(|field| format!("{} TEXT", field.key())),
    );
    columns.push("extra TEXT NOT NULL DEFAULT '{}'".to_string());
    format!(
        "CREATE TABLE IF NOT EXISTS contact_records (\n    {}\n);",
        columns.join(",\n    ")
    )
}

fn wide_insert_sql() -> String {
    let columns: Vec<&str> = WIDE_LEADING_COLUMNS
        .iter()
        .copied()
        .chain(CanonicalField::ALL.iter().map(|field| field.key()))
        .chain(["extra"])
        .collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|idx| format!("?{idx}")).collect();
    format!(
        "INSERT INTO contact_records ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// Narrow projection in table `batch_records`.
///
/// Inserts run inside an open transaction that is committed on
/// [`NarrowStore::checkpoint`]; rows not yet checkpointed are rolled back if
/// the connection closes first.
pub struct SqliteNarrowStore {
    conn: Connection,
}

impl SqliteNarrowStore {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            conn: open_connection(path, NARROW_SCHEMA)?,
        })
    }

    /// Committed rows for a batch.
    pub fn count(&self, batch_id: &BatchId) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM batch_records WHERE batch_id = ?1",
            params![batch_id.as_str()],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

impl NarrowStore for SqliteNarrowStore {
    fn insert(&mut self, envelope: &RecordEnvelope<'_>) -> Result<()> {
        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN")?;
        }
        let record = NarrowRecord::project(envelope);
        let created_at = record.created_at.to_rfc3339();
        self.conn.execute(
            "INSERT INTO batch_records
             (id, batch_id, idempotency_key, full_name, work_phone, mobile_phone, email,
              business_name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                record.id.to_string(),
                record.batch_id.as_str(),
                record.idempotency_key.to_hex(),
                record.full_name,
                record.work_phone,
                record.mobile_phone,
                record.email,
                record.business_name,
                created_at,
                created_at,
            ],
        )?;
        Ok(())
    }

    fn checkpoint(&mut self) -> Result<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT")?;
        }
        Ok(())
    }
}

/// Full records in table `contact_records`, one column per canonical field.
/// Each insert autocommits.
pub struct SqliteWideStore {
    conn: Connection,
    insert_sql: String,
}

impl SqliteWideStore {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            conn: open_connection(path, &wide_schema())?,
            insert_sql: wide_insert_sql(),
        })
    }

    pub fn count(&self, batch_id: &BatchId) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM contact_records WHERE batch_id = ?1",
            params![batch_id.as_str()],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

impl WideStore for SqliteWideStore {
    fn insert(&mut self, envelope: &RecordEnvelope<'_>) -> Result<()> {
        let written_at = envelope.written_at.to_rfc3339();
        let mut values: Vec<Option<String>> = vec![
            Some(envelope.id.to_string()),
            Some(envelope.batch_id.to_string()),
            Some(envelope.idempotency_key.to_hex()),
            Some(written_at.clone()),
            Some(written_at),
        ];
        values.extend(
            envelope
                .record
                .fields()
                .map(|(_, value)| value.map(str::to_string)),
        );
        values.push(Some("{}".to_string()));

        let mut stmt = self.conn.prepare_cached(&self.insert_sql)?;
        stmt.execute(params_from_iter(values))?;
        Ok(())
    }
}

fn parse_timestamp(batch_id: &BatchId, value: Option<String>) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|text| {
            DateTime::parse_from_rfc3339(&text)
                .map(|at| at.with_timezone(&Utc))
                .map_err(|err| StoreError::CorruptStatus {
                    batch_id: batch_id.to_string(),
                    detail: format!("bad timestamp '{text}': {err}"),
                })
        })
        .transpose()
}

fn parse_count(batch_id: &BatchId, value: Option<i64>) -> Result<Option<usize>> {
    value
        .map(|count| {
            usize::try_from(count).map_err(|_| StoreError::CorruptStatus {
                batch_id: batch_id.to_string(),
                detail: format!("negative counter {count}"),
            })
        })
        .transpose()
}

/// Batch lifecycle in table `batches`.
pub struct SqliteStatusStore {
    conn: Connection,
}

type StatusRow = (
    String,
    Option<String>,
    Option<String>,
    Option<i64>,
    Option<i64>,
    Option<String>,
);

impl SqliteStatusStore {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            conn: open_connection(path, STATUS_SCHEMA)?,
        })
    }

    /// Current status; a batch with no row is `CREATED`.
    pub fn load(&self, batch_id: &BatchId) -> Result<BatchStatus> {
        let row: Option<StatusRow> = self
            .conn
            .query_row(
                "SELECT status, parsing_started_at, parsing_completed_at, records_count,
                        records_processed, error_message
                 FROM batches WHERE id = ?1",
                params![batch_id.as_str()],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                    ))
                },
            )
            .optional()?;

        let mut status = BatchStatus::new(batch_id.clone());
        let Some((state, started, finished, total, processed, error_message)) = row else {
            return Ok(status);
        };
        status.state = state.parse::<BatchState>()?;
        status.started_at = parse_timestamp(batch_id, started)?;
        status.finished_at = parse_timestamp(batch_id, finished)?;
        status.records_total = parse_count(batch_id, total)?;
        status.records_processed = parse_count(batch_id, processed)?;
        status.error_message = error_message;
        Ok(status)
    }

    fn save(&self, status: &BatchStatus) -> Result<()> {
        let to_i64 = |count: Option<usize>| count.and_then(|c| i64::try_from(c).ok());
        self.conn.execute(
            "INSERT INTO batches
             (id, status, parsing_started_at, parsing_completed_at, records_count,
              records_processed, error_message, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                status = excluded.status,
                parsing_started_at = excluded.parsing_started_at,
                parsing_completed_at = excluded.parsing_completed_at,
                records_count = excluded.records_count,
                records_processed = excluded.records_processed,
                error_message = excluded.error_message,
                updated_at = excluded.updated_at",
            params![
                status.batch_id.as_str(),
                status.state.as_str(),
                status.started_at.map(|at| at.to_rfc3339()),
                status.finished_at.map(|at| at.to_rfc3339()),
                to_i64(status.records_total),
                to_i64(status.records_processed),
                status.error_message,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn update(
        &mut self,
        batch_id: &BatchId,
        change: impl FnOnce(&mut BatchStatus) -> vcard_model::Result<()>,
    ) -> Result<()> {
        let mut status = self.load(batch_id)?;
        change(&mut status)?;
        self.save(&status)?;
        debug!(batch_id = %batch_id, state = %status.state, "batch status updated");
        Ok(())
    }
}

impl StatusTracker for SqliteStatusStore {
    fn begin(&mut self, batch_id: &BatchId) -> Result<()> {
        self.update(batch_id, |status| status.begin(Utc::now()))
    }

    fn complete(&mut self, batch_id: &BatchId, total: usize, processed: usize) -> Result<()> {
        self.update(batch_id, |status| status.complete(total, processed, Utc::now()))
    }

    fn fail(&mut self, batch_id: &BatchId, message: &str) -> Result<()> {
        self.update(batch_id, |status| status.fail(message, Utc::now()))
    }
}
