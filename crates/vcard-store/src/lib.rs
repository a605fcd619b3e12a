//! Record stores for normalized contacts.
//!
//! - [`contract`]: the narrow, wide, and status store traits
//! - [`sqlite`]: SQLite implementations
//! - [`memory`]: in-memory implementations with failure injection
//! - [`writer`]: the two-phase dual-store writer

#![deny(unsafe_code)]

pub mod contract;
mod error;
pub mod memory;
pub mod sqlite;
pub mod writer;

pub use contract::{NarrowRecord, NarrowStore, RecordEnvelope, StatusTracker, WideStore};
pub use error::{Result, StoreError, WriteError};
pub use memory::{MemoryNarrowStore, MemoryStatusStore, MemoryWideStore, WideRecord};
pub use sqlite::{SqliteNarrowStore, SqliteStatusStore, SqliteWideStore};
pub use writer::{CommitReceipt, DEFAULT_CHECKPOINT_INTERVAL, DualStoreWriter, StagedRecord};
