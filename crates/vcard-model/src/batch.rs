//! Batch lifecycle and the process-level result contract.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::ids::BatchId;

/// Lifecycle state of one file-processing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchState {
    Created,
    Parsing,
    Parsed,
    Error,
}

impl BatchState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Parsing => "PARSING",
            Self::Parsed => "PARSED",
            Self::Error => "ERROR",
        }
    }

    /// `Parsed` and `Error` are never re-opened.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Parsed | Self::Error)
    }

    pub fn can_transition_to(self, next: BatchState) -> bool {
        matches!(
            (self, next),
            (Self::Created, Self::Parsing)
                | (Self::Created, Self::Error)
                | (Self::Parsing, Self::Parsed)
                | (Self::Parsing, Self::Error)
        )
    }
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BatchState {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CREATED" => Ok(Self::Created),
            "PARSING" => Ok(Self::Parsing),
            "PARSED" => Ok(Self::Parsed),
            "ERROR" => Ok(Self::Error),
            _ => Err(ModelError::UnknownState(s.to_string())),
        }
    }
}

/// Externally visible status of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStatus {
    pub batch_id: BatchId,
    pub state: BatchState,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub records_total: Option<usize>,
    pub records_processed: Option<usize>,
    pub error_message: Option<String>,
}

impl BatchStatus {
    pub fn new(batch_id: BatchId) -> Self {
        Self {
            batch_id,
            state: BatchState::Created,
            started_at: None,
            finished_at: None,
            records_total: None,
            records_processed: None,
            error_message: None,
        }
    }

    fn transition(&mut self, next: BatchState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(ModelError::IllegalTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    /// `CREATED -> PARSING`, stamping the start time.
    pub fn begin(&mut self, at: DateTime<Utc>) -> Result<()> {
        self.transition(BatchState::Parsing)?;
        self.started_at = Some(at);
        Ok(())
    }

    /// `PARSING -> PARSED` with the final counters.
    pub fn complete(&mut self, total: usize, processed: usize, at: DateTime<Utc>) -> Result<()> {
        self.transition(BatchState::Parsed)?;
        self.records_total = Some(total);
        self.records_processed = Some(processed);
        self.finished_at = Some(at);
        Ok(())
    }

    /// `* -> ERROR` with the triggering message.
    pub fn fail(&mut self, message: impl Into<String>, at: DateTime<Utc>) -> Result<()> {
        self.transition(BatchState::Error)?;
        self.error_message = Some(message.into());
        self.finished_at = Some(at);
        Ok(())
    }
}

/// Terminal output of one process run, printed as a single JSON line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records_total: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records_processed: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchReport {
    pub fn success(total: usize, processed: usize) -> Self {
        Self {
            success: true,
            records_total: Some(total),
            records_processed: Some(processed),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            records_total: None,
            records_processed: None,
            error: Some(error.into()),
        }
    }

    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        if self.success { 0 } else { 1 }
    }
}
