//! Error types for the contact data model.

use thiserror::Error;

use crate::batch::BatchState;

/// Errors raised by model invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A batch status was asked to move along an edge the lifecycle forbids.
    #[error("illegal batch transition: {from} -> {to}")]
    IllegalTransition { from: BatchState, to: BatchState },

    /// A string did not name any canonical field.
    #[error("unknown canonical field: {0}")]
    UnknownField(String),

    /// A string did not name any batch state.
    #[error("unknown batch state: {0}")]
    UnknownState(String),

    /// Batch identifiers must be non-blank.
    #[error("batch id must not be empty")]
    EmptyBatchId,
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::IllegalTransition {
            from: BatchState::Parsed,
            to: BatchState::Parsing,
        };
        assert_eq!(err.to_string(), "illegal batch transition: PARSED -> PARSING");
    }
}
