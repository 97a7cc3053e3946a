//! Diff errors.

use auditrail_types::EntryId;
use thiserror::Error;

/// Fatal conditions of a diff. Each one must abort the surrounding commit:
/// skipping the mutation would leave a hole in the audit trail.
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("unrecognized entity state '{state}' on {table}")]
    UnrecognizedState { state: String, table: String },

    #[error("owned reference '{property}' of {table} revisits {entry}")]
    OwnershipCycle {
        table: String,
        property: String,
        entry: EntryId,
    },

    #[error("failed to encode change values: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for diff operations.
pub type Result<T> = std::result::Result<T, DiffError>;
