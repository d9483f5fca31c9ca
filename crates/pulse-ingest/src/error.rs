use jiff::civil::Date;
use thiserror::Error;

use pulse_core::error::CoreError;
use pulse_storage::error::StorageError;

/// Ingestion errors surfaced to the caller.
///
/// Advisory failures never appear here: they degrade inside the service.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// A report for this subject, cadence, and calendar day already
    /// exists and the cadence's policy is reject-not-merge. The date
    /// lets the caller offer view/edit instead.
    #[error("a report already exists for {date}")]
    Duplicate { date: Date },

    /// The persistence layer failed; the report was not dropped silently
    /// and the caller should retry.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Concurrent writers starved the conditional-update loop. Retryable.
    #[error("conflicting concurrent updates after {attempts} attempts")]
    Conflict { attempts: usize },
}

impl IngestError {
    /// Whether the caller may safely retry the identical submission.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            IngestError::Storage(_) | IngestError::Conflict { .. }
        )
    }
}

impl From<CoreError> for IngestError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidInput { field, reason } => {
                IngestError::InvalidInput { field, reason }
            }
            CoreError::DuplicateEntry { date } => IngestError::Duplicate { date },
            CoreError::Serialization(e) => IngestError::InvalidInput {
                field: "payload".to_string(),
                reason: e.to_string(),
            },
            CoreError::InvalidUuid(e) => IngestError::InvalidInput {
                field: "id".to_string(),
                reason: e.to_string(),
            },
        }
    }
}
