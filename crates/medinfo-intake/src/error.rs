use thiserror::Error;

use medinfo_analysis::error::AnalysisError;
use medinfo_core::error::CoreError;
use medinfo_db::error::DbError;
use medinfo_storage::error::StorageError;

#[derive(Debug, Error)]
pub enum IntakeError {
    /// Rejected before any I/O: missing or oversized file, disallowed type,
    /// missing or malformed fields.
    #[error("{0}")]
    Invalid(String),

    #[error("doctor not found")]
    DoctorNotFound(String),

    #[error("failed to upload file: {0}")]
    Upload(#[source] StorageError),

    #[error("failed to analyze prescription: {0}")]
    Analysis(#[source] AnalysisError),

    #[error("failed to build items from analysis: {0}")]
    Materialize(#[source] CoreError),

    #[error("failed to look up doctor: {0}")]
    DoctorLookup(#[source] DbError),

    #[error("failed to save prescription: {0}")]
    SavePrescription(#[source] DbError),

    /// The prescription row exists but its items could not be written.
    #[error("prescription {prescription_id} saved but its items failed: {source}")]
    SaveItems {
        prescription_id: i64,
        #[source]
        source: DbError,
    },

    #[error("intake task failed: {0}")]
    Task(String),
}

impl IntakeError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        IntakeError::Invalid(msg.into())
    }
}
