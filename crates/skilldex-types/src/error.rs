use thiserror::Error;

/// Errors from repository operations (used by trait definitions in skilldex-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Whether this error is a store-level uniqueness violation.
    ///
    /// Resolve-or-create treats a conflict as "someone else won the
    /// create race" and recovers by re-reading.
    pub fn is_conflict(&self) -> bool {
        matches!(self, RepositoryError::Conflict(_))
    }
}

/// Errors surfaced by the directory flows (resolver, relation store,
/// submission router).
///
/// Absence on a read is never an error: unknown members yield empty
/// sets, unknown skills yield a "not found" outcome.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("invalid submission: {0}")]
    InvalidSubmission(String),
}

impl From<RepositoryError> for DirectoryError {
    fn from(e: RepositoryError) -> Self {
        DirectoryError::Storage(e.to_string())
    }
}

/// Errors from outbound delivery collaborators (notifier, form
/// dismissal, profile lookup).
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("platform API error: {0}")]
    Api(String),
}
