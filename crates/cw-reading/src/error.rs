//! Error types for the reading engine.

use thiserror::Error;

use crate::oracle::CollaboratorError;

/// Result type for reading operations.
pub type ReadingResult<T> = Result<T, ReadingError>;

/// Errors that can occur outside the session flow itself.
///
/// Blocked session triggers are not errors; see [`crate::session::Ignored`].
#[derive(Debug, Error)]
pub enum ReadingError {
    /// Catalog or spread configuration error.
    #[error(transparent)]
    Core(#[from] cw_core::CoreError),

    /// Storage I/O failed.
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    /// Journal (de)serialization failed.
    #[error("journal encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// A collaborator call failed.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    /// No journal entry carries the given id.
    #[error("journal entry not found: {0}")]
    EntryNotFound(String),

    /// No deck theme carries the given id.
    #[error("unknown theme: \"{0}\"")]
    UnknownTheme(String),

    /// A custom card back could not be installed.
    #[error("invalid card back image: {0}")]
    InvalidImage(String),
}
