//! Shared error types for the services crate.

use thiserror::Error;

use aid_core::bank::BankError;
use aid_core::model::{QuestionError, QuestionId, SessionSummaryError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

use crate::sessions::CompletedSession;

/// Errors emitted by the generative content service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("generative service is not configured")]
    Disabled,
    #[error("generative service returned an empty response")]
    EmptyResponse,
    #[error("generative service request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("could not decode generated content: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    InvalidQuestion(#[from] QuestionError),
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for this session")]
    NoQuestionsAvailable,
    #[error("no session in progress")]
    NotStarted,
    #[error("session already finished")]
    Finished,
    #[error("current question already answered")]
    AlreadyAnswered,
    #[error("current question has not been answered yet")]
    Unanswered,
    #[error("option {index} is out of range for {len} options")]
    InvalidOption { index: usize, len: usize },
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A completed session that could not be recorded, handed back for a retry.
#[derive(Debug, Error)]
#[error("could not record finished session: {source}")]
pub struct FinishError {
    completed: CompletedSession,
    source: SessionError,
}

impl FinishError {
    pub(crate) fn new(completed: CompletedSession, source: impl Into<SessionError>) -> Self {
        Self {
            completed,
            source: source.into(),
        }
    }

    #[must_use]
    pub fn error(&self) -> &SessionError {
        &self.source
    }

    #[must_use]
    pub fn into_parts(self) -> (CompletedSession, SessionError) {
        (self.completed, self.source)
    }
}

/// Errors emitted by `QuestionImportService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImportError {
    #[error("nothing to import")]
    EmptyInput,
    #[error("no valid questions could be extracted")]
    NothingExtracted,
    #[error("a question with id {0} already exists")]
    DuplicateId(QuestionId),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Bank(#[from] BankError),
}
