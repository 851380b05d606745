use aid_core::model::{SessionSummary, Topic};

use super::plan::SessionMode;
use super::service::{AnswerFeedback, CompletedSession, QuizSession};
use crate::error::SessionError;

/// Outcome of a finished session, shown on the result screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub mode: SessionMode,
    pub summary: SessionSummary,
    /// Topics answered below the session threshold in this session only.
    pub weak_topics: Vec<Topic>,
}

/// Where the caller-held session currently is.
#[derive(Debug, Default)]
pub enum SessionState {
    #[default]
    NotStarted,
    InProgress(QuizSession),
    /// Every question answered but the store write failed; advancing again
    /// retries it.
    Unsaved(CompletedSession),
    Finished(SessionReport),
}

impl SessionState {
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        matches!(self, SessionState::InProgress(_))
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        match self {
            SessionState::InProgress(session) => Some(session),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unsaved(&self) -> bool {
        matches!(self, SessionState::Unsaved(_))
    }

    #[must_use]
    pub fn report(&self) -> Option<&SessionReport> {
        match self {
            SessionState::Finished(report) => Some(report),
            _ => None,
        }
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` or `SessionError::Finished` outside a
    /// running session, and propagates `QuizSession::record_answer` errors.
    pub fn record_answer(&mut self, selected: usize) -> Result<AnswerFeedback, SessionError> {
        match self {
            SessionState::NotStarted => Err(SessionError::NotStarted),
            SessionState::Unsaved(_) | SessionState::Finished(_) => Err(SessionError::Finished),
            SessionState::InProgress(session) => session.record_answer(selected),
        }
    }
}
