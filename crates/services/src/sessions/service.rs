use chrono::{DateTime, Utc};

use aid_core::model::{AnswerOutcome, Question, SessionSummary};

use super::plan::SessionMode;
use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── ANSWER FEEDBACK ───────────────────────────────────────────────────────────
//

/// What the learner sees right after committing an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub selected: usize,
    pub correct: bool,
    pub correct_answer: usize,
    pub explanation: String,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// An in-progress quiz over a fixed, ordered list of questions.
///
/// Each question accepts exactly one answer. Moving on requires the current
/// question to be answered, and moving past the last question consumes the
/// session into a [`CompletedSession`].
///
/// Not `Clone`: a copy could be advanced a second time into another
/// completed session.
#[derive(Debug)]
pub struct QuizSession {
    mode: SessionMode,
    questions: Vec<Question>,
    current: usize,
    outcomes: Vec<AnswerOutcome>,
    selections: Vec<Option<usize>>,
    started_at: DateTime<Utc>,
}

impl QuizSession {
    /// Create a session over `questions` in the given order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoQuestionsAvailable` if `questions` is empty.
    pub fn new(
        mode: SessionMode,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestionsAvailable);
        }
        let selections = vec![None; questions.len()];
        Ok(Self {
            mode,
            questions,
            current: 0,
            outcomes: Vec::new(),
            selections,
            started_at,
        })
    }

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn outcomes(&self) -> &[AnswerOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    /// The option committed for the current question, if any.
    #[must_use]
    pub fn current_selection(&self) -> Option<usize> {
        self.selections[self.current]
    }

    #[must_use]
    pub fn is_current_answered(&self) -> bool {
        self.current_selection().is_some()
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    /// Number of correct answers so far.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.correct).count()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            index: self.current,
            total: self.questions.len(),
            answered: self.outcomes.len(),
            remaining: self.questions.len() - self.current,
        }
    }

    /// Commit `selected` as the answer to the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOption` for an out-of-range option and
    /// `SessionError::AlreadyAnswered` if the current question already has an
    /// answer. Neither changes the session.
    pub fn record_answer(&mut self, selected: usize) -> Result<AnswerFeedback, SessionError> {
        let question = &self.questions[self.current];
        let len = question.options().len();
        if selected >= len {
            return Err(SessionError::InvalidOption {
                index: selected,
                len,
            });
        }
        if self.selections[self.current].is_some() {
            return Err(SessionError::AlreadyAnswered);
        }

        let correct = question.is_correct(selected);
        let feedback = AnswerFeedback {
            selected,
            correct,
            correct_answer: question.correct_answer(),
            explanation: question.explanation().to_owned(),
        };
        self.outcomes.push(AnswerOutcome {
            question_id: question.id().clone(),
            topic: question.topic(),
            correct,
        });
        self.selections[self.current] = Some(selected);
        Ok(feedback)
    }

    /// Move to the next question, or complete the session after the last one.
    #[must_use]
    pub fn advance(mut self) -> Advance {
        if !self.is_current_answered() {
            return Advance::Blocked(self);
        }
        if self.is_last() {
            return Advance::Done(CompletedSession {
                mode: self.mode,
                total_questions: self.questions.len(),
                outcomes: self.outcomes,
                started_at: self.started_at,
            });
        }
        self.current += 1;
        Advance::Next(self)
    }
}

/// Result of [`QuizSession::advance`].
#[derive(Debug)]
pub enum Advance {
    Next(QuizSession),
    /// The current question has no answer yet; the session is unchanged.
    Blocked(QuizSession),
    Done(CompletedSession),
}

//
// ─── COMPLETED SESSION ─────────────────────────────────────────────────────────
//

/// A session whose every question has been answered, ready to be folded into
/// the performance store exactly once.
///
/// Only [`QuizSession::advance`] produces one, and
/// [`SessionLoopService::finish`](super::SessionLoopService::finish) consumes
/// it by value. It cannot be duplicated:
///
/// ```compile_fail
/// fn duplicate(done: services::CompletedSession) -> (services::CompletedSession, services::CompletedSession) {
///     (done.clone(), done)
/// }
/// ```
///
/// ```compile_fail
/// fn duplicate(session: &services::QuizSession) -> services::QuizSession {
///     session.clone()
/// }
/// ```
#[derive(Debug)]
pub struct CompletedSession {
    mode: SessionMode,
    total_questions: usize,
    outcomes: Vec<AnswerOutcome>,
    started_at: DateTime<Utc>,
}

impl CompletedSession {
    #[must_use]
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    #[must_use]
    pub fn outcomes(&self) -> &[AnswerOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// # Errors
    ///
    /// Returns `SessionError::Summary` if the outcomes exceed the question count.
    pub fn summary(&self) -> Result<SessionSummary, SessionError> {
        Ok(SessionSummary::from_outcomes(
            self.total_questions,
            &self.outcomes,
        )?)
    }
}
