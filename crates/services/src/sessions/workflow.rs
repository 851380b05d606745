use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info, warn};

use aid_core::{Clock, WeaknessAnalyzer};

use super::plan::{SessionBuilder, SessionMode};
use super::service::{Advance, AnswerFeedback, CompletedSession, QuizSession};
use super::state::{SessionReport, SessionState};
use crate::error::{FinishError, SessionError};
use crate::performance::PerformanceService;
use crate::question_bank::QuestionBank;

type SharedRng = Arc<Mutex<dyn RngCore + Send>>;

/// Result of moving a running session forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceResult {
    Moved { index: usize },
    Finished(SessionReport),
}

/// Orchestrates session start, answering, and the single persisted finish.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    bank: QuestionBank,
    performance: PerformanceService,
    analyzer: WeaknessAnalyzer,
    builder: SessionBuilder,
    rng: SharedRng,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(clock: Clock, bank: QuestionBank, performance: PerformanceService) -> Self {
        Self {
            clock,
            bank,
            performance,
            analyzer: WeaknessAnalyzer::default(),
            builder: SessionBuilder::new(),
            rng: Arc::new(Mutex::new(StdRng::from_os_rng())),
        }
    }

    /// Replace the shuffle source, e.g. with a seeded RNG in tests.
    #[must_use]
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Arc::new(Mutex::new(rng));
        self
    }

    #[must_use]
    pub fn with_builder(mut self, builder: SessionBuilder) -> Self {
        self.builder = builder;
        self
    }

    #[must_use]
    pub fn with_analyzer(mut self, analyzer: WeaknessAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Build a fresh session for `mode` from the bank and the stored state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoQuestionsAvailable` when the mode has no
    /// candidates, or `SessionError::Storage` if the store cannot be read.
    pub async fn start_session(&self, mode: SessionMode) -> Result<QuizSession, SessionError> {
        let state = self.performance.load().await?;
        let weak = match mode {
            SessionMode::Weakness => self.analyzer.weak_topics(state.topic_stats()),
            _ => Vec::new(),
        };
        let candidates = self
            .bank
            .query(state.custom_questions(), &mode.filter(&weak));

        let plan = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            self.builder.build(candidates, &mut *rng)
        };
        let plan = match plan {
            Ok(plan) => plan,
            Err(err) => {
                info!(?mode, "no questions available for session");
                return Err(err);
            }
        };

        info!(
            ?mode,
            questions = plan.questions.len(),
            candidates = plan.candidates,
            "session started"
        );
        QuizSession::new(mode, plan.questions, self.clock.now())
    }

    /// Start a session into `state`, replacing whatever was there.
    ///
    /// On failure `state` is left untouched.
    ///
    /// # Errors
    ///
    /// Propagates `start_session` errors.
    pub async fn start(&self, state: &mut SessionState, mode: SessionMode) -> Result<(), SessionError> {
        let session = self.start_session(mode).await?;
        if state.is_in_progress() {
            debug!("discarding unfinished session");
        }
        *state = SessionState::InProgress(session);
        Ok(())
    }

    /// # Errors
    ///
    /// See [`SessionState::record_answer`].
    pub fn answer(
        &self,
        state: &mut SessionState,
        selected: usize,
    ) -> Result<AnswerFeedback, SessionError> {
        let feedback = state.record_answer(selected)?;
        debug!(selected, correct = feedback.correct, "answer recorded");
        Ok(feedback)
    }

    /// Move to the next question, finishing the session after the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Unanswered` (state unchanged) if the current
    /// question has no answer, `NotStarted`/`Finished` outside a running
    /// session, and the store error if finishing fails. In that case `state`
    /// becomes `Unsaved` and the next call retries the write.
    pub async fn advance(&self, state: &mut SessionState) -> Result<AdvanceResult, SessionError> {
        match std::mem::take(state) {
            SessionState::NotStarted => Err(SessionError::NotStarted),
            SessionState::Finished(report) => {
                *state = SessionState::Finished(report);
                Err(SessionError::Finished)
            }
            SessionState::Unsaved(completed) => self.complete(state, completed).await,
            SessionState::InProgress(session) => match session.advance() {
                Advance::Blocked(session) => {
                    *state = SessionState::InProgress(session);
                    Err(SessionError::Unanswered)
                }
                Advance::Next(session) => {
                    let index = session.index();
                    *state = SessionState::InProgress(session);
                    Ok(AdvanceResult::Moved { index })
                }
                Advance::Done(completed) => self.complete(state, completed).await,
            },
        }
    }

    async fn complete(
        &self,
        state: &mut SessionState,
        completed: CompletedSession,
    ) -> Result<AdvanceResult, SessionError> {
        match self.finish(completed).await {
            Ok(report) => {
                *state = SessionState::Finished(report.clone());
                Ok(AdvanceResult::Finished(report))
            }
            Err(err) => {
                warn!(error = %err.error(), "failed to record finished session");
                let (completed, source) = err.into_parts();
                *state = SessionState::Unsaved(completed);
                Err(source)
            }
        }
    }

    /// Fold a completed session into the performance store and build its report.
    ///
    /// # Errors
    ///
    /// Returns `FinishError` carrying the session back if the store cannot be
    /// updated; nothing was recorded and it can be finished again.
    pub async fn finish(&self, completed: CompletedSession) -> Result<SessionReport, FinishError> {
        let summary = match completed.summary() {
            Ok(summary) => summary,
            Err(err) => return Err(FinishError::new(completed, err)),
        };
        let weak_topics = self.analyzer.session_weak_topics(completed.outcomes());
        if let Err(err) = self.performance.record_session(completed.outcomes()).await {
            return Err(FinishError::new(completed, err));
        }

        info!(
            mode = ?completed.mode(),
            correct = summary.correct_count(),
            total = summary.total_questions(),
            weak = weak_topics.len(),
            "session finished"
        );
        Ok(SessionReport {
            mode: completed.mode(),
            summary,
            weak_topics,
        })
    }

    /// Drop a running (or unsaved) session without touching the store.
    ///
    /// Returns `false` (and leaves `state` as is) when nothing was running.
    pub fn abandon(&self, state: &mut SessionState) -> bool {
        match std::mem::take(state) {
            SessionState::InProgress(session) => {
                info!(
                    answered = session.outcomes().len(),
                    total = session.total_questions(),
                    "session abandoned"
                );
                true
            }
            SessionState::Unsaved(completed) => {
                warn!(
                    answered = completed.outcomes().len(),
                    "unsaved session discarded"
                );
                true
            }
            other => {
                *state = other;
                false
            }
        }
    }
}
