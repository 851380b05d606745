use std::sync::Arc;

use aid_core::WeaknessAnalyzer;
use aid_core::model::{AnswerOutcome, Question, QuestionId, Theme, Topic, UserState};
use storage::repository::{StorageError, UserStateRepository};

/// Loads, updates, and persists the performance store.
///
/// Every mutation reads the current state, applies the change, and writes the
/// whole state back.
#[derive(Clone)]
pub struct PerformanceService {
    repo: Arc<dyn UserStateRepository>,
    analyzer: WeaknessAnalyzer,
}

impl PerformanceService {
    #[must_use]
    pub fn new(repo: Arc<dyn UserStateRepository>) -> Self {
        Self {
            repo,
            analyzer: WeaknessAnalyzer::default(),
        }
    }

    #[must_use]
    pub fn with_analyzer(mut self, analyzer: WeaknessAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Load persisted state (or a fresh zeroed state on first run).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage or decode failures.
    pub async fn load(&self) -> Result<UserState, StorageError> {
        Ok(self.repo.load_user_state().await?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the state cannot be written.
    pub async fn save(&self, state: &UserState) -> Result<(), StorageError> {
        self.repo.save_user_state(state).await
    }

    /// Fold one completed session into the store and persist it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if loading or saving fails; nothing is written then.
    pub async fn record_session(
        &self,
        outcomes: &[AnswerOutcome],
    ) -> Result<UserState, StorageError> {
        let mut state = self.load().await?;
        state.record_session(outcomes);
        self.save(&state).await?;
        Ok(state)
    }

    /// Topics below the mastery threshold across all sessions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage or decode failures.
    pub async fn weak_topics(&self) -> Result<Vec<Topic>, StorageError> {
        let state = self.load().await?;
        Ok(self.analyzer.weak_topics(state.topic_stats()))
    }

    /// # Errors
    ///
    /// Returns `StorageError` if loading or saving fails.
    pub async fn set_theme(&self, theme: Theme) -> Result<UserState, StorageError> {
        let mut state = self.load().await?;
        state.set_theme(theme);
        self.save(&state).await?;
        Ok(state)
    }

    /// Append questions to the custom collection; returns how many were new.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if loading or saving fails.
    pub async fn add_custom_questions(
        &self,
        questions: Vec<Question>,
    ) -> Result<usize, StorageError> {
        let mut state = self.load().await?;
        let added = state.add_custom_questions(questions);
        if added > 0 {
            self.save(&state).await?;
        }
        Ok(added)
    }

    /// # Errors
    ///
    /// Returns `StorageError` if loading or saving fails.
    pub async fn remove_custom_question(&self, id: &QuestionId) -> Result<bool, StorageError> {
        let mut state = self.load().await?;
        let removed = state.remove_custom_question(id);
        if removed {
            self.save(&state).await?;
        }
        Ok(removed)
    }
}
