use std::sync::Arc;

use tracing::{info, warn};

use aid_core::Clock;
use aid_core::model::{Difficulty, Question, QuestionId, Topic};

use crate::ai::GenerativeService;
use crate::error::{GenerationError, ImportError};
use crate::performance::PerformanceService;

/// Imported questions are filed under this topic and difficulty.
pub const IMPORT_TOPIC: Topic = Topic::PdfExam;
pub const IMPORT_DIFFICULTY: Difficulty = Difficulty::Medium;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub added: usize,
    /// Extracted items dropped because they failed validation.
    pub rejected: usize,
}

/// Grows the custom question collection from documents and on-demand generation.
#[derive(Clone)]
pub struct QuestionImportService {
    clock: Clock,
    ai: Arc<dyn GenerativeService>,
    performance: PerformanceService,
}

impl QuestionImportService {
    #[must_use]
    pub fn new(clock: Clock, ai: Arc<dyn GenerativeService>, performance: PerformanceService) -> Self {
        Self {
            clock,
            ai,
            performance,
        }
    }

    /// Extract questions from document text and append the valid ones.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::EmptyInput` for blank text,
    /// `ImportError::NothingExtracted` when no item survives validation, and
    /// propagates generation and storage failures. The collection is unchanged
    /// on any error.
    pub async fn import_text(&self, content: &str) -> Result<ImportReport, ImportError> {
        if content.trim().is_empty() {
            return Err(ImportError::EmptyInput);
        }

        let extracted = self.ai.extract_questions(content).await?;
        let millis = self.clock.now_millis();
        let mut rejected = 0;
        let mut valid = Vec::with_capacity(extracted.len());
        for (index, item) in extracted.into_iter().enumerate() {
            match item.into_question(QuestionId::imported(millis, index), IMPORT_TOPIC, IMPORT_DIFFICULTY) {
                Ok(question) => valid.push(question),
                Err(err) => {
                    warn!(index, error = %err, "dropping extracted question");
                    rejected += 1;
                }
            }
        }
        if valid.is_empty() {
            return Err(ImportError::NothingExtracted);
        }

        let added = self.performance.add_custom_questions(valid).await?;
        info!(added, rejected, "questions imported");
        Ok(ImportReport { added, rejected })
    }

    /// Generate one question for `topic` and append it to the collection.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::DuplicateId` if a question with the generated id
    /// is already stored (nothing is written then), and propagates generation
    /// (including invalid generated content) and storage failures.
    pub async fn generate_for_topic(
        &self,
        topic: Topic,
        difficulty: Difficulty,
    ) -> Result<Question, ImportError> {
        let generated = self.ai.generate_question(topic, difficulty).await?;
        let question = generated
            .into_question(QuestionId::generated(self.clock.now_millis()), topic, difficulty)
            .map_err(GenerationError::from)?;
        let added = self
            .performance
            .add_custom_questions(vec![question.clone()])
            .await?;
        if added == 0 {
            return Err(ImportError::DuplicateId(question.id().clone()));
        }
        info!(id = %question.id(), ?topic, "question generated");
        Ok(question)
    }

    /// Remove a custom question; returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::Storage` if the store cannot be updated.
    pub async fn remove(&self, id: &QuestionId) -> Result<bool, ImportError> {
        Ok(self.performance.remove_custom_question(id).await?)
    }
}
