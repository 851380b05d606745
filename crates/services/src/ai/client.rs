use async_trait::async_trait;
use serde::Deserialize;

use aid_core::model::{Difficulty, Question, QuestionDraft, QuestionError, QuestionId, Topic};

use crate::error::GenerationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// Question content as returned by the generative service, before an id,
/// topic, and difficulty are assigned.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: i64,
    #[serde(default)]
    pub explanation: String,
}

impl GeneratedQuestion {
    /// Validate into a full `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the generated content breaks question
    /// invariants (wrong option count, answer index out of range, blanks).
    pub fn into_question(
        self,
        id: QuestionId,
        topic: Topic,
        difficulty: Difficulty,
    ) -> Result<Question, QuestionError> {
        QuestionDraft {
            id,
            text: self.text.trim().to_owned(),
            options: self.options.into_iter().map(|o| o.trim().to_owned()).collect(),
            correct_answer: usize::try_from(self.correct_answer).unwrap_or(usize::MAX),
            explanation: self.explanation.trim().to_owned(),
            topic,
            difficulty,
            image_url: None,
        }
        .validate()
    }
}

/// External text/image model used for question authoring and the assistant.
#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// False when no credential is configured; every call then fails with
    /// `GenerationError::Disabled`.
    fn is_enabled(&self) -> bool;

    async fn generate_question(
        &self,
        topic: Topic,
        difficulty: Difficulty,
    ) -> Result<GeneratedQuestion, GenerationError>;

    /// Returns an image reference (a `data:` URL) illustrating the scenario.
    async fn generate_image(&self, question_text: &str) -> Result<String, GenerationError>;

    async fn extract_questions(
        &self,
        content: &str,
    ) -> Result<Vec<GeneratedQuestion>, GenerationError>;

    async fn chat(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(correct_answer: i64) -> GeneratedQuestion {
        GeneratedQuestion {
            text: " Yanıkta ilk ne yapılır? ".into(),
            options: vec!["Su".into(), "Buz".into(), "Yağ".into(), "Diş macunu".into()],
            correct_answer,
            explanation: "Soğuk su uygulanır.".into(),
        }
    }

    #[test]
    fn into_question_assigns_metadata_and_trims() {
        let question = generated(0)
            .into_question(QuestionId::generated(42), Topic::Burns, Difficulty::Hard)
            .unwrap();
        assert_eq!(question.id().as_str(), "ai-42");
        assert_eq!(question.text(), "Yanıkta ilk ne yapılır?");
        assert_eq!(question.topic(), Topic::Burns);
        assert_eq!(question.difficulty(), Difficulty::Hard);
    }

    #[test]
    fn negative_answer_index_is_rejected() {
        let err = generated(-1)
            .into_question(QuestionId::generated(1), Topic::Burns, Difficulty::Easy)
            .unwrap_err();
        assert!(matches!(err, QuestionError::CorrectAnswerOutOfRange { .. }));
    }

    #[test]
    fn decodes_camel_case_payload() {
        let raw = r#"{"text":"Soru","options":["a","b","c","d"],"correctAnswer":2}"#;
        let parsed: GeneratedQuestion = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.correct_answer, 2);
        assert!(parsed.explanation.is_empty());
    }
}
