use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::topic::{Difficulty, Topic};

/// Every question offers exactly this many answer options.
pub const OPTION_COUNT: usize = 4;

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Unvalidated question as it arrives from the embedded bank, storage, or the
/// import pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default)]
    pub explanation: String,
    pub topic: Topic,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl QuestionDraft {
    /// Validate the draft into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the id or text is blank, the option count is
    /// not `OPTION_COUNT`, an option is blank, or `correct_answer` does not
    /// index into the options.
    pub fn validate(self) -> Result<Question, QuestionError> {
        if self.id.is_blank() {
            return Err(QuestionError::EmptyId);
        }
        if self.text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if self.options.len() != OPTION_COUNT {
            return Err(QuestionError::OptionCount {
                len: self.options.len(),
            });
        }
        if let Some(index) = self.options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { index });
        }
        if self.correct_answer >= self.options.len() {
            return Err(QuestionError::CorrectAnswerOutOfRange {
                index: self.correct_answer,
                len: self.options.len(),
            });
        }

        let image_url = self
            .image_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        Ok(Question {
            id: self.id,
            text: self.text,
            options: self.options,
            correct_answer: self.correct_answer,
            explanation: self.explanation,
            topic: self.topic,
            difficulty: self.difficulty,
            image_url,
        })
    }
}

/// Immutable multiple-choice question.
///
/// Invariant: `correct_answer < options.len()` and `options.len() == OPTION_COUNT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "QuestionDraft")]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_answer: usize,
    explanation: String,
    topic: Topic,
    difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
}

impl TryFrom<QuestionDraft> for Question {
    type Error = QuestionError;

    fn try_from(draft: QuestionDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl Question {
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn topic(&self) -> Topic {
        self.topic
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    #[must_use]
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_answer
    }

    /// Copy of this question carrying an illustrative image.
    #[must_use]
    pub fn with_image_url(&self, url: impl Into<String>) -> Self {
        Self {
            image_url: Some(url.into()),
            ..self.clone()
        }
    }
}

//
// ─── QUESTION VALIDATION ERRORS ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question text cannot be empty")]
    EmptyText,

    #[error("expected {OPTION_COUNT} options, got {len}")]
    OptionCount { len: usize },

    #[error("option {index} is empty")]
    EmptyOption { index: usize },

    #[error("correct answer {index} is out of range for {len} options")]
    CorrectAnswerOutOfRange { index: usize, len: usize },
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> QuestionDraft {
        QuestionDraft {
            id: QuestionId::new("cpr_1"),
            text: "Kalp masajı hızı nedir?".into(),
            options: vec!["60".into(), "80".into(), "100-120".into(), "140".into()],
            correct_answer: 2,
            explanation: "Dakikada 100-120 bası.".into(),
            topic: Topic::Cpr,
            difficulty: Difficulty::Easy,
            image_url: None,
        }
    }

    #[test]
    fn valid_draft_validates() {
        let q = draft().validate().unwrap();
        assert_eq!(q.id().as_str(), "cpr_1");
        assert_eq!(q.topic(), Topic::Cpr);
        assert!(q.is_correct(2));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn rejects_out_of_range_answer() {
        let mut d = draft();
        d.correct_answer = 4;
        assert_eq!(
            d.validate().unwrap_err(),
            QuestionError::CorrectAnswerOutOfRange { index: 4, len: 4 }
        );
    }

    #[test]
    fn rejects_wrong_option_count() {
        let mut d = draft();
        d.options.pop();
        assert_eq!(d.validate().unwrap_err(), QuestionError::OptionCount { len: 3 });
    }

    #[test]
    fn rejects_blank_text_and_options() {
        let mut d = draft();
        d.text = "  ".into();
        assert_eq!(d.validate().unwrap_err(), QuestionError::EmptyText);

        let mut d = draft();
        d.options[1] = " ".into();
        assert_eq!(d.validate().unwrap_err(), QuestionError::EmptyOption { index: 1 });
    }

    #[test]
    fn blank_image_url_normalizes_to_none() {
        let mut d = draft();
        d.image_url = Some("   ".into());
        assert_eq!(d.validate().unwrap().image_url(), None);
    }

    #[test]
    fn json_uses_camel_case_and_omits_missing_image() {
        let q = draft().validate().unwrap();
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["correctAnswer"], 2);
        assert_eq!(json["topic"], "CPR");
        assert!(json.get("imageUrl").is_none());

        let back: Question = serde_json::from_value(json).unwrap();
        assert_eq!(back, q);
    }

    #[test]
    fn deserialization_runs_validation() {
        let raw = r#"{"id":"x","text":"T","options":["a","b","c","d"],
            "correctAnswer":7,"explanation":"","topic":"BURNS","difficulty":"EASY"}"#;
        assert!(serde_json::from_str::<Question>(raw).is_err());
    }

    #[test]
    fn with_image_url_leaves_original_untouched() {
        let q = draft().validate().unwrap();
        let shown = q.with_image_url("data:image/png;base64,AAAA");
        assert_eq!(q.image_url(), None);
        assert_eq!(shown.image_url(), Some("data:image/png;base64,AAAA"));
        assert_eq!(shown.id(), q.id());
    }
}
