use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::stats::TopicStats;
use crate::model::topic::Topic;

/// Share of correct answers (in percent) that counts as a passed session.
pub const SUCCESS_PERCENTAGE: u32 = 70;

/// Outcome of answering one question within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub question_id: QuestionId,
    pub topic: Topic,
    pub correct: bool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("answered ({answered}) exceeds session length ({total})")]
    TooManyOutcomes { answered: usize, total: usize },
}

/// Aggregate result of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    correct_count: u32,
    total_questions: u32,
    answered: u32,
    breakdown: TopicStats,
}

impl SessionSummary {
    /// Build a summary from the session length and its recorded outcomes.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::TooManyOutcomes` if more outcomes than
    /// questions are supplied.
    pub fn from_outcomes(
        total_questions: usize,
        outcomes: &[AnswerOutcome],
    ) -> Result<Self, SessionSummaryError> {
        if outcomes.len() > total_questions {
            return Err(SessionSummaryError::TooManyOutcomes {
                answered: outcomes.len(),
                total: total_questions,
            });
        }

        let mut breakdown = TopicStats::new();
        let mut correct_count = 0_u32;
        for outcome in outcomes {
            breakdown.record(outcome.topic, outcome.correct);
            if outcome.correct {
                correct_count = correct_count.saturating_add(1);
            }
        }

        Ok(Self {
            correct_count,
            total_questions: saturating_u32(total_questions),
            answered: saturating_u32(outcomes.len()),
            breakdown,
        })
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    /// Per-topic counts for this session only.
    #[must_use]
    pub fn breakdown(&self) -> &TopicStats {
        &self.breakdown
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percentage(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        let ratio = f64::from(self.correct_count) / f64::from(self.total_questions);
        (ratio * 100.0).round() as u32
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.percentage() >= SUCCESS_PERCENTAGE
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
