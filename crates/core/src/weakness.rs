//! Weak-topic detection over aggregate or single-session accuracy.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::{AnswerOutcome, Topic, TopicStat, TopicStats};

/// Aggregate accuracy below this marks a topic for weakness training.
pub const MASTERY_THRESHOLD: f64 = 0.6;

/// Session-local accuracy below this is surfaced as end-of-session feedback.
pub const SESSION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum WeaknessError {
    #[error("threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f64),
}

/// Derives weak topics from accuracy ratios.
///
/// A topic with zero attempts is never weak. Output is ordered by
/// `Topic::ALL` and contains no duplicates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaknessAnalyzer {
    mastery_threshold: f64,
    session_threshold: f64,
}

impl Default for WeaknessAnalyzer {
    fn default() -> Self {
        Self {
            mastery_threshold: MASTERY_THRESHOLD,
            session_threshold: SESSION_THRESHOLD,
        }
    }
}

impl WeaknessAnalyzer {
    /// # Errors
    ///
    /// Returns `WeaknessError::InvalidThreshold` if either threshold is not
    /// a finite value in `(0, 1]`.
    pub fn new(mastery_threshold: f64, session_threshold: f64) -> Result<Self, WeaknessError> {
        validate_threshold(mastery_threshold)?;
        validate_threshold(session_threshold)?;
        Ok(Self {
            mastery_threshold,
            session_threshold,
        })
    }

    #[must_use]
    pub fn mastery_threshold(&self) -> f64 {
        self.mastery_threshold
    }

    #[must_use]
    pub fn session_threshold(&self) -> f64 {
        self.session_threshold
    }

    /// Topics whose aggregate accuracy falls below the mastery threshold.
    #[must_use]
    pub fn weak_topics(&self, stats: &TopicStats) -> Vec<Topic> {
        below(stats.iter(), self.mastery_threshold)
    }

    /// Topics whose accuracy within one session falls below the session threshold.
    #[must_use]
    pub fn session_weak_topics(&self, outcomes: &[AnswerOutcome]) -> Vec<Topic> {
        let mut grouped: BTreeMap<Topic, TopicStat> = BTreeMap::new();
        for outcome in outcomes {
            grouped.entry(outcome.topic).or_default().record(outcome.correct);
        }
        below(grouped.into_iter(), self.session_threshold)
    }
}

fn below(stats: impl Iterator<Item = (Topic, TopicStat)>, threshold: f64) -> Vec<Topic> {
    let mut weak: Vec<Topic> = stats
        .filter(|(_, stat)| stat.accuracy().is_some_and(|ratio| ratio < threshold))
        .map(|(topic, _)| topic)
        .collect();
    weak.sort();
    weak.dedup();
    weak
}

fn validate_threshold(value: f64) -> Result<(), WeaknessError> {
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(WeaknessError::InvalidThreshold(value));
    }
    Ok(())
}
