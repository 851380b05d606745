use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::topic::Topic;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StatsError {
    #[error("correct answers ({correct}) exceed total answers ({total})")]
    CorrectExceedsTotal { total: u32, correct: u32 },
}

//
// ─── TOPIC STAT ────────────────────────────────────────────────────────────────
//

/// Aggregate answer counters for one topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTopicStat")]
pub struct TopicStat {
    total: u32,
    correct: u32,
}

#[derive(Deserialize)]
struct RawTopicStat {
    total: u32,
    correct: u32,
}

impl TryFrom<RawTopicStat> for TopicStat {
    type Error = StatsError;

    fn try_from(raw: RawTopicStat) -> Result<Self, Self::Error> {
        TopicStat::new(raw.total, raw.correct)
    }
}

impl TopicStat {
    /// # Errors
    ///
    /// Returns `StatsError::CorrectExceedsTotal` if `correct > total`.
    pub fn new(total: u32, correct: u32) -> Result<Self, StatsError> {
        if correct > total {
            return Err(StatsError::CorrectExceedsTotal { total, correct });
        }
        Ok(Self { total, correct })
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn record(&mut self, correct: bool) {
        self.total = self.total.saturating_add(1);
        if correct {
            self.correct = self.correct.saturating_add(1);
        }
    }

    /// Correct ratio in `[0, 1]`, or `None` when nothing was answered yet.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(f64::from(self.correct) / f64::from(self.total))
    }

    /// Accuracy rounded to a whole percent; zero attempts report 0.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percentage(&self) -> u32 {
        self.accuracy()
            .map_or(0, |ratio| (ratio * 100.0).round() as u32)
    }
}

//
// ─── TOPIC STATS ───────────────────────────────────────────────────────────────
//

/// Per-topic counters keyed by `Topic`.
///
/// Reads go through `get`, which treats a missing entry as zero, so a topic
/// added after data was persisted needs no migration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicStats(BTreeMap<Topic, TopicStat>);

impl TopicStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One zeroed entry for every known topic.
    #[must_use]
    pub fn zeroed() -> Self {
        Self(
            Topic::ALL
                .into_iter()
                .map(|topic| (topic, TopicStat::default()))
                .collect(),
        )
    }

    #[must_use]
    pub fn get(&self, topic: Topic) -> TopicStat {
        self.0.get(&topic).copied().unwrap_or_default()
    }

    pub fn record(&mut self, topic: Topic, correct: bool) {
        self.0.entry(topic).or_default().record(correct);
    }

    pub fn insert(&mut self, topic: Topic, stat: TopicStat) {
        self.0.insert(topic, stat);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Topic, TopicStat)> + '_ {
        self.0.iter().map(|(topic, stat)| (*topic, *stat))
    }

    /// Topics with at least one recorded answer, in topic order.
    pub fn touched(&self) -> impl Iterator<Item = (Topic, TopicStat)> + '_ {
        self.iter().filter(|(_, stat)| !stat.is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Topic, TopicStat)> for TopicStats {
    fn from_iter<I: IntoIterator<Item = (Topic, TopicStat)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
