use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::Question;
use crate::model::session::AnswerOutcome;
use crate::model::stats::{TopicStat, TopicStats};

//
// ─── THEME ─────────────────────────────────────────────────────────────────────
//

/// Display preference persisted alongside the performance data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown theme: {0}")]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            _ => Err(UnknownTheme(s.to_string())),
        }
    }
}

//
// ─── USER STATE ────────────────────────────────────────────────────────────────
//

/// Everything persisted for the single local user: aggregate performance
/// counters, the imported question collection, and display preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserState {
    #[serde(default)]
    total_quizzes: u32,
    #[serde(default)]
    total_questions_answered: u32,
    #[serde(default = "TopicStats::zeroed")]
    topic_stats: TopicStats,
    #[serde(default)]
    theme: Theme,
    #[serde(default)]
    custom_questions: Vec<Question>,
}

impl Default for UserState {
    fn default() -> Self {
        Self::new()
    }
}

impl UserState {
    /// First-run state with a zeroed counter for every topic.
    #[must_use]
    pub fn new() -> Self {
        Self {
            total_quizzes: 0,
            total_questions_answered: 0,
            topic_stats: TopicStats::zeroed(),
            theme: Theme::default(),
            custom_questions: Vec::new(),
        }
    }

    #[must_use]
    pub fn total_quizzes(&self) -> u32 {
        self.total_quizzes
    }

    #[must_use]
    pub fn total_questions_answered(&self) -> u32 {
        self.total_questions_answered
    }

    #[must_use]
    pub fn topic_stats(&self) -> &TopicStats {
        &self.topic_stats
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    #[must_use]
    pub fn custom_questions(&self) -> &[Question] {
        &self.custom_questions
    }

    #[must_use]
    pub fn has_custom_questions(&self) -> bool {
        !self.custom_questions.is_empty()
    }

    /// Fold one completed session into the aggregate counters.
    pub fn record_session(&mut self, outcomes: &[AnswerOutcome]) {
        for outcome in outcomes {
            self.topic_stats.record(outcome.topic, outcome.correct);
        }
        self.total_quizzes = self.total_quizzes.saturating_add(1);
        let answered = u32::try_from(outcomes.len()).unwrap_or(u32::MAX);
        self.total_questions_answered = self.total_questions_answered.saturating_add(answered);
    }

    /// Append imported questions, skipping ids already in the collection.
    ///
    /// Returns how many questions were added.
    pub fn add_custom_questions(&mut self, questions: impl IntoIterator<Item = Question>) -> usize {
        let mut known: HashSet<QuestionId> =
            self.custom_questions.iter().map(|q| q.id().clone()).collect();
        let before = self.custom_questions.len();
        for question in questions {
            if known.insert(question.id().clone()) {
                self.custom_questions.push(question);
            }
        }
        self.custom_questions.len() - before
    }

    pub fn remove_custom_question(&mut self, id: &QuestionId) -> bool {
        let before = self.custom_questions.len();
        self.custom_questions.retain(|q| q.id() != id);
        self.custom_questions.len() != before
    }

    /// Accuracy across every topic, `None` before the first answer.
    #[must_use]
    pub fn overall_accuracy(&self) -> Option<f64> {
        let mut overall = TopicStat::default();
        for (_, stat) in self.topic_stats.iter() {
            // Counters are validated per topic, so the sum keeps correct <= total.
            overall = TopicStat::new(
                overall.total().saturating_add(stat.total()),
                overall.correct().saturating_add(stat.correct()),
            )
            .unwrap_or(overall);
        }
        overall.accuracy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::question::QuestionDraft;
    use crate::model::topic::{Difficulty, Topic};

    fn question(id: &str, topic: Topic) -> Question {
        QuestionDraft {
            id: QuestionId::new(id),
            text: format!("Soru {id}"),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_answer: 0,
            explanation: String::new(),
            topic,
            difficulty: Difficulty::Medium,
            image_url: None,
        }
        .validate()
        .unwrap()
    }

    fn outcome(id: &str, topic: Topic, correct: bool) -> AnswerOutcome {
        AnswerOutcome {
            question_id: QuestionId::new(id),
            topic,
            correct,
        }
    }

    #[test]
    fn new_state_has_every_topic_at_zero() {
        let state = UserState::new();
        assert_eq!(state.topic_stats().len(), Topic::ALL.len());
        assert_eq!(state.total_quizzes(), 0);
        assert_eq!(state.overall_accuracy(), None);
    }

    #[test]
    fn record_session_folds_outcomes() {
        let mut state = UserState::new();
        state.record_session(&[
            outcome("a", Topic::Cpr, true),
            outcome("b", Topic::Cpr, false),
            outcome("c", Topic::Burns, true),
        ]);
        assert_eq!(state.total_quizzes(), 1);
        assert_eq!(state.total_questions_answered(), 3);
        assert_eq!(state.topic_stats().get(Topic::Cpr), TopicStat::new(2, 1).unwrap());
        assert_eq!(state.topic_stats().get(Topic::Burns), TopicStat::new(1, 1).unwrap());
        assert_eq!(state.topic_stats().get(Topic::Anatomy), TopicStat::default());
    }

    #[test]
    fn add_custom_questions_skips_known_ids() {
        let mut state = UserState::new();
        assert_eq!(
            state.add_custom_questions(vec![question("i-1", Topic::PdfExam), question("i-2", Topic::PdfExam)]),
            2
        );
        assert_eq!(
            state.add_custom_questions(vec![question("i-2", Topic::PdfExam), question("i-3", Topic::PdfExam)]),
            1
        );
        assert_eq!(state.custom_questions().len(), 3);
    }

    #[test]
    fn remove_custom_question_reports_presence() {
        let mut state = UserState::new();
        state.add_custom_questions(vec![question("i-1", Topic::PdfExam)]);
        assert!(state.remove_custom_question(&QuestionId::new("i-1")));
        assert!(!state.remove_custom_question(&QuestionId::new("i-1")));
        assert!(!state.has_custom_questions());
    }

    #[test]
    fn json_round_trip_preserves_structure() {
        let mut state = UserState::new();
        state.record_session(&[outcome("a", Topic::Bleeding, false)]);
        state.set_theme(Theme::Dark);
        state.add_custom_questions(vec![question("imported-1-0", Topic::PdfExam)]);

        let json = serde_json::to_string(&state).unwrap();
        let back: UserState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn json_uses_documented_field_names() {
        let json = serde_json::to_value(UserState::new()).unwrap();
        for field in ["totalQuizzes", "totalQuestionsAnswered", "topicStats", "theme", "customQuestions"] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        assert_eq!(json["theme"], "system");
    }

    #[test]
    fn missing_optional_fields_decode_to_defaults() {
        let state: UserState =
            serde_json::from_str(r#"{"totalQuizzes":2,"totalQuestionsAnswered":9}"#).unwrap();
        assert_eq!(state.total_quizzes(), 2);
        assert_eq!(state.theme(), Theme::System);
        assert_eq!(state.topic_stats().len(), Topic::ALL.len());
        assert!(state.custom_questions().is_empty());
    }

    #[test]
    fn overall_accuracy_sums_topics() {
        let mut state = UserState::new();
        state.record_session(&[
            outcome("a", Topic::Cpr, true),
            outcome("b", Topic::Burns, false),
            outcome("c", Topic::Burns, true),
            outcome("d", Topic::Choking, true),
        ]);
        assert_eq!(state.overall_accuracy(), Some(0.75));
    }
}
