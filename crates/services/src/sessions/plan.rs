use rand::Rng;
use rand::seq::SliceRandom;

use aid_core::model::{Question, Topic};

use crate::error::SessionError;
use crate::question_bank::QuestionFilter;

/// Maximum number of questions drawn into one session.
pub const SESSION_QUESTION_CAP: usize = 20;

/// How the questions of a session are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Questions of a single topic.
    ByTopic(Topic),
    /// Uniform sample across every topic.
    General,
    /// Questions of every topic currently below the mastery threshold.
    Weakness,
}

impl SessionMode {
    /// Candidate filter for this mode; `weak` is only consulted for `Weakness`.
    #[must_use]
    pub fn filter(self, weak: &[Topic]) -> QuestionFilter {
        match self {
            SessionMode::ByTopic(topic) => QuestionFilter::Topic(topic),
            SessionMode::General => QuestionFilter::All,
            SessionMode::Weakness => QuestionFilter::Topics(weak.to_vec()),
        }
    }
}

/// Selection result for a session build.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub questions: Vec<Question>,
    pub candidates: usize,
}

/// Shuffles a candidate pool and caps it to the session size.
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    cap: usize,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cap: SESSION_QUESTION_CAP,
        }
    }

    /// Override the session size. A cap of zero is treated as one.
    #[must_use]
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap.max(1);
        self
    }

    #[must_use]
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Uniformly shuffle `candidates` with `rng` and keep the first `cap`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoQuestionsAvailable` when `candidates` is empty.
    pub fn build<R: Rng + ?Sized>(
        &self,
        mut candidates: Vec<Question>,
        rng: &mut R,
    ) -> Result<SessionPlan, SessionError> {
        if candidates.is_empty() {
            return Err(SessionError::NoQuestionsAvailable);
        }
        let total = candidates.len();
        candidates.shuffle(rng);
        candidates.truncate(self.cap);
        Ok(SessionPlan {
            questions: candidates,
            candidates: total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aid_core::model::{Difficulty, QuestionDraft, QuestionId};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn questions(count: usize) -> Vec<Question> {
        (0..count)
            .map(|i| {
                QuestionDraft {
                    id: QuestionId::new(format!("q{i}")),
                    text: format!("Soru {i}"),
                    options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                    correct_answer: i % 4,
                    explanation: String::new(),
                    topic: Topic::Cpr,
                    difficulty: Difficulty::Medium,
                    image_url: None,
                }
                .validate()
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn caps_large_pools_without_duplicates() {
        let mut rng = StdRng::seed_from_u64(11);
        let plan = SessionBuilder::new().build(questions(35), &mut rng).unwrap();

        assert_eq!(plan.questions.len(), SESSION_QUESTION_CAP);
        assert_eq!(plan.candidates, 35);
        let unique: HashSet<_> = plan.questions.iter().map(|q| q.id().clone()).collect();
        assert_eq!(unique.len(), SESSION_QUESTION_CAP);
    }

    #[test]
    fn small_pools_keep_every_question() {
        let mut rng = StdRng::seed_from_u64(3);
        let plan = SessionBuilder::new().build(questions(3), &mut rng).unwrap();

        let mut ids: Vec<_> = plan.questions.iter().map(|q| q.id().to_string()).collect();
        ids.sort();
        assert_eq!(ids, vec!["q0", "q1", "q2"]);
    }

    #[test]
    fn same_seed_gives_same_order() {
        let builder = SessionBuilder::new().with_cap(5);
        let first = builder
            .build(questions(12), &mut StdRng::seed_from_u64(42))
            .unwrap();
        let second = builder
            .build(questions(12), &mut StdRng::seed_from_u64(42))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_pool_is_rejected() {
        let err = SessionBuilder::new()
            .build(Vec::new(), &mut StdRng::seed_from_u64(1))
            .unwrap_err();
        assert!(matches!(err, SessionError::NoQuestionsAvailable));
    }

    #[test]
    fn weakness_mode_filter_uses_weak_topics() {
        let filter = SessionMode::Weakness.filter(&[Topic::Burns]);
        assert_eq!(filter, QuestionFilter::Topics(vec![Topic::Burns]));
        assert_eq!(SessionMode::General.filter(&[Topic::Burns]), QuestionFilter::All);
    }
}
