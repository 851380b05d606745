//! Read-only query layer over the built-in bank and the user's imported
//! questions.

use std::collections::HashSet;
use std::sync::Arc;

use aid_core::bank::{BankError, builtin_questions};
use aid_core::model::{Question, Topic};

/// Which questions a session draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionFilter {
    All,
    Topic(Topic),
    Topics(Vec<Topic>),
}

impl QuestionFilter {
    #[must_use]
    pub fn matches(&self, topic: Topic) -> bool {
        match self {
            QuestionFilter::All => true,
            QuestionFilter::Topic(wanted) => *wanted == topic,
            QuestionFilter::Topics(wanted) => wanted.contains(&topic),
        }
    }
}

#[derive(Clone, Debug)]
pub struct QuestionBank {
    builtin: Arc<[Question]>,
}

impl QuestionBank {
    /// Bank over the questions shipped with the app.
    ///
    /// # Errors
    ///
    /// Returns `BankError` if the embedded bank cannot be decoded.
    pub fn builtin() -> Result<Self, BankError> {
        Ok(Self::from_questions(builtin_questions()?))
    }

    #[must_use]
    pub fn from_questions(questions: Vec<Question>) -> Self {
        Self {
            builtin: questions.into(),
        }
    }

    #[must_use]
    pub fn builtin_questions(&self) -> &[Question] {
        &self.builtin
    }

    /// All questions matching `filter` from the built-in bank followed by the
    /// custom collection.
    ///
    /// Import-only topics are served exclusively from `custom`. Ids already
    /// seen are skipped, so the result never holds duplicates.
    #[must_use]
    pub fn query(&self, custom: &[Question], filter: &QuestionFilter) -> Vec<Question> {
        let builtin = self.builtin.iter().filter(|q| !q.topic().is_import_only());
        let mut seen = HashSet::new();
        builtin
            .chain(custom.iter())
            .filter(|q| filter.matches(q.topic()))
            .filter(|q| seen.insert(q.id().clone()))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn count(&self, custom: &[Question], filter: &QuestionFilter) -> usize {
        self.query(custom, filter).len()
    }
}
