//! Built-in first-aid question bank.
//!
//! The questions ship embedded in the binary and go through the same
//! validation as imported ones when decoded.

use thiserror::Error;

use crate::model::Question;

const BUILTIN_QUESTIONS_JSON: &str = include_str!("../data/questions.json");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("built-in question bank is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Decode the built-in questions in their shipped order.
///
/// # Errors
///
/// Returns `BankError::Malformed` if the embedded data fails to decode or a
/// question fails validation.
pub fn builtin_questions() -> Result<Vec<Question>, BankError> {
    Ok(serde_json::from_str(BUILTIN_QUESTIONS_JSON)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OPTION_COUNT, Topic};
    use std::collections::HashSet;

    #[test]
    fn builtin_bank_decodes() {
        let questions = builtin_questions().unwrap();
        assert_eq!(questions.len(), 27);
    }

    #[test]
    fn builtin_ids_are_unique() {
        let questions = builtin_questions().unwrap();
        let ids: HashSet<_> = questions.iter().map(|q| q.id().clone()).collect();
        assert_eq!(ids.len(), questions.len());
    }

    #[test]
    fn builtin_bank_never_contains_import_topic() {
        let questions = builtin_questions().unwrap();
        assert!(questions.iter().all(|q| !q.topic().is_import_only()));
    }

    #[test]
    fn every_practice_topic_has_questions() {
        let questions = builtin_questions().unwrap();
        for topic in Topic::practice_topics() {
            assert!(
                questions.iter().any(|q| q.topic() == topic),
                "no built-in questions for {topic:?}"
            );
        }
        assert_eq!(questions.iter().filter(|q| q.topic() == Topic::Cpr).count(), 5);
    }

    #[test]
    fn builtin_questions_have_four_options() {
        let questions = builtin_questions().unwrap();
        assert!(questions.iter().all(|q| q.options().len() == OPTION_COUNT));
    }
}
