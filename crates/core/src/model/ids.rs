use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a Question.
///
/// Built-in questions use short slugs (`cpr_1`), generated ones carry an
/// `ai-` or `imported-` prefix.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    /// Creates a new `QuestionId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier for a question produced by the topic generator.
    #[must_use]
    pub fn generated(millis: i64) -> Self {
        Self(format!("ai-{millis}"))
    }

    /// Identifier for the `index`-th question of one import batch.
    #[must_use]
    pub fn imported(millis: i64, index: usize) -> Self {
        Self(format!("imported-{millis}-{index}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ─── FromStr ───────────────────────────────────────────────────────────────────

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for QuestionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseIdError {
                kind: "QuestionId".to_string(),
            });
        }
        Ok(Self::new(trimmed))
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_id_display() {
        let id = QuestionId::new("cpr_1");
        assert_eq!(id.to_string(), "cpr_1");
    }

    #[test]
    fn test_question_id_from_str_trims() {
        let id: QuestionId = "  burn_2 ".parse().unwrap();
        assert_eq!(id, QuestionId::new("burn_2"));
    }

    #[test]
    fn test_question_id_from_str_blank() {
        assert!("   ".parse::<QuestionId>().is_err());
    }

    #[test]
    fn test_generated_and_imported_prefixes() {
        assert_eq!(QuestionId::generated(1_700).as_str(), "ai-1700");
        assert_eq!(QuestionId::imported(1_700, 3).as_str(), "imported-1700-3");
    }

    #[test]
    fn test_question_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&QuestionId::new("gen_1")).unwrap();
        assert_eq!(json, "\"gen_1\"");
    }
}
