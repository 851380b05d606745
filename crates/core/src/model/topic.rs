use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

/// Closed set of first-aid subject areas a question belongs to.
///
/// Declaration order is the display order and the order analytics report in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Topic {
    General,
    Anatomy,
    Cpr,
    Bleeding,
    Burns,
    Fractures,
    Choking,
    EnvEmergencies,
    Transport,
    /// Questions imported from exam papers. Never part of the built-in bank.
    PdfExam,
}

impl Topic {
    pub const ALL: [Topic; 10] = [
        Topic::General,
        Topic::Anatomy,
        Topic::Cpr,
        Topic::Bleeding,
        Topic::Burns,
        Topic::Fractures,
        Topic::Choking,
        Topic::EnvEmergencies,
        Topic::Transport,
        Topic::PdfExam,
    ];

    /// Stable storage key, identical to the serialized form.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Topic::General => "GENERAL",
            Topic::Anatomy => "ANATOMY",
            Topic::Cpr => "CPR",
            Topic::Bleeding => "BLEEDING",
            Topic::Burns => "BURNS",
            Topic::Fractures => "FRACTURES",
            Topic::Choking => "CHOKING",
            Topic::EnvEmergencies => "ENV_EMERGENCIES",
            Topic::Transport => "TRANSPORT",
            Topic::PdfExam => "PDF_EXAM",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Topic::General => "Genel İlkyardım Bilgisi",
            Topic::Anatomy => "İnsan Vücudu ve İşleyişi",
            Topic::Cpr => "Temel Yaşam Desteği (CPR)",
            Topic::Bleeding => "Kanamalar ve Şok",
            Topic::Burns => "Yanıklar ve Donmalar",
            Topic::Fractures => "Kırık, Çıkık ve Burkulmalar",
            Topic::Choking => "Hava Yolu Tıkanıklığı",
            Topic::EnvEmergencies => "Çevresel Aciller (Zehirlenme/Isırma)",
            Topic::Transport => "Hasta Taşıma Teknikleri",
            Topic::PdfExam => "PDF / Çıkmış Sorular",
        }
    }

    /// True for the topic that draws only from imported questions.
    #[must_use]
    pub fn is_import_only(self) -> bool {
        matches!(self, Topic::PdfExam)
    }

    /// Topics offered as stand-alone practice sessions.
    pub fn practice_topics() -> impl Iterator<Item = Topic> {
        Topic::ALL
            .into_iter()
            .filter(|t| !matches!(t, Topic::General | Topic::PdfExam))
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown topic: {0}")]
pub struct UnknownTopic(pub String);

impl FromStr for Topic {
    type Err = UnknownTopic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_ascii_uppercase();
        Topic::ALL
            .into_iter()
            .find(|t| t.key() == wanted)
            .ok_or_else(|| UnknownTopic(s.to_string()))
    }
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Tier label attached to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Kolay",
            Difficulty::Medium => "Orta",
            Difficulty::Hard => "Zor",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown difficulty: {0}")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(UnknownDifficulty(s.to_string())),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
