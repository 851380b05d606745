use thiserror::Error;

use crate::bank::BankError;
use crate::model::{AiSettingsError, QuestionError, SessionSummaryError, StatsError};
use crate::weakness::WeaknessError;

/// Umbrella error for callers that do not care which domain rule failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Weakness(#[from] WeaknessError),
    #[error(transparent)]
    Settings(#[from] AiSettingsError),
}
