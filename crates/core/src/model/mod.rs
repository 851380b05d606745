mod app_settings;
mod ids;
mod question;
mod session;
mod stats;
mod topic;
mod user_state;

pub use app_settings::{
    AiSettings, AiSettingsDraft, AiSettingsError, DEFAULT_API_BASE_URL, DEFAULT_CHAT_MODEL,
    DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL,
};
pub use ids::{ParseIdError, QuestionId};

pub use question::{OPTION_COUNT, Question, QuestionDraft, QuestionError};
pub use session::{AnswerOutcome, SUCCESS_PERCENTAGE, SessionSummary, SessionSummaryError};
pub use stats::{StatsError, TopicStat, TopicStats};
pub use topic::{Difficulty, Topic, UnknownDifficulty, UnknownTopic};
pub use user_state::{Theme, UnknownTheme, UserState};
