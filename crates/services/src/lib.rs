#![forbid(unsafe_code)]

pub mod ai;
pub mod app_services;
pub mod assistant;
pub mod error;
pub mod imagery;
pub mod import;
pub mod performance;
pub mod question_bank;
pub mod sessions;

pub use aid_core::Clock;

pub use ai::{GeminiClient, GenerativeService};
pub use app_services::AppServices;
pub use assistant::{AssistantService, ChatSession};
pub use error::{AppServicesError, FinishError, GenerationError, ImportError, SessionError};
pub use imagery::ScenarioImageService;
pub use import::{ImportReport, QuestionImportService};
pub use performance::PerformanceService;
pub use question_bank::{QuestionBank, QuestionFilter};

pub use sessions::{
    Advance, AdvanceResult, AnswerFeedback, CompletedSession, QuizSession, SessionLoopService,
    SessionMode, SessionProgress, SessionReport, SessionState,
};
