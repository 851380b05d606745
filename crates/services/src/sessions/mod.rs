mod plan;
mod progress;
mod service;
mod state;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::{FinishError, SessionError};
pub use plan::{SESSION_QUESTION_CAP, SessionBuilder, SessionMode, SessionPlan};
pub use progress::SessionProgress;
pub use service::{Advance, AnswerFeedback, CompletedSession, QuizSession};
pub use state::{SessionReport, SessionState};
pub use workflow::{AdvanceResult, SessionLoopService};
