pub mod client;
pub mod gemini;
pub mod prompts;

pub use client::{ChatMessage, ChatRole, GeneratedQuestion, GenerativeService};
pub use gemini::GeminiClient;
