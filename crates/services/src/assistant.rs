use std::sync::Arc;

use tracing::warn;

use crate::ai::{ChatMessage, GenerativeService};

/// Reply shown when the assistant cannot answer.
pub const FALLBACK_REPLY: &str = "Üzgünüm, bir hata oluştu. Lütfen tekrar deneyin.";

pub const SUGGESTED_PROMPTS: [&str; 3] = [
    "Kanama nasıl durdurulur?",
    "Yanığa ne iyi gelir?",
    "Kalp masajı hızı nedir?",
];

/// Conversation history for one assistant session, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[derive(Clone)]
pub struct AssistantService {
    ai: Arc<dyn GenerativeService>,
}

impl AssistantService {
    #[must_use]
    pub fn new(ai: Arc<dyn GenerativeService>) -> Self {
        Self { ai }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.ai.is_enabled()
    }

    /// Send `text` and append both it and the reply to `session`.
    ///
    /// Blank input is ignored and returns `None`. Service failures produce
    /// [`FALLBACK_REPLY`] instead of an error.
    pub async fn send<'a>(&self, session: &'a mut ChatSession, text: &str) -> Option<&'a ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let reply = match self.ai.chat(&session.messages, text).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "assistant reply failed");
                FALLBACK_REPLY.to_owned()
            }
        };
        session.messages.push(ChatMessage::user(text));
        session.messages.push(ChatMessage::model(reply));
        session.messages.last()
    }
}
