use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use aid_core::model::Question;

use crate::ai::GenerativeService;

/// Resolves an illustration for a question, preferring the one it already has.
///
/// Failures never surface to the caller: the question is simply shown without
/// an image.
#[derive(Clone)]
pub struct ScenarioImageService {
    ai: Arc<dyn GenerativeService>,
}

impl ScenarioImageService {
    #[must_use]
    pub fn new(ai: Arc<dyn GenerativeService>) -> Self {
        Self { ai }
    }

    pub async fn image_for(&self, question: &Question) -> Option<String> {
        if let Some(url) = question.image_url() {
            return Some(url.to_owned());
        }
        if !self.ai.is_enabled() {
            return None;
        }
        match self.ai.generate_image(question.text()).await {
            Ok(url) => Some(url),
            Err(err) => {
                debug!(id = %question.id(), error = %err, "scenario image unavailable");
                None
            }
        }
    }

    /// Resolve the image in the background so the quiz never waits on it.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn spawn_prefetch(&self, question: Question) -> JoinHandle<Option<String>> {
        let service = self.clone();
        tokio::spawn(async move { service.image_for(&question).await })
    }
}
