use std::sync::Arc;

use tracing::info;

use aid_core::Clock;
use aid_core::model::AiSettings;
use storage::repository::{CredentialRepository, Storage, StorageError};

use crate::ai::{GeminiClient, GenerativeService};
use crate::assistant::AssistantService;
use crate::error::AppServicesError;
use crate::imagery::ScenarioImageService;
use crate::import::QuestionImportService;
use crate::performance::PerformanceService;
use crate::question_bank::QuestionBank;
use crate::sessions::SessionLoopService;

/// Fully wired service graph for the app.
#[derive(Clone)]
pub struct AppServices {
    performance: PerformanceService,
    session_loop: SessionLoopService,
    imports: QuestionImportService,
    images: ScenarioImageService,
    assistant: AssistantService,
    credentials: Arc<dyn CredentialRepository>,
    ai_enabled: bool,
}

impl AppServices {
    /// Wire services over `storage`.
    ///
    /// A stored API key takes precedence over the one in `settings`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the credential cannot be read or the
    /// built-in bank fails to load.
    pub async fn new(
        storage: Storage,
        settings: AiSettings,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let settings = match storage.credentials.load_api_key().await? {
            Some(key) => settings.with_api_key(Some(key)),
            None => settings,
        };
        let ai: Arc<dyn GenerativeService> = Arc::new(GeminiClient::new(settings));
        Self::with_generator(storage, ai, clock)
    }

    /// Wire services over `storage` with an explicit generative backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Bank` if the built-in bank fails to load.
    pub fn with_generator(
        storage: Storage,
        ai: Arc<dyn GenerativeService>,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let bank = QuestionBank::builtin()?;
        let performance = PerformanceService::new(Arc::clone(&storage.user_state));
        let ai_enabled = ai.is_enabled();
        info!(questions = bank.builtin_questions().len(), ai_enabled, "services ready");

        Ok(Self {
            session_loop: SessionLoopService::new(clock, bank, performance.clone()),
            imports: QuestionImportService::new(clock, Arc::clone(&ai), performance.clone()),
            images: ScenarioImageService::new(Arc::clone(&ai)),
            assistant: AssistantService::new(ai),
            performance,
            credentials: storage.credentials,
            ai_enabled,
        })
    }

    /// Connect to `SQLite` at `db_url` and wire services over it.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        settings: AiSettings,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::new(storage, settings, clock).await
    }

    #[must_use]
    pub fn performance(&self) -> &PerformanceService {
        &self.performance
    }

    #[must_use]
    pub fn session_loop(&self) -> &SessionLoopService {
        &self.session_loop
    }

    #[must_use]
    pub fn imports(&self) -> &QuestionImportService {
        &self.imports
    }

    #[must_use]
    pub fn images(&self) -> &ScenarioImageService {
        &self.images
    }

    #[must_use]
    pub fn assistant(&self) -> &AssistantService {
        &self.assistant
    }

    #[must_use]
    pub fn ai_enabled(&self) -> bool {
        self.ai_enabled
    }

    /// Persist an API key; services built afterwards pick it up.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the key cannot be written.
    pub async fn save_api_key(&self, key: &str) -> Result<(), StorageError> {
        self.credentials.save_api_key(key).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the key cannot be removed.
    pub async fn clear_api_key(&self) -> Result<(), StorageError> {
        self.credentials.clear_api_key().await
    }
}
