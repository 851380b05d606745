//! Repositories layered over a `KeyValueStore`.
//!
//! State is stored as one JSON document per key and always written in full.

use async_trait::async_trait;
use aid_core::model::UserState;
use std::sync::Arc;

use crate::repository::{CredentialRepository, KeyValueStore, StorageError, UserStateRepository};

pub const USER_STATE_KEY: &str = "user_state";
pub const API_KEY_KEY: &str = "api_key";

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[derive(Clone)]
pub struct KvRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvRepository {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserStateRepository for KvRepository {
    async fn load_user_state(&self) -> Result<Option<UserState>, StorageError> {
        let Some(raw) = self.store.get(USER_STATE_KEY).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw).map(Some).map_err(ser)
    }

    async fn save_user_state(&self, state: &UserState) -> Result<(), StorageError> {
        let raw = serde_json::to_string(state).map_err(ser)?;
        self.store.set(USER_STATE_KEY, &raw).await?;
        tracing::debug!(
            total_quizzes = state.total_quizzes(),
            bytes = raw.len(),
            "user state saved"
        );
        Ok(())
    }
}

#[async_trait]
impl CredentialRepository for KvRepository {
    async fn load_api_key(&self) -> Result<Option<String>, StorageError> {
        let key = self.store.get(API_KEY_KEY).await?;
        Ok(key.filter(|k| !k.trim().is_empty()))
    }

    async fn save_api_key(&self, api_key: &str) -> Result<(), StorageError> {
        self.store.set(API_KEY_KEY, api_key.trim()).await
    }

    async fn clear_api_key(&self) -> Result<(), StorageError> {
        self.store.remove(API_KEY_KEY).await
    }
}
