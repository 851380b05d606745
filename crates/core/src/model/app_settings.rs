use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash-lite";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";

/// Connection settings for the generative content service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiSettings {
    api_key: Option<String>,
    api_base_url: String,
    text_model: String,
    chat_model: String,
    image_model: String,
}

#[derive(Clone, Debug, Default)]
pub struct AiSettingsDraft {
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub text_model: Option<String>,
    pub chat_model: Option<String>,
    pub image_model: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AiSettingsError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl AiSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft, filling unset values with defaults.
    ///
    /// # Errors
    ///
    /// Returns `AiSettingsError` if the base URL is present but invalid.
    pub fn validate(self) -> Result<AiSettings, AiSettingsError> {
        let api_base_url = match normalize_optional(self.api_base_url) {
            Some(raw) => {
                if Url::parse(&raw).is_err() {
                    return Err(AiSettingsError::InvalidBaseUrl(raw));
                }
                raw.trim_end_matches('/').to_string()
            }
            None => DEFAULT_API_BASE_URL.to_string(),
        };

        Ok(AiSettings {
            api_key: normalize_optional(self.api_key),
            api_base_url,
            text_model: normalize_optional(self.text_model)
                .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            chat_model: normalize_optional(self.chat_model)
                .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            image_model: normalize_optional(self.image_model)
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
        })
    }
}

impl AiSettings {
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Same settings with a different credential; blank keys clear it.
    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = normalize_optional(api_key);
        self
    }

    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    #[must_use]
    pub fn text_model(&self) -> &str {
        &self.text_model
    }

    #[must_use]
    pub fn chat_model(&self) -> &str {
        &self.chat_model
    }

    #[must_use]
    pub fn image_model(&self) -> &str {
        &self.image_model
    }
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
