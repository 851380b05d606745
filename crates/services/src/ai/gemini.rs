use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use aid_core::model::{AiSettings, Difficulty, Topic};

use super::client::{ChatMessage, ChatRole, GeneratedQuestion, GenerativeService};
use super::prompts;
use crate::error::GenerationError;

const API_KEY_HEADER: &str = "x-goog-api-key";
const IMAGE_ASPECT_RATIO: &str = "16:9";
const DEFAULT_IMAGE_MIME: &str = "image/png";

/// `GenerativeService` backed by the Gemini REST API.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    client: Client,
    settings: AiSettings,
}

impl GeminiClient {
    #[must_use]
    pub fn new(settings: AiSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &AiSettings {
        &self.settings
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{model}:{method}", self.settings.api_base_url())
    }

    async fn post<B, R>(&self, url: String, body: &B) -> Result<R, GenerationError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let api_key = self.settings.api_key().ok_or(GenerationError::Disabled)?;
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    async fn generate_text(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> Result<String, GenerationError> {
        let url = self.endpoint(model, "generateContent");
        debug!(model, "generateContent request");
        let response: GenerateContentResponse = self.post(url, &request).await?;
        response_text(response).ok_or(GenerationError::EmptyResponse)
    }
}

#[async_trait]
impl GenerativeService for GeminiClient {
    fn is_enabled(&self) -> bool {
        self.settings.api_key().is_some()
    }

    async fn generate_question(
        &self,
        topic: Topic,
        difficulty: Difficulty,
    ) -> Result<GeneratedQuestion, GenerationError> {
        let request = GenerateContentRequest::json_prompt(
            prompts::question_prompt(topic, difficulty),
            question_schema(),
        );
        let text = self.generate_text(self.settings.text_model(), request).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn generate_image(&self, question_text: &str) -> Result<String, GenerationError> {
        let url = self.endpoint(self.settings.image_model(), "predict");
        let request = PredictRequest {
            instances: vec![PredictInstance {
                prompt: prompts::image_prompt(question_text),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: IMAGE_ASPECT_RATIO,
            },
        };
        let response: PredictResponse = self.post(url, &request).await?;
        image_data_url(response).ok_or(GenerationError::EmptyResponse)
    }

    async fn extract_questions(
        &self,
        content: &str,
    ) -> Result<Vec<GeneratedQuestion>, GenerationError> {
        let request = GenerateContentRequest::json_prompt(
            prompts::import_prompt(content),
            json!({ "type": "ARRAY", "items": question_schema() }),
        );
        let text = self.generate_text(self.settings.text_model(), request).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn chat(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, GenerationError> {
        let mut contents: Vec<WireContent> = history.iter().map(WireContent::from).collect();
        contents.push(WireContent::from(&ChatMessage::user(message)));
        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(WireContent::text(None, prompts::CHAT_SYSTEM_INSTRUCTION)),
            generation_config: None,
        };
        self.generate_text(self.settings.chat_model(), request).await
    }
}

fn question_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "text": { "type": "STRING" },
            "options": { "type": "ARRAY", "items": { "type": "STRING" } },
            "correctAnswer": { "type": "INTEGER" },
            "explanation": { "type": "STRING" }
        },
        "required": ["text", "options", "correctAnswer", "explanation"]
    })
}

fn response_text(response: GenerateContentResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_owned())
}

fn image_data_url(response: PredictResponse) -> Option<String> {
    let prediction = response.predictions.into_iter().next()?;
    let bytes = prediction.bytes_base64_encoded.filter(|b| !b.is_empty())?;
    let mime = prediction
        .mime_type
        .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_owned());
    Some(format!("data:{mime};base64,{bytes}"))
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    fn json_prompt(prompt: String, schema: Value) -> Self {
        Self {
            contents: vec![WireContent::text(Some("user"), prompt)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<WirePart>,
}

impl WireContent {
    fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_owned),
            parts: vec![WirePart {
                text: Some(text.into()),
            }],
        }
    }
}

impl From<&ChatMessage> for WireContent {
    fn from(message: &ChatMessage) -> Self {
        let role = match message.role {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        };
        Self::text(Some(role), message.text.clone())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WirePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<WireContent>,
}

#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
    aspect_ratio: &'static str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
}
