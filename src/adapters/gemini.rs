use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::domain::ports::{ConfigProvider, GenerationRequest, TextGenerator};
use crate::utils::error::{MarketError, Result};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

/// Client for the `generateContent` REST call of the Gemini API.
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    pub fn url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, self.model)
    }

    fn body(request: &GenerationRequest) -> serde_json::Value {
        let mut generation_config = serde_json::Map::new();
        if let Some(temperature) = request.temperature {
            generation_config.insert("temperature".to_string(), json!(temperature));
        }
        if let Some(schema) = &request.response_schema {
            generation_config.insert("responseMimeType".to_string(), json!("application/json"));
            generation_config.insert("responseSchema".to_string(), schema.clone());
        }

        json!({
            "systemInstruction": { "parts": [{ "text": request.system_instruction }] },
            "contents": [{ "role": "user", "parts": [{ "text": request.prompt }] }],
            "generationConfig": generation_config,
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let url = self.url();
        tracing::debug!("Making generateContent request to: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::body(request))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Gemini response status: {}", status);
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MarketError::ServiceError {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response.json().await?;
        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(MarketError::MalformedResponse {
                message: "response carried no text".to_string(),
            });
        }
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

/// Stand-in used when no API key is configured; every call falls back.
#[derive(Debug, Clone, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
        Err(MarketError::ServiceUnavailable {
            reason: "assistant is not configured".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Either a live client or the disabled stand-in, picked from configuration.
pub enum ConfiguredGenerator {
    Gemini(GeminiClient),
    Disabled(DisabledGenerator),
}

impl ConfiguredGenerator {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        if let Some(reason) = disabled_reason(config) {
            tracing::warn!("{}; suggestions will use local defaults", reason);
            return Self::Disabled(DisabledGenerator);
        }
        match config.api_key() {
            Some(key) => Self::Gemini(GeminiClient::new(
                config.assistant_endpoint(),
                config.assistant_model(),
                key,
            )),
            None => Self::Disabled(DisabledGenerator),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Gemini(_))
    }
}

/// Why the live client is not used, if it is not.
fn disabled_reason<C: ConfigProvider>(config: &C) -> Option<&'static str> {
    if !config.assistant_enabled() {
        Some("Assistant disabled in configuration ([assistant] enabled = false)")
    } else if config.api_key().is_none() {
        Some("No assistant API key configured")
    } else {
        None
    }
}

#[async_trait]
impl TextGenerator for ConfiguredGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        match self {
            Self::Gemini(client) => client.generate(request).await,
            Self::Disabled(disabled) => disabled.generate(request).await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Gemini(client) => client.name(),
            Self::Disabled(disabled) => disabled.name(),
        }
    }
}
