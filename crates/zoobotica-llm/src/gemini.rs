//! Gemini backend for Google's Generative Language API.
//!
//! Requires the `api` feature and a Google API key.

use crate::backend::{LlmBackend, LlmConfig, LlmError, LlmResult};
use crate::prompt::{ChatPrompt, DesignPrompt, PromptTemplate};
use crate::types::{ChatTurn, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zoobotica_core::types::UserPreferences;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// generateContent request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

/// generateContent response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

/// Which safety profile a request runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Safety {
    Default,
    /// All four harm categories set to BLOCK_NONE.
    Relaxed,
}

/// Gemini backend.
///
/// # Example
///
/// ```rust,ignore
/// use zoobotica_llm::{GeminiBackend, LlmBackend};
///
/// let backend = GeminiBackend::new("AIza...")?;
/// let reply = backend.complete("Name an animal that climbs glass").await?;
/// ```
pub struct GeminiBackend {
    api_key: String,
    base_url: String,
    config: LlmConfig,
    client: reqwest::Client,
}

impl GeminiBackend {
    /// Create a new Gemini backend.
    pub fn new(api_key: &str) -> LlmResult<Self> {
        Self::with_config(api_key, LlmConfig::gemini())
    }

    /// Create with custom config.
    pub fn with_config(api_key: &str, config: LlmConfig) -> LlmResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| LlmError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
            config,
            client,
        })
    }

    /// Create from the `GOOGLE_API_KEY` environment variable.
    pub fn from_env() -> LlmResult<Self> {
        Self::from_env_with_config(LlmConfig::gemini())
    }

    pub fn from_env_with_config(config: LlmConfig) -> LlmResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LlmError::MissingApiKey(API_KEY_ENV.to_string()))?;
        Self::with_config(&api_key, config)
    }

    /// Point at a different API host.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: &str) -> Self {
        self.config.model = model.to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/models/{}:generateContent",
            self.base_url, self.config.model
        )
    }

    fn build_request(&self, turns: &[ChatTurn], safety: Safety) -> GeminiRequest {
        let contents = turns
            .iter()
            .map(|turn| GeminiContent {
                role: Some(
                    match turn.role {
                        Role::User => "user",
                        Role::Assistant => "model",
                    }
                    .to_string(),
                ),
                parts: vec![GeminiPart {
                    text: Some(turn.content.clone()),
                }],
            })
            .collect();

        let safety_settings = match safety {
            Safety::Default => Vec::new(),
            Safety::Relaxed => HARM_CATEGORIES
                .iter()
                .map(|category| SafetySetting {
                    category: *category,
                    threshold: "BLOCK_NONE",
                })
                .collect(),
        };

        GeminiRequest {
            contents,
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_k: self.config.top_k,
                top_p: self.config.top_p,
                max_output_tokens: self.config.max_tokens,
            },
            safety_settings,
        }
    }

    /// Make a request to the Gemini API.
    async fn request(&self, turns: &[ChatTurn], safety: Safety) -> LlmResult<String> {
        let request = self.build_request(turns, safety);
        debug!(model = %self.config.model, turns = turns.len(), "sending Gemini request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    LlmError::ConnectionFailed("Cannot connect to Gemini API".to_string())
                } else if e.is_timeout() {
                    LlmError::Timeout(self.config.timeout_secs)
                } else {
                    LlmError::ApiError(e.without_url().to_string())
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Gemini API error: {}", body);

            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited(60),
                _ => LlmError::ApiError(format!(
                    "Gemini API error: {}",
                    status.canonical_reason().unwrap_or(status.as_str())
                )),
            });
        }

        let resp: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        first_text(resp)
            .ok_or_else(|| LlmError::InvalidResponse("Invalid response from Gemini API".to_string()))
    }
}

fn first_text(resp: GeminiResponse) -> Option<String> {
    resp.candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()?
        .text
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        self.request(&[ChatTurn::user(prompt)], Safety::Default).await
    }

    async fn converse(&self, turns: &[ChatTurn]) -> LlmResult<String> {
        self.request(turns, Safety::Default).await
    }

    async fn generate_design(&self, prefs: &UserPreferences) -> LlmResult<String> {
        let prompt = DesignPrompt::new(prefs);
        self.request(&[ChatTurn::user(prompt.generate())], Safety::Relaxed)
            .await
    }

    async fn chat(
        &self,
        message: &str,
        prefs: Option<&UserPreferences>,
        history: &[ChatTurn],
    ) -> LlmResult<String> {
        let prompt = ChatPrompt::new(message, prefs);
        let mut turns = history.to_vec();
        turns.push(ChatTurn::user(prompt.generate()));
        self.request(&turns, Safety::Relaxed).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> GeminiBackend {
        GeminiBackend::new("test-key").unwrap()
    }

    #[test]
    fn test_endpoint() {
        let backend = backend().with_base_url("http://localhost:9999/");
        assert_eq!(
            backend.endpoint(),
            "http://localhost:9999/v1/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn test_request_body() {
        let turns = [ChatTurn::user("hi"), ChatTurn::assistant("hello"), ChatTurn::user("fins?")];
        let body = serde_json::to_value(backend().build_request(&turns, Safety::Relaxed)).unwrap();

        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["contents"][2]["parts"][0]["text"], "fins?");
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
        assert_eq!(body["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(body["safetySettings"][0]["threshold"], "BLOCK_NONE");

        let plain = serde_json::to_value(backend().build_request(&turns, Safety::Default)).unwrap();
        assert!(plain.get("safetySettings").is_none());
    }

    #[test]
    fn test_first_text() {
        let resp: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"A gecko robot"}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_text(resp).as_deref(), Some("A gecko robot"));

        let empty: GeminiResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(first_text(empty).is_none());
    }
}
