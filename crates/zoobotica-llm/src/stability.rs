//! Stability AI text-to-image backend.
//!
//! Requires the `api` feature and a Stability API key.

use crate::backend::{LlmError, LlmResult};
use crate::image::{ImageBackend, ImageConfig};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

const STABILITY_API_BASE: &str = "https://api.stability.ai";
pub const API_KEY_ENV: &str = "STABILITY_API_KEY";

#[derive(Debug, Serialize)]
struct TextToImageRequest<'a> {
    text_prompts: [TextPrompt<'a>; 1],
    cfg_scale: f32,
    height: u32,
    width: u32,
    steps: u32,
    samples: u32,
}

#[derive(Debug, Serialize)]
struct TextPrompt<'a> {
    text: &'a str,
}

/// Stability backend. The JSON reply (with its base64 `artifacts`) is relayed
/// without interpretation.
pub struct StabilityBackend {
    api_key: String,
    base_url: String,
    config: ImageConfig,
    client: reqwest::Client,
}

impl StabilityBackend {
    pub fn new(api_key: &str) -> LlmResult<Self> {
        Self::with_config(api_key, ImageConfig::default())
    }

    pub fn with_config(api_key: &str, config: ImageConfig) -> LlmResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| LlmError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: STABILITY_API_BASE.to_string(),
            config,
            client,
        })
    }

    /// Create from the `STABILITY_API_KEY` environment variable.
    pub fn from_env_with_config(config: ImageConfig) -> LlmResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LlmError::MissingApiKey(API_KEY_ENV.to_string()))?;
        Self::with_config(&api_key, config)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/generation/{}/text-to-image",
            self.base_url, self.config.engine
        )
    }

    fn build_request<'a>(&self, prompt: &'a str) -> TextToImageRequest<'a> {
        TextToImageRequest {
            text_prompts: [TextPrompt { text: prompt }],
            cfg_scale: self.config.cfg_scale,
            height: self.config.height,
            width: self.config.width,
            steps: self.config.steps,
            samples: self.config.samples,
        }
    }
}

#[async_trait]
impl ImageBackend for StabilityBackend {
    fn name(&self) -> &str {
        "stability"
    }

    async fn text_to_image(&self, prompt: &str) -> LlmResult<serde_json::Value> {
        debug!(engine = %self.config.engine, "requesting image from Stability");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .header("accept", "application/json")
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    LlmError::ConnectionFailed("Cannot connect to Stability API".to_string())
                } else if e.is_timeout() {
                    LlmError::Timeout(self.config.timeout_secs)
                } else {
                    LlmError::ApiError(e.without_url().to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Stability API error: {}", body);
            return Err(LlmError::ApiError(format!(
                "Stability API error: {} - {}",
                status.as_u16(),
                body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }
}
