//! Image generation backend trait.

use crate::backend::{LlmError, LlmResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Text-to-image request settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Engine identifier in the request path.
    pub engine: String,
    pub cfg_scale: f32,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub samples: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            engine: "stable-diffusion-xl-1024-v1-0".to_string(),
            cfg_scale: 7.0,
            width: 1024,
            height: 1024,
            steps: 30,
            samples: 1,
            timeout_secs: 120,
        }
    }
}

/// Renders a prompt to an image. The service's JSON reply is returned as is.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn text_to_image(&self, prompt: &str) -> LlmResult<serde_json::Value>;
}

/// An image backend that returns a one-pixel PNG in the service's
/// `artifacts` shape.
pub struct MockImageBackend {
    fail: bool,
    calls: AtomicUsize,
}

/// Transparent 1x1 PNG.
const PIXEL_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

impl MockImageBackend {
    pub fn new() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockImageBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageBackend for MockImageBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn text_to_image(&self, _prompt: &str) -> LlmResult<serde_json::Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LlmError::ApiError("Stability API error: 500 - mock".to_string()));
        }
        Ok(serde_json::json!({
            "artifacts": [{
                "base64": PIXEL_PNG_BASE64,
                "seed": 0,
                "finishReason": "SUCCESS"
            }]
        }))
    }
}
