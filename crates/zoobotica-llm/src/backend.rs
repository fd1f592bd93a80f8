//! Core text backend trait.

use crate::parse::{parse_generated_trait, parse_recommendations};
use crate::prompt::{ChatPrompt, DesignPrompt, PromptTemplate, RecommendationPrompt, TraitGenerationPrompt};
use crate::types::{ChatTurn, Recommendations};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use zoobotica_core::catalog::{GeneratedTrait, TraitCategory};
use zoobotica_core::types::UserPreferences;

/// LLM-related errors.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Rate limited: retry after {0} seconds")]
    RateLimited(u32),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Parsing failed: {0}")]
    ParseError(String),

    #[error("API key not configured: {0}")]
    MissingApiKey(String),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Timeout after {0} seconds")]
    Timeout(u32),
}

/// Result type for LLM operations.
pub type LlmResult<T> = Result<T, LlmError>;

/// Configuration for text generation requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model name/identifier.
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::gemini()
    }
}

impl LlmConfig {
    /// Settings used for every Gemini call.
    pub fn gemini() -> Self {
        Self {
            model: "gemini-1.5-pro".to_string(),
            max_tokens: 1024,
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            timeout_secs: 30,
        }
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set max tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Set timeout.
    pub fn with_timeout(mut self, timeout_secs: u32) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Core trait for text generation backends.
///
/// Implementors supply raw completion; the design, recommendation, trait and
/// chat operations are built on top of it from the prompt templates.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Get the backend name.
    fn name(&self) -> &str;

    /// Get the current configuration.
    fn config(&self) -> &LlmConfig;

    /// Generate a completion for a single prompt.
    async fn complete(&self, prompt: &str) -> LlmResult<String>;

    /// Generate a reply to a multi-turn conversation. The last turn is the
    /// one being answered.
    async fn converse(&self, turns: &[ChatTurn]) -> LlmResult<String> {
        // Default: flatten the transcript into one prompt
        let transcript = turns
            .iter()
            .map(|t| match t.role {
                crate::types::Role::User => format!("User: {}", t.content),
                crate::types::Role::Assistant => format!("Assistant: {}", t.content),
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        self.complete(&transcript).await
    }

    /// Describe a robot design for the questionnaire answers.
    async fn generate_design(&self, prefs: &UserPreferences) -> LlmResult<String> {
        let prompt = DesignPrompt::new(prefs);
        self.complete(&prompt.generate()).await
    }

    /// Recommend traits for each robot system.
    async fn recommend_traits(&self, prefs: &UserPreferences) -> LlmResult<Recommendations> {
        let prompt = RecommendationPrompt::new(prefs);
        let response = self.complete(&prompt.generate()).await?;
        parse_recommendations(&response)
    }

    /// Invent a new trait for `category`.
    async fn generate_trait(&self, category: TraitCategory) -> LlmResult<GeneratedTrait> {
        let prompt = TraitGenerationPrompt::new(category);
        let response = self.complete(&prompt.generate()).await?;
        parse_generated_trait(&response)
    }

    /// Answer a chat message in the context of the user's preferences.
    async fn chat(
        &self,
        message: &str,
        prefs: Option<&UserPreferences>,
        history: &[ChatTurn],
    ) -> LlmResult<String> {
        let prompt = ChatPrompt::new(message, prefs);
        let mut turns = history.to_vec();
        turns.push(ChatTurn::user(prompt.generate()));
        self.converse(&turns).await
    }
}

const DEMO_DESIGN: &str = "A streamlined chassis with gecko-inspired adhesive feet for climbing, \
octopus-style soft grippers for delicate handling and an eagle-eye camera mast for long-range inspection.";

const DEMO_CHAT: &str = "Consider pairing a sensor trait with a stabilizer: \
animals that sense well usually also hold still well.";

const DEMO_RECOMMENDATIONS: &str = r#"{
  "summary": [
    "Demo mode: recommendations are canned, not generated",
    "One trait per robot system"
  ],
  "recommendations": [
    {"id": "demo-star-nose", "name": "Tactile Star Array", "animal": "Star-nosed Mole", "description": "Dense touch sensors for mapping surfaces by contact", "type": "sensor", "confidence": 0.9},
    {"id": "demo-tardigrade", "name": "Cryptobiotic Shell", "animal": "Tardigrade", "description": "Sealed core that survives extreme conditions", "type": "core", "confidence": 0.8},
    {"id": "demo-chameleon-tongue", "name": "Ballistic Gripper", "animal": "Chameleon", "description": "Elastic launcher for rapid reach and grasp", "type": "manipulator", "confidence": 0.85},
    {"id": "demo-basilisk", "name": "Surface Runner", "animal": "Basilisk Lizard", "description": "Fast footfalls that keep the robot on top of water", "type": "locomotion", "confidence": 0.75},
    {"id": "demo-cat-tail", "name": "Inertial Tail", "animal": "Cat", "description": "Swinging counterweight for mid-air righting", "type": "stabilizer", "confidence": 0.8}
  ]
}"#;

const DEMO_TRAIT: &str = r#"{"id": "demo-mantis-shrimp-club", "name": "Cavitation Striker",
  "animal": "Mantis Shrimp", "category": "Actuators",
  "description": "A spring-latched appendage releases stored energy in a single fast strike.",
  "efficiency": 85, "complexity": 70, "power": 90}"#;

/// A mock backend for testing.
pub struct MockBackend {
    config: LlmConfig,
    responses: Vec<(String, String)>,
    default_response: String,
    fail: bool,
    calls: AtomicUsize,
}

impl MockBackend {
    /// Create a new mock backend.
    pub fn new() -> Self {
        Self {
            config: LlmConfig::default(),
            responses: Vec::new(),
            default_response: "Mock response".to_string(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Offline replies for every operation: a design text, a recommendation
    /// set covering all five systems, and one generated trait. Chat falls
    /// through to a generic suggestion.
    pub fn demo() -> Self {
        Self::new()
            .with_response("As a biomimetic robotics expert", DEMO_RECOMMENDATIONS)
            .with_response("Generate a unique biomimetic trait", DEMO_TRAIT)
            .with_response("Design a biomimetic robot", DEMO_DESIGN)
            .with_default_response(DEMO_CHAT)
    }

    /// Add a canned response for a prompt pattern. Earlier patterns win.
    pub fn with_response(mut self, pattern: &str, response: &str) -> Self {
        self.responses.push((pattern.to_string(), response.to_string()));
        self
    }

    /// Reply used when no pattern matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = response.to_string();
        self
    }

    /// Make every call fail with an API error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Number of completions requested so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LlmError::ApiError("Mock failure".to_string()));
        }
        for (pattern, response) in &self.responses {
            if prompt.contains(pattern) {
                return Ok(response.clone());
            }
        }
        Ok(self.default_response.clone())
    }
}
