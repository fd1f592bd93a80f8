//! # Zoobotica LLM
//!
//! Text and image generation for the Zoobotica designer.
//!
//! The text backend writes design descriptions, recommends traits for each
//! robot system, invents new traits and answers chat questions. The image
//! backend renders the assembled robot. Both sit behind async traits so the
//! server can run against hosted APIs or canned mocks.
//!
//! ## Features
//!
//! - `api`: hosted backends (Gemini for text, Stability for images)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zoobotica_llm::{GeminiBackend, LlmBackend};
//! use zoobotica_core::types::UserPreferences;
//!
//! let backend = GeminiBackend::from_env()?;
//! let prefs = UserPreferences::new("swim", "ocean", vec!["speed".into()]);
//! let design = backend.generate_design(&prefs).await?;
//! ```

mod assistant;
mod backend;
mod image;
mod parse;
mod prompt;
mod types;

pub use assistant::{ChatAssistant, ChatMessage, MessageKind, APOLOGY, WELCOME};
pub use backend::{LlmBackend, LlmConfig, LlmError, LlmResult, MockBackend};
pub use image::{ImageBackend, ImageConfig, MockImageBackend};
pub use parse::{extract_json_object, parse_generated_trait, parse_recommendations};
pub use prompt::{
    ChatPrompt, DesignPrompt, ImagePrompt, PromptTemplate, RecommendationPrompt,
    TraitGenerationPrompt,
};
pub use types::{ChatTurn, Recommendations, Role};

#[cfg(feature = "api")]
mod gemini;
#[cfg(feature = "api")]
pub use gemini::GeminiBackend;

#[cfg(feature = "api")]
mod stability;
#[cfg(feature = "api")]
pub use stability::StabilityBackend;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{ImageBackend, LlmBackend, LlmError, LlmResult};
    pub use crate::{ChatTurn, Recommendations, Role};
    pub use crate::{ChatAssistant, PromptTemplate};

    #[cfg(feature = "api")]
    pub use crate::{GeminiBackend, StabilityBackend};
}
