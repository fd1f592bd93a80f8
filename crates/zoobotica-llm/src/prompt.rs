//! Prompt templates for design, recommendation, trait and image requests.

use zoobotica_core::catalog::TraitCategory;
use zoobotica_core::types::{BodyPart, TraitType, UserPreferences};

/// A prompt template for LLM requests.
pub trait PromptTemplate {
    /// Generate the prompt text.
    fn generate(&self) -> String;

    /// Get the system prompt (if any).
    fn system_prompt(&self) -> Option<String> {
        None
    }
}

const NOT_SPECIFIED: &str = "Not specified";

/// Prompt for the free-text design description.
#[derive(Debug, Clone)]
pub struct DesignPrompt {
    pub robot_task: String,
    pub operating_environment: String,
    pub key_features: Vec<String>,
}

impl DesignPrompt {
    pub fn new(prefs: &UserPreferences) -> Self {
        Self {
            robot_task: prefs.robot_task.clone(),
            operating_environment: prefs.operating_environment.clone(),
            key_features: prefs.key_features.clone(),
        }
    }
}

impl PromptTemplate for DesignPrompt {
    fn generate(&self) -> String {
        format!(
            "Design a biomimetic robot with the following specifications:
- Task: {}
- Operating Environment: {}
- Key Features: {}

Please provide a brief design description focusing on how animal-inspired features could be used to achieve the specified requirements. Include specific examples of animals and their traits that could be incorporated into the design.",
            self.robot_task,
            self.operating_environment,
            self.key_features.join(", ")
        )
    }
}

/// Prompt for structured trait recommendations.
#[derive(Debug, Clone)]
pub struct RecommendationPrompt {
    pub robot_task: String,
    pub operating_environment: String,
    pub key_features: Vec<String>,
    /// Number of traits to ask for.
    pub count: usize,
}

impl RecommendationPrompt {
    pub fn new(prefs: &UserPreferences) -> Self {
        Self {
            robot_task: prefs.robot_task.clone(),
            operating_environment: prefs.operating_environment.clone(),
            key_features: prefs.key_features.clone(),
            count: 5,
        }
    }

    fn systems(&self) -> String {
        TraitType::ALL
            .iter()
            .map(|t| format!("- {} -> {} ({})", t, t.system_name(), t.responsibilities()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn features(&self) -> String {
        if self.key_features.is_empty() {
            "None specified".to_string()
        } else {
            self.key_features.join(", ")
        }
    }
}

impl PromptTemplate for RecommendationPrompt {
    fn generate(&self) -> String {
        let types = TraitType::ALL
            .iter()
            .map(TraitType::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"As a biomimetic robotics expert, analyze this robot design requirement and provide:
1. A brief summary explaining the rationale for your recommendations (max 3 bullet points)
2. {count} specific animal-inspired features for different robot systems

Format your response as a JSON object with two fields:
1. "summary": Array of bullet points explaining the rationale
2. "recommendations": Array of trait objects

Each trait object should have:
- id: a unique string
- name: the robotic feature name (e.g., "Articulated Gripper", "Dynamic Stabilizer")
- animal: the inspiration animal
- description: how the animal's feature is adapted for robotic use
- type: must match the robot system it enhances (one of: {types})
- confidence: number between 0 and 1 indicating match quality

Robot Systems:
{systems}

Requirements:
- Task: {task}
- Operating Environment: {environment}
- Key Features: {features}

Return ONLY the JSON object. Example format:
{{
  "summary": [
    "Prioritized aquatic adaptations due to underwater operating environment",
    "Selected features optimized for precise manipulation and sensing",
    "Focused on energy-efficient movement systems"
  ],
  "recommendations": [
    {{
      "id": "octopus-manipulator",
      "name": "Adaptive Manipulator Array",
      "animal": "Octopus",
      "description": "Distributed suction cups and soft robotics for precise, adaptable gripping inspired by octopus tentacles",
      "type": "manipulator",
      "confidence": 0.95
    }}
  ]
}}"#,
            count = self.count,
            types = types,
            systems = self.systems(),
            task = self.robot_task,
            environment = self.operating_environment,
            features = self.features(),
        )
    }
}

/// Prompt for inventing a new trait in a fixed category.
#[derive(Debug, Clone)]
pub struct TraitGenerationPrompt {
    pub category: TraitCategory,
}

impl TraitGenerationPrompt {
    pub fn new(category: TraitCategory) -> Self {
        Self { category }
    }
}

impl PromptTemplate for TraitGenerationPrompt {
    fn generate(&self) -> String {
        let examples = self
            .category
            .examples()
            .iter()
            .map(|ex| format!("- {}: {}", ex.animal, ex.name))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"Generate a unique biomimetic trait for robotics inspired by nature but different from these examples:
{examples}

{guidance}

Requirements:
1. Choose an animal not listed above
2. Focus on a specific, well-defined feature
3. Explain the mechanism in one clear, technical sentence
4. Rate practicality realistically:
   - Efficiency (how well it performs)
   - Complexity (implementation difficulty)
   - Power (energy requirements)

Format response exactly as JSON:
{{
  "id": "kebab-case-name",
  "name": "Concise Feature Name",
  "animal": "Source Animal",
  "category": "{category}",
  "description": "One clear technical sentence about the mechanism",
  "efficiency": number (0-100),
  "complexity": number (0-100),
  "power": number (0-100)
}}"#,
            examples = examples,
            guidance = self.category.guidance(),
            category = self.category.key(),
        )
    }
}

/// Prompt for one chat message, framed by the user's design context.
#[derive(Debug, Clone)]
pub struct ChatPrompt {
    pub message: String,
    pub robot_task: Option<String>,
    pub operating_environment: Option<String>,
    pub key_features: Vec<String>,
}

impl ChatPrompt {
    pub fn new(message: impl Into<String>, prefs: Option<&UserPreferences>) -> Self {
        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
        Self {
            message: message.into(),
            robot_task: prefs.and_then(|p| non_empty(&p.robot_task)),
            operating_environment: prefs.and_then(|p| non_empty(&p.operating_environment)),
            key_features: prefs.map(|p| p.key_features.clone()).unwrap_or_default(),
        }
    }
}

impl PromptTemplate for ChatPrompt {
    fn system_prompt(&self) -> Option<String> {
        let features = if self.key_features.is_empty() {
            NOT_SPECIFIED.to_string()
        } else {
            self.key_features.join(", ")
        };

        Some(format!(
            "You are a biomimetic robotics design assistant. The user is designing a robot with these specifications:
- Task: {}
- Operating Environment: {}
- Key Features: {}

Use this context to provide relevant suggestions and explanations about animal traits and biomimetic design principles.",
            self.robot_task.as_deref().unwrap_or(NOT_SPECIFIED),
            self.operating_environment.as_deref().unwrap_or(NOT_SPECIFIED),
            features
        ))
    }

    fn generate(&self) -> String {
        let context = self.system_prompt().unwrap_or_default();
        format!("{}\n\nUser: {}", context, self.message)
    }
}

/// Prompt for rendering the assembled robot as a technical diagram.
#[derive(Debug, Clone)]
pub struct ImagePrompt {
    /// `"{part} with {trait} (inspired by {animal}), ..."` per populated part.
    pub features: Vec<String>,
}

impl ImagePrompt {
    pub fn from_parts(parts: &[BodyPart]) -> Self {
        let features = parts
            .iter()
            .filter(|part| !part.traits.is_empty())
            .map(|part| {
                let traits = part
                    .traits
                    .iter()
                    .map(|t| format!("{} (inspired by {})", t.name, t.animal))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{} with {}", part.name, traits)
            })
            .collect();
        Self { features }
    }

    /// False when no part carries a trait; there is nothing to draw.
    pub fn has_features(&self) -> bool {
        !self.features.is_empty()
    }
}

impl PromptTemplate for ImagePrompt {
    fn generate(&self) -> String {
        format!(
            "Create a detailed technical diagram of a biomimetic robot with the following features: {}. \n\
             Style: Clean, technical, detailed engineering diagram with labels. \n\
             Background: White or light gray grid pattern.\n\
             View: Side view with additional detail views of key components.\n\
             Color scheme: Professional blues and grays with accent colors for different systems.",
            self.features.join(". ")
        )
    }
}
