//! Shared types used across the Zoobotica crates.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// The robot subsystem a trait enhances.
///
/// Serialized lower-case. Parsing is case-insensitive, so `"Sensor"` and
/// `"sensor"` name the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitType {
    Sensor,
    Core,
    Manipulator,
    Locomotion,
    Stabilizer,
}

impl TraitType {
    pub const ALL: [TraitType; 5] = [
        TraitType::Sensor,
        TraitType::Core,
        TraitType::Manipulator,
        TraitType::Locomotion,
        TraitType::Stabilizer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TraitType::Sensor => "sensor",
            TraitType::Core => "core",
            TraitType::Manipulator => "manipulator",
            TraitType::Locomotion => "locomotion",
            TraitType::Stabilizer => "stabilizer",
        }
    }

    /// Human-readable name of the robot system this type plugs into.
    pub fn system_name(&self) -> &'static str {
        match self {
            TraitType::Sensor => "Sensor Array",
            TraitType::Core => "Core System",
            TraitType::Manipulator => "Manipulator",
            TraitType::Locomotion => "Locomotion System",
            TraitType::Stabilizer => "Stabilization Unit",
        }
    }

    /// What the system is responsible for, as used in recommendation prompts.
    pub fn responsibilities(&self) -> &'static str {
        match self {
            TraitType::Sensor => "vision, detection, processing",
            TraitType::Core => "protection, adaptation, power",
            TraitType::Manipulator => "grasping, handling, interaction",
            TraitType::Locomotion => "movement, balance, terrain adaptation",
            TraitType::Stabilizer => "balance, steering, optional",
        }
    }

    /// Case-insensitive lookup.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for TraitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraitType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown trait type: {}", s))
    }
}

impl<'de> Deserialize<'de> for TraitType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        TraitType::parse(&raw).ok_or_else(|| {
            serde::de::Error::unknown_variant(
                &raw,
                &["sensor", "core", "manipulator", "locomotion", "stabilizer"],
            )
        })
    }
}

/// An animal-inspired capability that can be attached to a body part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trait {
    pub id: String,
    pub name: String,
    pub animal: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub trait_type: TraitType,
    /// Match quality in [0, 1].
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

fn default_confidence() -> f32 {
    1.0
}

impl Trait {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        animal: impl Into<String>,
        trait_type: TraitType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            animal: animal.into(),
            description: String::new(),
            trait_type,
            confidence: 1.0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = clamp_unit(confidence);
        self
    }
}

pub(crate) fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// One of the six fixed robot subsystems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyPart {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub part_type: TraitType,
    #[serde(default)]
    pub traits: Vec<Trait>,
}

impl BodyPart {
    pub fn new(id: impl Into<String>, name: impl Into<String>, part_type: TraitType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            part_type,
            traits: Vec::new(),
        }
    }

    /// The six slots every robot starts with.
    pub fn standard_slots() -> Vec<BodyPart> {
        vec![
            BodyPart::new("sensor", "Sensor Array", TraitType::Sensor),
            BodyPart::new("core", "Core System", TraitType::Core),
            BodyPart::new("manipulator-left", "Left Manipulator", TraitType::Manipulator),
            BodyPart::new("manipulator-right", "Right Manipulator", TraitType::Manipulator),
            BodyPart::new("locomotion", "Locomotion System", TraitType::Locomotion),
            BodyPart::new("stabilizer", "Stabilization Unit", TraitType::Stabilizer),
        ]
    }

    /// Whether a trait tagged `tag` may be dropped here (case-insensitive).
    pub fn accepts(&self, tag: &str) -> bool {
        self.part_type.as_str().eq_ignore_ascii_case(tag.trim())
    }
}

/// Answers from the onboarding questionnaire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub robot_task: String,
    pub operating_environment: String,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_design: Option<String>,
}

impl UserPreferences {
    pub fn new(
        robot_task: impl Into<String>,
        operating_environment: impl Into<String>,
        key_features: Vec<String>,
    ) -> Self {
        Self {
            robot_task: robot_task.into(),
            operating_environment: operating_environment.into(),
            key_features,
            generated_design: None,
        }
    }

    /// The simulation environment implied by the robot task.
    pub fn environment(&self) -> Environment {
        Environment::from_task(&self.robot_task)
    }
}

/// The backdrop a robot is simulated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Land,
    Water,
    Air,
}

impl Environment {
    pub const ALL: [Environment; 3] = [Environment::Land, Environment::Water, Environment::Air];

    /// Water tasks swim, flying tasks take to the air, everything else walks.
    pub fn from_task(task: &str) -> Self {
        let task = task.to_lowercase();
        if task.contains("water") {
            Environment::Water
        } else if task.contains("fly") {
            Environment::Air
        } else {
            Environment::Land
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Land => "land",
            Environment::Water => "water",
            Environment::Air => "air",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The assembly snapshot handed to the simulation view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotSnapshot {
    pub parts: Vec<BodyPart>,
    #[serde(default)]
    pub environment: Environment,
}

/// A single scored dimension of a performance analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceScore {
    pub score: u32,
    pub explanation: String,
}

impl PerformanceScore {
    pub fn new(score: u32, explanation: impl Into<String>) -> Self {
        Self {
            score,
            explanation: explanation.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceScores {
    pub mobility: PerformanceScore,
    pub durability: PerformanceScore,
    pub efficiency: PerformanceScore,
    pub task_suitability: PerformanceScore,
}

/// Where an analysis came from. Only the randomized demo analyzer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    #[default]
    Demo,
}

/// Scores, strengths and limitations of an assembled robot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceAnalysis {
    pub performance_scores: PerformanceScores,
    pub strengths: Vec<String>,
    pub limitations: Vec<String>,
    pub overall_score: u32,
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub mode: AnalysisMode,
}

impl PerformanceAnalysis {
    /// The four overlay metrics in display order.
    pub fn metrics(&self) -> [(&'static str, u32); 4] {
        let s = &self.performance_scores;
        [
            ("Mobility", s.mobility.score),
            ("Durability", s.durability.score),
            ("Efficiency", s.efficiency.score),
            ("Task Fit", s.task_suitability.score),
        ]
    }
}
