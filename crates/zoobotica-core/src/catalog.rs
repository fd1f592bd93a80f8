//! The static trait library and the trait-generation categories.
//!
//! Nothing here is mutated at runtime. Library entries carry a free-form
//! category plus efficiency/complexity/power ratings; [`CatalogEntry::to_trait`]
//! maps them onto the slot type they fit.

use crate::types::{Trait, TraitType};
use serde::{Deserialize, Serialize};

/// An entry in the animal trait library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub animal: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    /// Ratings, 0-100.
    pub efficiency: u8,
    pub complexity: u8,
    pub power: u8,
}

impl CatalogEntry {
    /// The body-part type this library category plugs into.
    pub fn slot_type(&self) -> TraitType {
        match self.category {
            "sensing" => TraitType::Sensor,
            "grip" | "actuator" => TraitType::Manipulator,
            "locomotion" | "propulsion" => TraitType::Locomotion,
            "balance" => TraitType::Stabilizer,
            _ => TraitType::Core,
        }
    }

    /// Copy this entry out as a droppable trait. Efficiency doubles as
    /// confidence.
    pub fn to_trait(&self) -> Trait {
        Trait::new(self.id, self.name, self.animal, self.slot_type())
            .with_description(self.description)
            .with_confidence(f32::from(self.efficiency) / 100.0)
    }

    fn matches(&self, needle: &str) -> bool {
        [self.name, self.animal, self.category]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

static LIBRARY: [CatalogEntry; 6] = [
    CatalogEntry {
        id: "gecko-feet",
        name: "Adhesive Pads",
        animal: "Gecko",
        description: "Microscopic hairs that allow climbing on virtually any surface through van der Waals forces.",
        category: "grip",
        efficiency: 90,
        complexity: 70,
        power: 20,
    },
    CatalogEntry {
        id: "cheetah-legs",
        name: "High-Speed Legs",
        animal: "Cheetah",
        description: "Powerful leg muscles and flexible spine for incredible acceleration and speed.",
        category: "locomotion",
        efficiency: 95,
        complexity: 85,
        power: 90,
    },
    CatalogEntry {
        id: "eagle-eyes",
        name: "High-Resolution Vision",
        animal: "Eagle",
        description: "Extremely sharp vision with high density of photoreceptors.",
        category: "sensing",
        efficiency: 95,
        complexity: 80,
        power: 40,
    },
    CatalogEntry {
        id: "octopus-arms",
        name: "Flexible Manipulator",
        animal: "Octopus",
        description: "Highly dexterous tentacles with distributed neural control.",
        category: "actuator",
        efficiency: 85,
        complexity: 90,
        power: 60,
    },
    CatalogEntry {
        id: "shark-skin",
        name: "Drag-Reducing Surface",
        animal: "Shark",
        description: "Microscopic scales that reduce drag in fluid environments.",
        category: "surface",
        efficiency: 80,
        complexity: 65,
        power: 30,
    },
    CatalogEntry {
        id: "dolphin-fins",
        name: "Efficient Propulsion",
        animal: "Dolphin",
        description: "Streamlined fins for efficient aquatic propulsion.",
        category: "propulsion",
        efficiency: 90,
        complexity: 75,
        power: 70,
    },
];

/// The full trait library.
pub fn library() -> &'static [CatalogEntry] {
    &LIBRARY
}

/// Library entries whose name, animal or category contains `query`
/// (case-insensitive). An empty query returns everything.
pub fn search(query: &str) -> Vec<&'static CatalogEntry> {
    let needle = query.trim().to_lowercase();
    LIBRARY.iter().filter(|e| e.matches(&needle)).collect()
}

pub fn find(id: &str) -> Option<&'static CatalogEntry> {
    LIBRARY.iter().find(|e| e.id == id)
}

/// An existing trait shown to the generator so it picks something new.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleTrait {
    pub id: &'static str,
    pub name: &'static str,
    pub animal: &'static str,
}

/// The six categories new traits can be generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraitCategory {
    LocomotionSystems,
    EndEffectors,
    Actuators,
    PerceptionSystems,
    SurfaceSystems,
    BalanceAndControl,
}

impl TraitCategory {
    pub const ALL: [TraitCategory; 6] = [
        TraitCategory::LocomotionSystems,
        TraitCategory::EndEffectors,
        TraitCategory::Actuators,
        TraitCategory::PerceptionSystems,
        TraitCategory::SurfaceSystems,
        TraitCategory::BalanceAndControl,
    ];

    /// The exact key clients send.
    pub fn key(&self) -> &'static str {
        match self {
            TraitCategory::LocomotionSystems => "Locomotion Systems",
            TraitCategory::EndEffectors => "End Effectors",
            TraitCategory::Actuators => "Actuators",
            TraitCategory::PerceptionSystems => "Perception Systems",
            TraitCategory::SurfaceSystems => "Surface Systems",
            TraitCategory::BalanceAndControl => "Balance & Control",
        }
    }

    /// Exact, case-sensitive key lookup.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// Direction given to the generator for this category.
    pub fn guidance(&self) -> &'static str {
        match self {
            TraitCategory::LocomotionSystems => {
                "Focus on unique movement mechanisms that could revolutionize robot mobility"
            }
            TraitCategory::EndEffectors => {
                "Consider unique ways animals manipulate objects or interact with their environment"
            }
            TraitCategory::Actuators => {
                "Think about specialized joints or muscles that enable unique movements"
            }
            TraitCategory::PerceptionSystems => {
                "Focus on extraordinary sensory capabilities that could enhance robot awareness"
            }
            TraitCategory::SurfaceSystems => {
                "Consider unique surface adaptations that enhance functionality"
            }
            TraitCategory::BalanceAndControl => {
                "Think about how animals maintain stability during complex movements"
            }
        }
    }

    pub fn examples(&self) -> &'static [ExampleTrait] {
        match self {
            TraitCategory::LocomotionSystems => &[
                ExampleTrait { id: "gecko-feet", name: "Adhesive Pads", animal: "Gecko" },
                ExampleTrait { id: "cheetah-legs", name: "Sprint Mechanics", animal: "Cheetah" },
            ],
            TraitCategory::EndEffectors => &[ExampleTrait {
                id: "octopus-tentacles",
                name: "Adaptive Grippers",
                animal: "Octopus",
            }],
            TraitCategory::Actuators => &[ExampleTrait {
                id: "elephant-trunk",
                name: "Flexible Manipulator",
                animal: "Elephant",
            }],
            TraitCategory::PerceptionSystems => &[ExampleTrait {
                id: "eagle-eyes",
                name: "High-Resolution Vision",
                animal: "Eagle",
            }],
            TraitCategory::SurfaceSystems => &[ExampleTrait {
                id: "shark-scales",
                name: "Dynamic Surface",
                animal: "Shark",
            }],
            TraitCategory::BalanceAndControl => &[ExampleTrait {
                id: "kangaroo-tail",
                name: "Counterbalance System",
                animal: "Kangaroo",
            }],
        }
    }
}

/// A trait invented by the text model for one of the [`TraitCategory`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedTrait {
    pub id: String,
    pub name: String,
    pub animal: String,
    pub category: String,
    pub description: String,
    pub efficiency: f64,
    pub complexity: f64,
    pub power: f64,
}

impl GeneratedTrait {
    pub const REQUIRED_FIELDS: [&'static str; 8] = [
        "id",
        "name",
        "animal",
        "category",
        "description",
        "efficiency",
        "complexity",
        "power",
    ];
}
