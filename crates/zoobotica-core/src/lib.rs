//! # Zoobotica Core
//!
//! Core types and in-memory state for the Zoobotica robot designer.
//!
//! A robot is assembled by dropping animal-inspired traits onto six fixed
//! body-part slots. This crate holds everything that does not touch the
//! network:
//!
//! - **types**: traits, body parts, user preferences, performance analysis
//! - **catalog**: the static trait library and trait-generation categories
//! - **payload**: drag payload encoding and decoding
//! - **assembly**: the body assembly store and its type-compatibility rule
//! - **analysis**: the demo-mode performance analyzer
//! - **latest**: last-issued-wins sequencing for overlapping requests
//!
//! ## Quick Start
//!
//! ```rust
//! use zoobotica_core::prelude::*;
//!
//! let mut store = AssemblyStore::new();
//! let eyes = Trait::new("eagle-eyes", "High-Resolution Vision", "Eagle", TraitType::Sensor);
//!
//! let transfer = payload::encode(&eyes);
//! assert!(store.accept("sensor", &transfer).is_some());
//! assert!(store.accept("core", &transfer).is_none());
//! assert_eq!(store.read("sensor").map(|t| t.len()), Some(1));
//! ```

pub mod analysis;
pub mod assembly;
pub mod catalog;
pub mod error;
pub mod latest;
pub mod payload;
pub mod prelude;
pub mod types;
