//! Convenience re-exports for common Zoobotica types.

pub use crate::analysis::DemoAnalyzer;
pub use crate::assembly::AssemblyStore;
pub use crate::catalog::{CatalogEntry, TraitCategory};
pub use crate::error::{DropError, Result, ZoobotError};
pub use crate::latest::{Latest, Ticket};
pub use crate::payload::{self, DataTransfer, DragPayload};
pub use crate::types::*;
