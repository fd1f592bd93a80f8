//! The body assembly store.
//!
//! Six fixed slots, each holding the traits dropped onto it in drop order.
//! A trait is accepted iff its type tag matches the slot's type
//! (case-insensitive). Slots only ever grow.

use crate::error::DropError;
use crate::payload::{self, DataTransfer, DragPayload};
use crate::types::{BodyPart, Environment, RobotSnapshot, Trait};

#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyStore {
    parts: Vec<BodyPart>,
}

impl Default for AssemblyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AssemblyStore {
    /// A store holding the six standard, empty slots.
    pub fn new() -> Self {
        Self {
            parts: BodyPart::standard_slots(),
        }
    }

    /// Rebuild a store from a previously taken snapshot. Slots missing from
    /// the snapshot start empty; unknown slots are dropped.
    pub fn from_snapshot(snapshot: &RobotSnapshot) -> Self {
        let mut store = Self::new();
        for saved in &snapshot.parts {
            if let Some(part) = store.part_mut(&saved.id) {
                part.traits = saved
                    .traits
                    .iter()
                    .filter(|t| part.part_type == t.trait_type)
                    .cloned()
                    .collect();
            }
        }
        store
    }

    /// Drop `transfer` onto `slot_id`.
    ///
    /// Returns the updated slot, or `None` when the payload could not be
    /// decoded, the slot does not exist, or the types differ. State is left
    /// untouched in every `None` case.
    pub fn accept(&mut self, slot_id: &str, transfer: &DataTransfer) -> Option<&BodyPart> {
        self.try_accept(slot_id, transfer).ok()
    }

    /// Like [`accept`](Self::accept), but reports why a drop was rejected.
    pub fn try_accept(
        &mut self,
        slot_id: &str,
        transfer: &DataTransfer,
    ) -> Result<&BodyPart, DropError> {
        let payload = payload::decode(transfer).ok_or(DropError::Undecodable)?;
        self.accept_payload(slot_id, payload)
    }

    /// Append an already decoded payload.
    pub fn accept_payload(
        &mut self,
        slot_id: &str,
        payload: DragPayload,
    ) -> Result<&BodyPart, DropError> {
        let part = self
            .part_mut(slot_id)
            .ok_or_else(|| DropError::UnknownSlot(slot_id.to_string()))?;

        if !part.accepts(&payload.type_tag) {
            return Err(DropError::TypeMismatch {
                expected: part.part_type,
                found: payload.type_tag,
            });
        }

        // accepts() guarantees the tag parses
        let found = payload.type_tag.clone();
        let t = payload.into_trait().ok_or(DropError::TypeMismatch {
            expected: part.part_type,
            found,
        })?;
        part.traits.push(t);
        Ok(part)
    }

    /// Traits on `slot_id`, in drop order.
    pub fn read(&self, slot_id: &str) -> Option<&[Trait]> {
        self.part(slot_id).map(|p| p.traits.as_slice())
    }

    pub fn part(&self, slot_id: &str) -> Option<&BodyPart> {
        self.parts.iter().find(|p| p.id == slot_id)
    }

    fn part_mut(&mut self, slot_id: &str) -> Option<&mut BodyPart> {
        self.parts.iter_mut().find(|p| p.id == slot_id)
    }

    pub fn parts(&self) -> &[BodyPart] {
        &self.parts
    }

    /// True while no slot holds a trait.
    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(|p| p.traits.is_empty())
    }

    pub fn trait_count(&self) -> usize {
        self.parts.iter().map(|p| p.traits.len()).sum()
    }

    /// Copy the current assembly out for the simulation view.
    pub fn snapshot(&self, environment: Environment) -> RobotSnapshot {
        RobotSnapshot {
            parts: self.parts.clone(),
            environment,
        }
    }
}
