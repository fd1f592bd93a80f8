//! Drag payload encoding and decoding.
//!
//! A dragged trait travels as a [`DataTransfer`]: a map from MIME type to
//! string data, the same shape a browser drag event carries. The payload is
//! written redundantly as `application/json` and `text/plain`. Decoding
//! prefers the structured format and falls back to plain text; a payload that
//! decodes from neither is simply ignored.

use crate::catalog::CatalogEntry;
use crate::types::{clamp_unit, Trait, TraitType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MIME_JSON: &str = "application/json";
pub const MIME_TEXT: &str = "text/plain";

/// Format-keyed drag data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataTransfer {
    items: BTreeMap<String, String>,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_data(&mut self, format: impl Into<String>, data: impl Into<String>) {
        self.items.insert(format.into(), data.into());
    }

    /// Data stored under `format`. Empty strings count as absent.
    pub fn get_data(&self, format: &str) -> Option<&str> {
        self.items
            .get(format)
            .map(String::as_str)
            .filter(|data| !data.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.items.values().all(String::is_empty)
    }
}

/// The fields carried by a dragged trait.
///
/// Every field is optional on the wire; the type tag is kept as a raw string
/// so the receiving slot can compare it case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragPayload {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_tag: String,
    #[serde(default)]
    pub animal: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl DragPayload {
    pub fn from_trait(t: &Trait) -> Self {
        Self {
            id: t.id.clone(),
            name: t.name.clone(),
            type_tag: t.trait_type.as_str().to_lowercase(),
            animal: t.animal.clone(),
            description: t.description.clone(),
            confidence: Some(t.confidence),
        }
    }

    /// The payload's type, if it names one of the five trait types.
    pub fn trait_type(&self) -> Option<TraitType> {
        TraitType::parse(&self.type_tag)
    }

    /// Validate the type tag and build the trait the payload describes.
    pub fn into_trait(self) -> Option<Trait> {
        let trait_type = self.trait_type()?;
        Some(Trait {
            id: self.id,
            name: self.name,
            animal: self.animal,
            description: self.description,
            trait_type,
            confidence: clamp_unit(self.confidence.unwrap_or(1.0)),
        })
    }

    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Build the transfer data for dragging `t`.
pub fn encode(t: &Trait) -> DataTransfer {
    encode_payload(&DragPayload::from_trait(t))
}

/// Build the transfer data for dragging a library entry.
pub fn encode_entry(entry: &CatalogEntry) -> DataTransfer {
    encode(&entry.to_trait())
}

fn encode_payload(payload: &DragPayload) -> DataTransfer {
    let json = payload.to_json();
    let mut transfer = DataTransfer::new();
    transfer.set_data(MIME_TEXT, json.clone());
    transfer.set_data(MIME_JSON, json);
    transfer
}

/// Decode a drop. Structured data wins; plain text is the fallback.
pub fn decode(transfer: &DataTransfer) -> Option<DragPayload> {
    [MIME_JSON, MIME_TEXT]
        .into_iter()
        .filter_map(|format| transfer.get_data(format))
        .find_map(parse_payload)
}

fn parse_payload(data: &str) -> Option<DragPayload> {
    serde_json::from_str::<DragPayload>(data).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gecko() -> Trait {
        Trait::new("gecko-feet", "Adhesive Pads", "Gecko", TraitType::Locomotion)
            .with_description("Microscopic hairs for climbing")
            .with_confidence(0.9)
    }

    #[test]
    fn encode_sets_both_formats() {
        let transfer = encode(&gecko());
        let json = transfer.get_data(MIME_JSON).unwrap();
        assert_eq!(Some(json), transfer.get_data(MIME_TEXT));

        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(value["type"], "locomotion");
        assert_eq!(value["id"], "gecko-feet");
    }

    #[test]
    fn decode_prefers_structured_format() {
        let mut transfer = DataTransfer::new();
        transfer.set_data(MIME_JSON, r#"{"id":"json","type":"core"}"#);
        transfer.set_data(MIME_TEXT, r#"{"id":"text","type":"core"}"#);
        assert_eq!(decode(&transfer).unwrap().id, "json");
    }

    #[test]
    fn decode_falls_back_to_text_when_json_malformed() {
        let mut transfer = DataTransfer::new();
        transfer.set_data(MIME_JSON, "{not json");
        transfer.set_data(MIME_TEXT, r#"{"id":"text","type":"Sensor"}"#);
        let payload = decode(&transfer).unwrap();
        assert_eq!(payload.id, "text");
        assert_eq!(payload.trait_type(), Some(TraitType::Sensor));
    }

    #[test]
    fn decode_falls_back_to_text_when_json_absent() {
        let mut transfer = DataTransfer::new();
        transfer.set_data(MIME_JSON, "");
        transfer.set_data(MIME_TEXT, r#"{"id":"only-text","type":"core"}"#);
        assert_eq!(decode(&transfer).unwrap().id, "only-text");
    }

    #[test]
    fn decode_gives_up_quietly() {
        assert!(decode(&DataTransfer::new()).is_none());

        let mut transfer = DataTransfer::new();
        transfer.set_data(MIME_JSON, "[1, 2");
        transfer.set_data(MIME_TEXT, "Adhesive Pads");
        assert!(decode(&transfer).is_none());
    }

    #[test]
    fn into_trait_rejects_unknown_type() {
        let mut transfer = DataTransfer::new();
        transfer.set_data(MIME_JSON, r#"{"id":"wing","type":"wings"}"#);
        let payload = decode(&transfer).unwrap();
        assert!(payload.into_trait().is_none());
    }

    #[test]
    fn into_trait_preserves_fields() {
        let original = gecko();
        let decoded = decode(&encode(&original)).unwrap().into_trait().unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn transfer_serializes_as_plain_map() {
        let mut transfer = DataTransfer::new();
        transfer.set_data(MIME_TEXT, "x");
        let json = serde_json::to_value(&transfer).unwrap();
        assert_eq!(json, serde_json::json!({"text/plain": "x"}));
    }
}
