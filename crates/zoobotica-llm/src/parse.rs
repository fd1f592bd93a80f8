//! Parsing model replies into typed results.
//!
//! Models wrap JSON in prose or code fences, so replies are trimmed to the
//! outermost `{ ... }` span before parsing.

use crate::backend::{LlmError, LlmResult};
use crate::types::Recommendations;
use serde::Deserialize;
use serde_json::Value;
use zoobotica_core::catalog::GeneratedTrait;
use zoobotica_core::types::{Trait, TraitType};

/// The span from the first `{` to the last `}`, if any.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[derive(Debug, Deserialize)]
struct RawRecommendations {
    #[serde(default)]
    summary: Option<Vec<String>>,
    #[serde(default)]
    recommendations: Option<Vec<Value>>,
}

/// Parse a recommendation reply. Entries are filtered on `type` alone: any
/// entry naming one of the five trait types is kept, with absent text fields
/// left empty and an unreadable confidence treated as 1.
pub fn parse_recommendations(response: &str) -> LlmResult<Recommendations> {
    let json = extract_json_object(response)
        .ok_or_else(|| LlmError::ParseError("No JSON object found in response".to_string()))?;

    let raw: RawRecommendations = serde_json::from_str(json).map_err(|e| {
        LlmError::ParseError(format!("Failed to parse recommendations from API response: {}", e))
    })?;

    let entries = raw.recommendations.unwrap_or_default();
    let total = entries.len();
    let recommendations: Vec<Trait> = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| recommended_trait(index, entry))
        .collect();

    if recommendations.len() < total {
        tracing::debug!(
            kept = recommendations.len(),
            dropped = total - recommendations.len(),
            "filtered recommendations with unknown trait types"
        );
    }

    Ok(Recommendations {
        summary: raw.summary.unwrap_or_default(),
        recommendations,
    })
}

fn recommended_trait(index: usize, entry: &Value) -> Option<Trait> {
    let trait_type = entry
        .get("type")
        .and_then(Value::as_str)
        .and_then(TraitType::parse)?;

    let text = |field: &str| -> String {
        match entry.get(field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    };
    let id = match text("id") {
        id if id.is_empty() => format!("recommendation-{}", index + 1),
        id => id,
    };
    let confidence = match entry.get("confidence") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .unwrap_or(1.0);

    Some(
        Trait::new(id, text("name"), text("animal"), trait_type)
            .with_description(text("description"))
            .with_confidence(confidence as f32),
    )
}

/// Parse a generated trait, insisting on every field of [`GeneratedTrait`].
pub fn parse_generated_trait(response: &str) -> LlmResult<GeneratedTrait> {
    let json = extract_json_object(response)
        .ok_or_else(|| LlmError::ParseError("No JSON object found in response".to_string()))?;

    let value: Value =
        serde_json::from_str(json).map_err(|e| LlmError::ParseError(e.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| LlmError::ParseError("Generated trait is not an object".to_string()))?;

    let missing: Vec<&str> = GeneratedTrait::REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !object.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        return Err(LlmError::ParseError(format!(
            "Generated trait missing required fields: {}",
            missing.join(", ")
        )));
    }

    serde_json::from_value(value).map_err(|e| LlmError::ParseError(e.to_string()))
}
