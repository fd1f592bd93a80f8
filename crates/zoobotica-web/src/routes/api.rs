//! The generation and analysis endpoints.

use crate::error::{ApiError, ApiJson};
use crate::state::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Map, Value};
use tracing::{debug, info};
use zoobotica_core::catalog::{GeneratedTrait, TraitCategory};
use zoobotica_core::types::{PerformanceAnalysis, UserPreferences};
use zoobotica_llm::{ChatTurn, Recommendations};

const PREFERENCE_FIELDS: [&str; 3] = ["robotTask", "operatingEnvironment", "keyFeatures"];

/// Field lookup on a request body. Null, `false` and empty strings count as
/// missing.
fn field<'a>(body: &'a Value, name: &str) -> Option<&'a Value> {
    match body.get(name)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        v => Some(v),
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn features(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().map(text).collect(),
        Some(other) => vec![text(other)],
        None => Vec::new(),
    }
}

fn preferences(body: &Value) -> Option<UserPreferences> {
    Some(UserPreferences::new(
        text(field(body, "robotTask")?),
        text(field(body, "operatingEnvironment")?),
        features(field(body, "keyFeatures")),
    ))
}

// Chat context. Each field falls back on its own, so a partial object still
// reaches the prompt.
fn chat_preferences(body: &Value) -> Option<UserPreferences> {
    let prefs = body.get("preferences").filter(|p| p.is_object())?;
    Some(UserPreferences::new(
        field(prefs, "robotTask").map(text).unwrap_or_default(),
        field(prefs, "operatingEnvironment").map(text).unwrap_or_default(),
        features(field(prefs, "keyFeatures")),
    ))
}

// Prior turns. Any role other than `user` counts as the assistant; turns
// without text content are skipped.
fn chat_history(body: &Value) -> Vec<ChatTurn> {
    let Some(turns) = body.get("history").and_then(Value::as_array) else {
        return Vec::new();
    };
    turns
        .iter()
        .filter_map(|turn| {
            let content = turn.get("content")?.as_str()?;
            Some(match turn.get("role").and_then(Value::as_str) {
                Some("user") => ChatTurn::user(content),
                _ => ChatTurn::assistant(content),
            })
        })
        .collect()
}

// The preference fields the client actually sent.
fn received(body: &Value) -> Value {
    let fields: Map<String, Value> = PREFERENCE_FIELDS
        .iter()
        .filter_map(|&name| Some((name.to_string(), body.get(name)?.clone())))
        .collect();
    Value::Object(fields)
}

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<Value>, ApiError> {
    let message = field(&body, "message")
        .map(text)
        .ok_or(ApiError::MissingFields { received: None })?;
    let llm = state.llm()?;

    let prefs = chat_preferences(&body);
    let history = chat_history(&body);
    debug!(history = history.len(), "chat request");

    let response = llm
        .chat(&message, prefs.as_ref(), &history)
        .await
        .map_err(|e| ApiError::upstream("Failed to generate response", e))?;
    Ok(Json(json!({ "response": response })))
}

/// POST /api/generate
pub async fn generate(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<Value>, ApiError> {
    let prefs = match (preferences(&body), field(&body, "keyFeatures")) {
        (Some(prefs), Some(_)) => prefs,
        _ => {
            return Err(ApiError::MissingFields {
                received: Some(received(&body)),
            })
        }
    };
    let llm = state.llm()?;

    let design = llm
        .generate_design(&prefs)
        .await
        .map_err(|e| ApiError::upstream("Failed to generate response", e))?;
    Ok(Json(json!({ "design": design })))
}

/// POST /api/recommendations
///
/// The result also becomes the session's latest recommendations, unless a
/// request issued later has already completed.
pub async fn recommendations(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<Recommendations>, ApiError> {
    let prefs = preferences(&body).ok_or(ApiError::MissingFields { received: None })?;
    let llm = state.llm()?;

    let ticket = state.issue_recommendations().await;
    let recs = llm
        .recommend_traits(&prefs)
        .await
        .map_err(|e| ApiError::upstream("Failed to generate recommendations", e))?;

    info!(
        count = recs.recommendations.len(),
        ticket = ticket.sequence(),
        "recommendations generated"
    );
    state.complete_recommendations(ticket, recs.clone()).await;
    Ok(Json(recs))
}

/// POST /api/traits/generate
pub async fn generate_trait(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<Value>, ApiError> {
    let category = body
        .get("category")
        .and_then(Value::as_str)
        .and_then(TraitCategory::from_key)
        .ok_or(ApiError::InvalidCategory)?;
    let llm = state.llm()?;

    let generated: GeneratedTrait = llm.generate_trait(category).await.map_err(|e| {
        debug!("trait generation failed: {}", e);
        ApiError::Upstream {
            error: "Failed to generate trait",
            details: None,
        }
    })?;
    Ok(Json(json!({ "trait": generated })))
}

/// POST /api/generate-image
pub async fn generate_image(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<Value>, ApiError> {
    let images = state.images()?;
    let prompt = field(&body, "prompt")
        .map(text)
        .ok_or(ApiError::MissingFields { received: None })?;

    let image = images
        .text_to_image(&prompt)
        .await
        .map_err(|e| ApiError::ImageFailed(e.to_string()))?;
    Ok(Json(image))
}

/// POST /api/analyze-performance
pub async fn analyze_performance(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<PerformanceAnalysis>, ApiError> {
    let robot_data = body.get("robotData").ok_or(ApiError::InvalidRobotData)?;
    let analysis = state.analyze(robot_data)?;
    debug!(overall = analysis.overall_score, "demo analysis published");
    Ok(Json(analysis))
}
