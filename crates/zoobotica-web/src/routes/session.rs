//! Catalog, assembly and profile endpoints for the designer session.

use crate::error::{ApiError, ApiJson};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use zoobotica_core::catalog::{self, CatalogEntry};
use zoobotica_core::payload::{self, DataTransfer};
use zoobotica_core::types::{BodyPart, Environment, RobotSnapshot, TraitType, UserPreferences};
use zoobotica_llm::{ImagePrompt, PromptTemplate, Recommendations};
use zoobotica_render::{draw_base_robot, CommandCanvas, Frame};

const BASE_ROBOT_SIZE: f64 = 400.0;

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub q: String,
}

/// A library entry as served to the viewer: the slot type it drops onto and
/// the transfer data to drag it with.
#[derive(Debug, Serialize)]
pub struct CatalogItem {
    #[serde(flatten)]
    pub entry: &'static CatalogEntry,
    #[serde(rename = "type")]
    pub slot_type: TraitType,
    pub transfer: DataTransfer,
}

/// GET /api/catalog?q=
pub async fn get_catalog(Query(query): Query<CatalogQuery>) -> Json<Vec<CatalogItem>> {
    let items = catalog::search(&query.q)
        .into_iter()
        .map(|entry| CatalogItem {
            entry,
            slot_type: entry.slot_type(),
            transfer: payload::encode_entry(entry),
        })
        .collect();
    Json(items)
}

/// GET /api/assembly
pub async fn get_assembly(State(state): State<AppState>) -> Json<Vec<BodyPart>> {
    Json(state.parts().await)
}

/// POST /api/assembly/:slot/drop
pub async fn drop_trait(
    State(state): State<AppState>,
    Path(slot): Path<String>,
    ApiJson(transfer): ApiJson<DataTransfer>,
) -> Result<Json<BodyPart>, ApiError> {
    state
        .drop_on(&slot, &transfer)
        .await
        .map(Json)
        .map_err(ApiError::Rejected)
}

/// GET /api/session/recommendations
pub async fn get_recommendations(State(state): State<AppState>) -> Json<Option<Recommendations>> {
    Json(state.latest_recommendations().await)
}

/// GET /api/preferences
pub async fn get_preferences(
    State(state): State<AppState>,
) -> Result<Json<Option<UserPreferences>>, ApiError> {
    Ok(Json(state.load_preferences().await?))
}

/// PUT /api/preferences
pub async fn put_preferences(
    State(state): State<AppState>,
    ApiJson(prefs): ApiJson<UserPreferences>,
) -> Result<Json<UserPreferences>, ApiError> {
    let prefs = state.save_preferences(prefs).await?;
    info!(environment = %prefs.environment(), "preferences saved");
    Ok(Json(prefs))
}

/// GET /api/robot
pub async fn get_robot(
    State(state): State<AppState>,
) -> Result<Json<Option<RobotSnapshot>>, ApiError> {
    Ok(Json(state.load_robot().await?))
}

/// PUT /api/robot
///
/// Saves the robot handed to the simulation. A `{}` or `null` body saves the
/// current assembly in the environment implied by the saved preferences.
pub async fn put_robot(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<RobotSnapshot>, ApiError> {
    let robot = match body {
        Value::Null => state.robot(state.saved_environment().await).await,
        Value::Object(ref map) if map.is_empty() => {
            state.robot(state.saved_environment().await).await
        }
        other => serde_json::from_value(other).map_err(|_| ApiError::InvalidRobotData)?,
    };
    let robot = state.save_robot(robot).await?;
    info!(
        environment = %robot.environment,
        parts = robot.parts.len(),
        "robot saved"
    );
    Ok(Json(robot))
}

/// POST /api/robot/image
///
/// Renders the current assembly through the image service.
pub async fn robot_image(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let images = state.images()?;
    let prompt = ImagePrompt::from_parts(&state.parts().await);
    if !prompt.has_features() {
        return Err(ApiError::EmptyRobot);
    }

    let image = images
        .text_to_image(&prompt.generate())
        .await
        .map_err(|e| ApiError::ImageFailed(e.to_string()))?;
    Ok(Json(image))
}

/// GET /api/robots/base/:env
pub async fn base_robot(Path(env): Path<String>) -> Result<Json<Frame>, ApiError> {
    let env = Environment::parse(&env).ok_or(ApiError::UnknownEnvironment(env))?;
    let mut canvas = CommandCanvas::new(BASE_ROBOT_SIZE, BASE_ROBOT_SIZE);
    draw_base_robot(&mut canvas, env);
    Ok(Json(canvas.into_frame(0, 0.0)))
}
