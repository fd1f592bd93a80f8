//! Router tests against mock backends.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use zoobotica_core::{catalog, payload};
use zoobotica_llm::{MockBackend, MockImageBackend};
use zoobotica_render::RenderConfig;
use zoobotica_web::{routes, AppState, ProfileStore};

const RECOMMENDATIONS: &str = r#"Here you go:
```json
{"summary": ["Aquatic focus", "Precise grip"], "recommendations": [
  {"id": "r1", "name": "Lateral Line", "animal": "Fish", "description": "Flow sensing", "type": "Sensor", "confidence": 0.9},
  {"id": "r2", "name": "Tail Fin", "animal": "Tuna", "description": "Thrust", "type": "fin", "confidence": 0.8},
  {"id": "r3", "name": "Sucker Array", "animal": "Octopus", "description": "Grip", "type": "manipulator", "confidence": 0.85}
]}
```"#;

const GENERATED_TRAIT: &str = r#"{"id": "mole-claws", "name": "Digging Claws", "animal": "Mole",
  "category": "End Effectors", "description": "Spade claws loosen soil.",
  "efficiency": 80, "complexity": 40, "power": 55}"#;

struct Harness {
    app: Router,
    llm: Arc<MockBackend>,
    images: Arc<MockImageBackend>,
    _dir: TempDir,
}

fn harness_with(llm: MockBackend, images: MockImageBackend) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let llm = Arc::new(llm);
    let images = Arc::new(images);
    let state = AppState::new(ProfileStore::new(dir.path()), RenderConfig::default())
        .with_llm(llm.clone())
        .with_images(images.clone());
    Harness {
        app: routes::create_router(state, None),
        llm,
        images,
        _dir: dir,
    }
}

fn harness() -> Harness {
    harness_with(
        MockBackend::new()
            .with_response("As a biomimetic robotics expert", RECOMMENDATIONS)
            .with_response("Generate a unique biomimetic trait", GENERATED_TRAIT)
            .with_response("Design a biomimetic robot", "Give it dolphin fins.")
            .with_default_response("Try gecko feet."),
        MockImageBackend::new(),
    )
}

fn unconfigured() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(ProfileStore::new(dir.path()), RenderConfig::default());
    (routes::create_router(state, None), dir)
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if body.is_some() {
        request = request.header("content-type", "application/json");
    }
    let request = request
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    call(app, "POST", uri, Some(&body.to_string())).await
}

// --- /api/generate ---

#[tokio::test]
async fn generate_rejects_missing_fields_without_calling_upstream() {
    let h = harness();
    let (status, body) = post(
        &h.app,
        "/api/generate",
        json!({"robotTask": "", "operatingEnvironment": "reef"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");
    assert_eq!(body["received"], json!({"robotTask": "", "operatingEnvironment": "reef"}));
    assert_eq!(h.llm.calls(), 0);
}

#[tokio::test]
async fn generate_without_api_key_is_a_server_error() {
    let (app, _dir) = unconfigured();
    let (status, body) = post(
        &app,
        "/api/generate",
        json!({"robotTask": "swim", "operatingEnvironment": "ocean", "keyFeatures": ["speed"]}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "API key not configured"}));
}

#[tokio::test]
async fn generate_returns_design() {
    let h = harness();
    let (status, body) = post(
        &h.app,
        "/api/generate",
        json!({"robotTask": "swim", "operatingEnvironment": "ocean", "keyFeatures": []}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["design"], "Give it dolphin fins.");
    assert_eq!(h.llm.calls(), 1);
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let h = harness();
    for uri in ["/api/generate", "/api/chat", "/api/traits/generate", "/api/analyze-performance"] {
        let (status, body) = call(&h.app, "POST", uri, Some("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"], "Invalid JSON in request body", "{}", uri);
    }
    assert_eq!(h.llm.calls(), 0);
}

// --- /api/chat ---

#[tokio::test]
async fn chat_requires_a_message() {
    let h = harness();
    let (status, body) = post(&h.app, "/api/chat", json!({"history": []})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing required fields"}));
}

#[tokio::test]
async fn chat_replies() {
    let h = harness();
    let (status, body) = post(
        &h.app,
        "/api/chat",
        json!({
            "message": "How do I climb glass?",
            "preferences": {"robotTask": "climb", "operatingEnvironment": "city", "keyFeatures": []},
            "history": [{"role": "user", "content": "hi"}, {"role": "assistant", "content": "hello"}]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Try gecko feet.");
}

#[tokio::test]
async fn chat_upstream_failure_carries_details() {
    let h = harness_with(MockBackend::new().failing(), MockImageBackend::new());
    let (status, body) = post(&h.app, "/api/chat", json!({"message": "hi"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to generate response");
    assert!(body["details"].as_str().unwrap().contains("Mock failure"));
}

#[tokio::test]
async fn chat_keeps_partial_preferences() {
    let h = harness_with(
        MockBackend::new()
            .with_response("Task: swim", "saw task")
            .with_default_response("lost task"),
        MockImageBackend::new(),
    );
    let (status, body) = post(
        &h.app,
        "/api/chat",
        json!({"message": "hi", "preferences": {"robotTask": "swim"}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "saw task");
}

#[tokio::test]
async fn chat_keeps_history_around_odd_turns() {
    let h = harness_with(
        MockBackend::new()
            .with_response("Assistant: keep answers short", "kept history")
            .with_default_response("lost history"),
        MockImageBackend::new(),
    );
    let (status, body) = post(
        &h.app,
        "/api/chat",
        json!({
            "message": "and legs?",
            "history": [
                {"role": "user", "content": "hi"},
                {"role": "system", "content": "keep answers short"},
                {"role": "assistant"}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "kept history");
}

// --- /api/recommendations ---

#[tokio::test]
async fn recommendations_filter_on_type_only() {
    let reply = r#"{"recommendations": [
        {"name": "Whiskers", "animal": "Seal", "description": "Wake tracking", "type": "sensor", "confidence": 0.9},
        {"id": "fin", "name": "Fin", "animal": "Tuna", "type": "locomotion", "confidence": "high"},
        {"id": "wing", "name": "Wing", "animal": "Bat", "type": "wings"}
    ]}"#;
    let h = harness_with(MockBackend::new().with_default_response(reply), MockImageBackend::new());
    let (status, body) = post(
        &h.app,
        "/api/recommendations",
        json!({"robotTask": "patrol harbours", "operatingEnvironment": "sea"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0]["animal"], "Seal");
    assert_eq!(recs[0]["type"], "sensor");
    assert!(!recs[0]["id"].as_str().unwrap().is_empty());
    assert_eq!(recs[1]["id"], "fin");
    assert_eq!(body["summary"], json!([]));
}

#[tokio::test]
async fn demo_backend_serves_every_generation_route() {
    let h = harness_with(MockBackend::demo(), MockImageBackend::new());
    let prefs = json!({"robotTask": "climb walls", "operatingEnvironment": "city", "keyFeatures": ["grip"]});

    let (status, body) = post(&h.app, "/api/generate", prefs.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["design"].is_string());

    let (status, body) = post(&h.app, "/api/recommendations", prefs).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 5);

    let (status, body) = post(&h.app, "/api/traits/generate", json!({"category": "Actuators"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trait"]["category"], "Actuators");

    let (status, body) = post(&h.app, "/api/chat", json!({"message": "ideas?"})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["response"].is_string());
}

#[tokio::test]
async fn recommendations_keep_only_known_types() {
    let h = harness();
    let (status, body) = post(
        &h.app,
        "/api/recommendations",
        json!({"robotTask": "inspect reefs", "operatingEnvironment": "ocean"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"], json!(["Aquatic focus", "Precise grip"]));
    let types: Vec<&str> = body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, ["sensor", "manipulator"]);

    let (_, latest) = call(&h.app, "GET", "/api/session/recommendations", None).await;
    assert_eq!(latest, body);
}

#[tokio::test]
async fn recommendations_require_task_and_environment() {
    let h = harness();
    let (status, body) = post(&h.app, "/api/recommendations", json!({"robotTask": "dig"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");
    assert_eq!(h.llm.calls(), 0);
}

#[tokio::test]
async fn recommendations_failure() {
    let h = harness_with(
        MockBackend::new().with_default_response("no json at all"),
        MockImageBackend::new(),
    );
    let (status, body) = post(
        &h.app,
        "/api/recommendations",
        json!({"robotTask": "dig", "operatingEnvironment": "desert"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to generate recommendations");
    assert!(body["details"].is_string());
}

// --- /api/traits/generate ---

#[tokio::test]
async fn trait_generation_validates_category() {
    let h = harness();
    for category in [json!("Wings"), json!("locomotion systems"), json!(null), json!(3)] {
        let (status, body) = post(&h.app, "/api/traits/generate", json!({"category": category})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid category"}));
    }
    assert_eq!(h.llm.calls(), 0);
}

#[tokio::test]
async fn trait_generation_returns_trait() {
    let h = harness();
    let (status, body) = post(
        &h.app,
        "/api/traits/generate",
        json!({"category": "End Effectors"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trait"]["animal"], "Mole");
    assert_eq!(body["trait"]["category"], "End Effectors");
}

#[tokio::test]
async fn trait_generation_failure_has_fixed_message() {
    let h = harness_with(
        MockBackend::new().with_default_response(r#"{"id": "half"}"#),
        MockImageBackend::new(),
    );
    let (status, body) = post(
        &h.app,
        "/api/traits/generate",
        json!({"category": "Balance & Control"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to generate trait"}));
}

// --- /api/generate-image ---

#[tokio::test]
async fn image_generation_relays_upstream_json() {
    let h = harness();
    let (status, body) = post(&h.app, "/api/generate-image", json!({"prompt": "a robot"})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["artifacts"][0]["base64"].is_string());
    assert_eq!(h.images.calls(), 1);
}

#[tokio::test]
async fn image_generation_without_api_key() {
    let (app, _dir) = unconfigured();
    let (status, body) = post(&app, "/api/generate-image", json!({"prompt": "a robot"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "API key not configured"}));
}

#[tokio::test]
async fn image_generation_failure_relays_message() {
    let h = harness_with(MockBackend::new(), MockImageBackend::new().failing());
    let (status, body) = post(&h.app, "/api/generate-image", json!({"prompt": "a robot"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("Stability API error: 500"));
}

// --- /api/analyze-performance ---

#[tokio::test]
async fn analysis_is_labeled_demo_and_in_range() {
    let h = harness();
    for _ in 0..20 {
        let (status, body) = post(
            &h.app,
            "/api/analyze-performance",
            json!({"robotData": {"parts": []}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "demo");
        let overall = body["overall_score"].as_u64().unwrap();
        assert!((75..=95).contains(&overall), "overall {}", overall);
        assert_eq!(body["strengths"].as_array().unwrap().len(), 3);
        assert_eq!(body["limitations"].as_array().unwrap().len(), 2);
        assert_eq!(body["recommendations"].as_array().unwrap().len(), 2);
        assert!(body["performance_scores"]["task_suitability"]["score"].is_u64());
    }
}

#[tokio::test]
async fn analysis_rejects_bad_robot_data() {
    let h = harness();
    for body in [json!({}), json!({"robotData": {}}), json!({"robotData": {"parts": "legs"}})] {
        let (status, reply) = post(&h.app, "/api/analyze-performance", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply, json!({"error": "Invalid robot data format"}));
    }
}

// --- session ---

#[tokio::test]
async fn catalog_search_filters_entries() {
    let h = harness();
    let (status, body) = call(&h.app, "GET", "/api/catalog?q=gecko", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "gecko-feet");
    assert_eq!(items[0]["type"], "manipulator");
    assert!(items[0]["transfer"]["application/json"].is_string());

    let (_, all) = call(&h.app, "GET", "/api/catalog", None).await;
    assert_eq!(all.as_array().unwrap().len(), catalog::library().len());
}

#[tokio::test]
async fn drops_follow_slot_types() {
    let h = harness();
    let fins = serde_json::to_value(payload::encode_entry(catalog::find("dolphin-fins").unwrap())).unwrap();
    let gecko = serde_json::to_value(payload::encode_entry(catalog::find("gecko-feet").unwrap())).unwrap();

    let (status, part) = post(&h.app, "/api/assembly/locomotion/drop", fins.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(part["id"], "locomotion");
    assert_eq!(part["traits"][0]["id"], "dolphin-fins");

    let (status, body) = post(&h.app, "/api/assembly/sensor/drop", gecko).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["reason"], "type_mismatch");

    let (status, body) = post(&h.app, "/api/assembly/tail/drop", fins).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["reason"], "unknown_slot");

    let (status, body) = post(
        &h.app,
        "/api/assembly/core/drop",
        json!({"text/plain": "not a payload"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["reason"], "undecodable");

    let (_, parts) = call(&h.app, "GET", "/api/assembly", None).await;
    let counts: Vec<usize> = parts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["traits"].as_array().unwrap().len())
        .collect();
    assert_eq!(counts, [0, 0, 0, 0, 1, 0]);
}

#[tokio::test]
async fn preferences_persist() {
    let h = harness();
    let (_, before) = call(&h.app, "GET", "/api/preferences", None).await;
    assert_eq!(before, Value::Null);

    let prefs = json!({"robotTask": "fly over fields", "operatingEnvironment": "sky", "keyFeatures": ["lift"]});
    let (status, _) = call(&h.app, "PUT", "/api/preferences", Some(&prefs.to_string())).await;
    assert_eq!(status, StatusCode::OK);

    let (_, after) = call(&h.app, "GET", "/api/preferences", None).await;
    assert_eq!(after, prefs);
}

#[tokio::test]
async fn saving_the_robot_uses_the_current_assembly() {
    let h = harness();
    let prefs = json!({"robotTask": "swim in water", "operatingEnvironment": "lake", "keyFeatures": []});
    call(&h.app, "PUT", "/api/preferences", Some(&prefs.to_string())).await;

    let fins = serde_json::to_value(payload::encode_entry(catalog::find("dolphin-fins").unwrap())).unwrap();
    post(&h.app, "/api/assembly/locomotion/drop", fins).await;

    let (status, robot) = call(&h.app, "PUT", "/api/robot", Some("{}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(robot["environment"], "water");
    assert_eq!(robot["parts"][4]["traits"][0]["animal"], "Dolphin");

    let (_, saved) = call(&h.app, "GET", "/api/robot", None).await;
    assert_eq!(saved, robot);
}

#[tokio::test]
async fn robot_image_needs_traits() {
    let h = harness();
    let (status, _) = post(&h.app, "/api/robot/image", json!(null)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(h.images.calls(), 0);

    let eyes = serde_json::to_value(payload::encode_entry(catalog::find("eagle-eyes").unwrap())).unwrap();
    post(&h.app, "/api/assembly/sensor/drop", eyes).await;
    let (status, body) = post(&h.app, "/api/robot/image", json!(null)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["artifacts"].is_array());
}

#[tokio::test]
async fn base_robot_frames() {
    let h = harness();
    let (status, frame) = call(&h.app, "GET", "/api/robots/base/water", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(frame["width"], 400.0);
    assert!(!frame["commands"].as_array().unwrap().is_empty());

    let (status, _) = call(&h.app, "GET", "/api/robots/base/space", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
