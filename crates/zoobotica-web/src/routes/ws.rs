//! WebSocket stream for the simulation view.

use crate::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, info};
use zoobotica_core::types::Environment;
use zoobotica_render::RenderLoop;

/// Frames buffered per connection before the loop starts skipping.
const FRAME_BUFFER: usize = 4;

#[derive(Debug, Deserialize)]
pub struct SimulationQuery {
    pub env: Option<String>,
}

/// WebSocket upgrade handler for /ws/simulation.
pub async fn simulation_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<SimulationQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let env = match query.env.as_deref().and_then(Environment::parse) {
        Some(env) => env,
        None => state.saved_environment().await,
    };
    ws.on_upgrade(move |socket| handle_socket(socket, state, env))
}

fn envelope(kind: &str, data: impl serde::Serialize) -> Option<Message> {
    let msg = serde_json::json!({ "type": kind, "data": data });
    serde_json::to_string(&msg).ok().map(|json| Message::Text(json.into()))
}

/// Mount a render loop for this connection and stream its frames, plus every
/// newly published analysis, until the client goes away.
async fn handle_socket(mut socket: WebSocket, state: AppState, env: Environment) {
    let (frame_tx, mut frames) = mpsc::channel(FRAME_BUFFER);
    let mut analysis = state.subscribe_analysis();
    let handle = RenderLoop::mount(&state.render, env, state.subscribe_analysis(), frame_tx);
    info!(%env, subscribers = state.analysis_subscribers(), "simulation mounted");

    // The latest analysis, if one was published before the client connected
    let current = analysis.borrow_and_update().clone();
    if let Some(current) = current {
        if let Some(msg) = envelope("analysis", &*current) {
            if socket.send(msg).await.is_err() {
                return;
            }
        }
    }

    loop {
        tokio::select! {
            frame = frames.recv() => {
                let Some(frame) = frame else { break };
                if let Some(msg) = envelope("frame", &frame) {
                    if socket.send(msg).await.is_err() {
                        break;
                    }
                }
            }
            changed = analysis.changed() => {
                if changed.is_err() {
                    break;
                }
                let published = analysis.borrow_and_update().clone();
                if let Some(published) = published {
                    if let Some(msg) = envelope("analysis", &*published) {
                        if socket.send(msg).await.is_err() {
                            break;
                        }
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    _ => {}
                }
            }
        }
    }

    handle.unmount();
    debug!(%env, "simulation unmounted");
}
