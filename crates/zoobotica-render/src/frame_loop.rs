//! The periodic render loop behind the simulation view.
//!
//! A mounted loop redraws at a fixed interval on the tokio runtime and hands
//! each recorded [`Frame`] to a channel. It only reads the latest analysis
//! from a `watch` channel; publishers replace the value wholesale.

use crate::canvas::{CommandCanvas, Frame};
use crate::scene::render_frame;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;
use zoobotica_core::types::{Environment, PerformanceAnalysis};

/// The analysis slot a loop reads from.
pub type AnalysisReceiver = watch::Receiver<Option<Arc<PerformanceAnalysis>>>;

/// Canvas size and tick rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub frame_interval_ms: u64,
    pub width: u32,
    pub height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            width: 800,
            height: 600,
        }
    }
}

impl RenderConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

pub struct RenderLoop;

impl RenderLoop {
    /// Start redrawing `env` every frame interval.
    ///
    /// Frames the sink has no room for are skipped. The loop stops when the
    /// returned handle is unmounted or dropped, or when the sink closes.
    pub fn mount(
        config: &RenderConfig,
        env: Environment,
        analysis: AnalysisReceiver,
        sink: mpsc::Sender<Frame>,
    ) -> RenderHandle {
        let interval = config.frame_interval();
        let (width, height) = (f64::from(config.width), f64::from(config.height));

        let task = tokio::spawn(async move {
            let epoch_ms = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs_f64() * 1000.0)
                .unwrap_or_default();
            let started = Instant::now();

            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut sequence = 0u64;

            loop {
                ticker.tick().await;
                let now_ms = epoch_ms + started.elapsed().as_secs_f64() * 1000.0;

                let current = analysis.borrow().clone();
                let mut canvas = CommandCanvas::new(width, height);
                render_frame(&mut canvas, env, now_ms, current.as_deref());

                match sink.try_send(canvas.into_frame(sequence, now_ms)) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        debug!(sequence, "frame skipped, consumer is behind");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => break,
                }
                sequence += 1;
            }
            debug!(frames = sequence, "render loop stopped");
        });

        RenderHandle { task: Some(task) }
    }
}

/// Owns a mounted loop. Dropping it unmounts.
pub struct RenderHandle {
    task: Option<JoinHandle<()>>,
}

impl RenderHandle {
    pub fn unmount(mut self) {
        self.abort();
    }

    pub fn is_mounted(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for RenderHandle {
    fn drop(&mut self) {
        self.abort();
    }
}
