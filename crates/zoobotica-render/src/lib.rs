//! # Zoobotica Render
//!
//! Draws the simulation view: an animated environment backdrop, the robot
//! glyph and the performance overlay.
//!
//! Painters write to the [`Canvas`] trait. [`CommandCanvas`] records the
//! calls so the server can stream each [`Frame`] to a browser, which replays
//! them on a real 2D context.
//!
//! ```rust
//! use zoobotica_core::types::Environment;
//! use zoobotica_render::{render_frame, CommandCanvas};
//!
//! let mut canvas = CommandCanvas::new(800.0, 600.0);
//! render_frame(&mut canvas, Environment::Water, 0.0, None);
//! let frame = canvas.into_frame(0, 0.0);
//! assert!(!frame.commands.is_empty());
//! ```

pub mod canvas;
pub mod frame_loop;
pub mod scene;

pub use canvas::{Canvas, CommandCanvas, DrawCommand, Frame};
pub use frame_loop::{AnalysisReceiver, RenderConfig, RenderHandle, RenderLoop};
pub use scene::{
    draw_base_robot, draw_cloud, draw_environment, draw_performance_overlay, draw_robot,
    render_frame, score_color,
};
