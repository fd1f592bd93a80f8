//! A 2D drawing surface and a recorder for it.
//!
//! [`Canvas`] mirrors the subset of the browser's 2D context the painters
//! need. [`CommandCanvas`] records every call as a [`DrawCommand`] so a frame
//! can be serialized and replayed by a viewer.

use serde::{Deserialize, Serialize};

/// A 2D drawing surface with browser-canvas semantics.
pub trait Canvas {
    fn width(&self) -> f64;
    fn height(&self) -> f64;

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn set_fill_style(&mut self, style: &str);
    fn set_stroke_style(&mut self, style: &str);
    fn set_line_width(&mut self, width: f64);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64);
    fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64);
    #[allow(clippy::too_many_arguments)]
    fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, rotation: f64, start: f64, end: f64);
    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);

    fn set_font(&mut self, font: &str);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);

    /// Add a rounded rectangle sub-path. The radius is clamped to half the
    /// smaller side, so zero-width rectangles draw nothing visible.
    fn round_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radius: f64) {
        let r = radius.min(w.abs() / 2.0).min(h.abs() / 2.0).max(0.0);
        self.move_to(x + r, y);
        self.arc_to(x + w, y, x + w, y + h, r);
        self.arc_to(x + w, y + h, x, y + h, r);
        self.arc_to(x, y + h, x, y, r);
        self.arc_to(x, y, x + w, y, r);
        self.close_path();
    }
}

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCommand {
    ClearRect { x: f64, y: f64, w: f64, h: f64 },
    FillStyle { style: String },
    StrokeStyle { style: String },
    LineWidth { width: f64 },
    FillRect { x: f64, y: f64, w: f64, h: f64 },
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Arc { x: f64, y: f64, radius: f64, start: f64, end: f64 },
    ArcTo { x1: f64, y1: f64, x2: f64, y2: f64, radius: f64 },
    Ellipse { x: f64, y: f64, rx: f64, ry: f64, rotation: f64, start: f64, end: f64 },
    QuadraticCurveTo { cpx: f64, cpy: f64, x: f64, y: f64 },
    ClosePath,
    Fill,
    Stroke,
    Font { font: String },
    FillText { text: String, x: f64, y: f64 },
    Save,
    Restore,
    Translate { x: f64, y: f64 },
}

/// The recorded output of one render tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub sequence: u64,
    pub timestamp_ms: f64,
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    /// Texts drawn in this frame, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::FillText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// A [`Canvas`] that records calls instead of rasterizing them.
#[derive(Debug, Clone)]
pub struct CommandCanvas {
    width: f64,
    height: f64,
    commands: Vec<DrawCommand>,
}

impl CommandCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Finish recording.
    pub fn into_frame(self, sequence: u64, timestamp_ms: f64) -> Frame {
        Frame {
            sequence,
            timestamp_ms,
            width: self.width,
            height: self.height,
            commands: self.commands,
        }
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl Canvas for CommandCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.push(DrawCommand::ClearRect { x, y, w, h });
    }

    fn set_fill_style(&mut self, style: &str) {
        self.push(DrawCommand::FillStyle {
            style: style.to_string(),
        });
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.push(DrawCommand::StrokeStyle {
            style: style.to_string(),
        });
    }

    fn set_line_width(&mut self, width: f64) {
        self.push(DrawCommand::LineWidth { width });
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.push(DrawCommand::FillRect { x, y, w, h });
    }

    fn begin_path(&mut self) {
        self.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.push(DrawCommand::LineTo { x, y });
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) {
        self.push(DrawCommand::Arc {
            x,
            y,
            radius,
            start,
            end,
        });
    }

    fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) {
        self.push(DrawCommand::ArcTo {
            x1,
            y1,
            x2,
            y2,
            radius,
        });
    }

    fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, rotation: f64, start: f64, end: f64) {
        self.push(DrawCommand::Ellipse {
            x,
            y,
            rx,
            ry,
            rotation,
            start,
            end,
        });
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.push(DrawCommand::QuadraticCurveTo { cpx, cpy, x, y });
    }

    fn close_path(&mut self) {
        self.push(DrawCommand::ClosePath);
    }

    fn fill(&mut self) {
        self.push(DrawCommand::Fill);
    }

    fn stroke(&mut self) {
        self.push(DrawCommand::Stroke);
    }

    fn set_font(&mut self, font: &str) {
        self.push(DrawCommand::Font {
            font: font.to_string(),
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn save(&mut self) {
        self.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.push(DrawCommand::Translate { x, y });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc_to_radii(canvas: &CommandCanvas) -> Vec<f64> {
        canvas
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::ArcTo { radius, .. } => Some(*radius),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_round_rect_keeps_small_radius() {
        let mut canvas = CommandCanvas::new(100.0, 100.0);
        canvas.round_rect(0.0, 0.0, 50.0, 60.0, 10.0);
        assert_eq!(arc_to_radii(&canvas), [10.0; 4]);
        assert_eq!(canvas.commands().first(), Some(&DrawCommand::MoveTo { x: 10.0, y: 0.0 }));
        assert_eq!(canvas.commands().last(), Some(&DrawCommand::ClosePath));
    }

    #[test]
    fn test_round_rect_clamps_radius() {
        let mut canvas = CommandCanvas::new(100.0, 100.0);
        canvas.round_rect(0.0, 0.0, 6.0, 40.0, 10.0);
        assert_eq!(arc_to_radii(&canvas), [3.0; 4]);

        let mut empty = CommandCanvas::new(100.0, 100.0);
        empty.round_rect(0.0, 0.0, 0.0, 10.0, 5.0);
        assert_eq!(arc_to_radii(&empty), [0.0; 4]);
    }

    #[test]
    fn test_command_wire_shape() {
        let json = serde_json::to_value(DrawCommand::FillText {
            text: "hi".into(),
            x: 1.0,
            y: 2.0,
        })
        .unwrap();
        assert_eq!(json["op"], "fillText");
        assert_eq!(json["text"], "hi");

        let json = serde_json::to_value(DrawCommand::BeginPath).unwrap();
        assert_eq!(json, serde_json::json!({"op": "beginPath"}));
    }
}
