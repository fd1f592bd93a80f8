//! Painters for the simulation view.

use crate::canvas::Canvas;
use std::f64::consts::PI;
use zoobotica_core::types::{Environment, PerformanceAnalysis};

const SKY: &str = "#f0f9ff";
const GRASS: &str = "#4ade80";
const WATER: &str = "#60a5fa";
const INK: &str = "#1e40af";

const OVERLAY_WIDTH: f64 = 200.0;
const OVERLAY_HEIGHT: f64 = 300.0;
const OVERLAY_PADDING: f64 = 20.0;
const BAR_WIDTH: f64 = 100.0;
const BAR_HEIGHT: f64 = 10.0;

const CLOUD_COUNT: u32 = 10;

/// Bar colour for a score: green from 90, yellow from 70, red below.
pub fn score_color(score: u32) -> &'static str {
    if score >= 90 {
        "#22c55e"
    } else if score >= 70 {
        "#eab308"
    } else {
        "#ef4444"
    }
}

/// Paint the backdrop for `env` at time `now_ms`.
pub fn draw_environment(canvas: &mut dyn Canvas, env: Environment, now_ms: f64) {
    let (w, h) = (canvas.width(), canvas.height());
    canvas.set_fill_style(SKY);
    canvas.fill_rect(0.0, 0.0, w, h);

    match env {
        Environment::Land => draw_wave(canvas, GRASS, now_ms),
        Environment::Water => draw_wave(canvas, WATER, now_ms),
        Environment::Air => {
            canvas.set_fill_style(WATER);
            for i in 0..CLOUD_COUNT {
                let i = f64::from(i);
                let x = (i * 100.0 + now_ms / 100.0) % w;
                let y = 100.0 + i.sin() * 50.0;
                draw_cloud(canvas, x, y);
            }
        }
    }
}

// Filled sine band across the lower half.
fn draw_wave(canvas: &mut dyn Canvas, color: &str, now_ms: f64) {
    let (w, h) = (canvas.width(), canvas.height());
    canvas.set_fill_style(color);
    canvas.begin_path();
    canvas.move_to(0.0, h);
    let mut x = 0.0;
    while x < w {
        canvas.line_to(x, h / 2.0 + 20.0 * (x / 40.0 + now_ms / 1000.0).sin());
        x += 1.0;
    }
    canvas.line_to(w, h);
    canvas.fill();
}

/// Four overlapping circles.
pub fn draw_cloud(canvas: &mut dyn Canvas, x: f64, y: f64) {
    canvas.begin_path();
    canvas.arc(x, y, 20.0, 0.0, 2.0 * PI);
    canvas.arc(x + 15.0, y - 10.0, 15.0, 0.0, 2.0 * PI);
    canvas.arc(x + 15.0, y + 10.0, 15.0, 0.0, 2.0 * PI);
    canvas.arc(x + 30.0, y, 20.0, 0.0, 2.0 * PI);
    canvas.fill();
}

/// The robot glyph centred on `(x, y)`: body, head, eyes and two wheels.
pub fn draw_robot(canvas: &mut dyn Canvas, x: f64, y: f64) {
    canvas.save();
    canvas.translate(x, y);

    canvas.set_fill_style("#4a9eff");
    canvas.begin_path();
    canvas.round_rect(-25.0, -30.0, 50.0, 60.0, 10.0);
    canvas.fill();

    canvas.set_fill_style("#60a5fa");
    canvas.begin_path();
    canvas.arc(0.0, -35.0, 15.0, 0.0, 2.0 * PI);
    canvas.fill();

    canvas.set_fill_style("#93c5fd");
    canvas.begin_path();
    canvas.arc(-8.0, -38.0, 5.0, 0.0, 2.0 * PI);
    canvas.arc(8.0, -38.0, 5.0, 0.0, 2.0 * PI);
    canvas.fill();

    canvas.set_fill_style("#3b82f6");
    canvas.begin_path();
    canvas.round_rect(-30.0, -20.0, 10.0, 40.0, 5.0);
    canvas.round_rect(20.0, -20.0, 10.0, 40.0, 5.0);
    canvas.fill();

    canvas.restore();
}

/// The score panel in the top-right corner.
pub fn draw_performance_overlay(canvas: &mut dyn Canvas, analysis: &PerformanceAnalysis) {
    let x = canvas.width() - OVERLAY_WIDTH - OVERLAY_PADDING;
    let y = OVERLAY_PADDING;

    canvas.set_fill_style("rgba(255, 255, 255, 0.9)");
    canvas.begin_path();
    canvas.round_rect(x, y, OVERLAY_WIDTH, OVERLAY_HEIGHT, 10.0);
    canvas.fill();

    canvas.set_fill_style(INK);
    canvas.set_font("bold 16px Inter");
    canvas.fill_text("Performance Analysis", x + 10.0, y + 25.0);

    canvas.set_font("14px Inter");
    for (i, (label, score)) in analysis.metrics().into_iter().enumerate() {
        let metric_y = y + 60.0 + i as f64 * 40.0;

        canvas.set_fill_style(INK);
        canvas.fill_text(label, x + 10.0, metric_y);

        canvas.set_fill_style("#e5e7eb");
        canvas.begin_path();
        canvas.round_rect(x + 80.0, metric_y - 8.0, BAR_WIDTH, BAR_HEIGHT, 5.0);
        canvas.fill();

        let filled = f64::from(score.min(100)) / 100.0 * BAR_WIDTH;
        canvas.set_fill_style(score_color(score));
        canvas.begin_path();
        canvas.round_rect(x + 80.0, metric_y - 8.0, filled, BAR_HEIGHT, 5.0);
        canvas.fill();

        canvas.set_fill_style(INK);
        canvas.fill_text(&score.to_string(), x + 190.0, metric_y);
    }

    canvas.set_fill_style(INK);
    canvas.set_font("bold 24px Inter");
    canvas.fill_text(
        &analysis.overall_score.to_string(),
        x + 10.0,
        y + OVERLAY_HEIGHT - 20.0,
    );
    canvas.set_font("14px Inter");
    canvas.fill_text("Overall Score", x + 50.0, y + OVERLAY_HEIGHT - 20.0);
}

/// One simulation tick: clear, backdrop, robot at the centre, and the
/// overlay when an analysis has arrived.
pub fn render_frame(
    canvas: &mut dyn Canvas,
    env: Environment,
    now_ms: f64,
    analysis: Option<&PerformanceAnalysis>,
) {
    let (w, h) = (canvas.width(), canvas.height());
    canvas.clear_rect(0.0, 0.0, w, h);
    draw_environment(canvas, env, now_ms);
    draw_robot(canvas, w / 2.0, h / 2.0);
    if let Some(analysis) = analysis {
        draw_performance_overlay(canvas, analysis);
    }
}

/// The base silhouette for `env`: legged on land, winged in the air, finned
/// in water.
pub fn draw_base_robot(canvas: &mut dyn Canvas, env: Environment) {
    let (w, h) = (canvas.width(), canvas.height());
    let (cx, cy) = (w / 2.0, h / 2.0);

    canvas.set_fill_style("#f0f0f0");
    canvas.fill_rect(0.0, 0.0, w, h);

    canvas.set_fill_style("#333");
    canvas.set_stroke_style("#000");
    canvas.set_line_width(2.0);

    match env {
        Environment::Land => {
            outlined(canvas, |c| c.ellipse(cx, cy, 60.0, 80.0, 0.0, 0.0, 2.0 * PI));
            outlined(canvas, |c| c.arc(cx, cy - 70.0, 30.0, 0.0, 2.0 * PI));

            // legs
            canvas.begin_path();
            canvas.move_to(cx - 30.0, cy + 60.0);
            canvas.line_to(cx - 40.0, cy + 120.0);
            canvas.move_to(cx + 30.0, cy + 60.0);
            canvas.line_to(cx + 40.0, cy + 120.0);
            canvas.stroke();

            // arms
            canvas.begin_path();
            canvas.move_to(cx - 50.0, cy);
            canvas.line_to(cx - 80.0, cy + 20.0);
            canvas.move_to(cx + 50.0, cy);
            canvas.line_to(cx + 80.0, cy + 20.0);
            canvas.stroke();
        }
        Environment::Air => {
            outlined(canvas, |c| c.ellipse(cx, cy, 70.0, 50.0, 0.0, 0.0, 2.0 * PI));
            outlined(canvas, |c| c.arc(cx, cy - 40.0, 25.0, 0.0, 2.0 * PI));

            // wings
            canvas.begin_path();
            canvas.move_to(cx - 60.0, cy);
            canvas.quadratic_curve_to(cx - 100.0, cy - 40.0, cx - 120.0, cy + 20.0);
            canvas.move_to(cx + 60.0, cy);
            canvas.quadratic_curve_to(cx + 100.0, cy - 40.0, cx + 120.0, cy + 20.0);
            canvas.stroke();

            // tail
            canvas.begin_path();
            canvas.move_to(cx, cy + 40.0);
            canvas.line_to(cx, cy + 100.0);
            canvas.stroke();
        }
        Environment::Water => {
            outlined(canvas, |c| c.ellipse(cx, cy, 80.0, 40.0, 0.0, 0.0, 2.0 * PI));
            outlined(canvas, |c| c.arc(cx - 60.0, cy, 25.0, 0.0, 2.0 * PI));

            // fins
            canvas.begin_path();
            canvas.move_to(cx, cy - 30.0);
            canvas.quadratic_curve_to(cx, cy - 70.0, cx + 20.0, cy - 90.0);
            canvas.move_to(cx, cy + 30.0);
            canvas.quadratic_curve_to(cx, cy + 70.0, cx + 20.0, cy + 90.0);
            canvas.stroke();

            // tail
            canvas.begin_path();
            canvas.move_to(cx + 70.0, cy);
            canvas.quadratic_curve_to(cx + 100.0, cy, cx + 120.0, cy);
            canvas.stroke();
        }
    }
}

// Filled and stroked single shape.
fn outlined(canvas: &mut dyn Canvas, shape: impl FnOnce(&mut dyn Canvas)) {
    canvas.begin_path();
    shape(canvas);
    canvas.fill();
    canvas.stroke();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{CommandCanvas, DrawCommand};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use zoobotica_core::analysis::DemoAnalyzer;

    fn analysis() -> PerformanceAnalysis {
        DemoAnalyzer::new().analyze(&mut StdRng::seed_from_u64(3))
    }

    fn count(canvas: &CommandCanvas, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        canvas.commands().iter().filter(|c| pred(c)).count()
    }

    #[test]
    fn test_score_color_buckets() {
        assert_eq!(score_color(100), "#22c55e");
        assert_eq!(score_color(90), "#22c55e");
        assert_eq!(score_color(89), "#eab308");
        assert_eq!(score_color(70), "#eab308");
        assert_eq!(score_color(69), "#ef4444");
        assert_eq!(score_color(0), "#ef4444");
    }

    #[test]
    fn test_land_terrain_starts_at_midline() {
        let mut canvas = CommandCanvas::new(800.0, 600.0);
        draw_environment(&mut canvas, Environment::Land, 0.0);

        let first_line = canvas
            .commands()
            .iter()
            .find(|c| matches!(c, DrawCommand::LineTo { .. }));
        assert_eq!(first_line, Some(&DrawCommand::LineTo { x: 0.0, y: 300.0 }));
        assert!(canvas.commands().contains(&DrawCommand::FillStyle { style: GRASS.into() }));
        // one point per column plus the closing corner
        assert_eq!(count(&canvas, |c| matches!(c, DrawCommand::LineTo { .. })), 801);
    }

    #[test]
    fn test_air_draws_ten_clouds() {
        let mut canvas = CommandCanvas::new(800.0, 600.0);
        draw_environment(&mut canvas, Environment::Air, 12_345.0);
        assert_eq!(count(&canvas, |c| matches!(c, DrawCommand::Arc { .. })), 40);
        assert_eq!(count(&canvas, |c| matches!(c, DrawCommand::LineTo { .. })), 0);
    }

    #[test]
    fn test_clouds_wrap_horizontally() {
        let mut canvas = CommandCanvas::new(800.0, 600.0);
        draw_environment(&mut canvas, Environment::Air, 1_000_000.0);
        for command in canvas.commands() {
            if let DrawCommand::Arc { x, radius: r, .. } = command {
                // cloud origin lies in [0, w); its lobes extend at most 30 + 20 right
                assert!(*x - r >= -20.0 && *x < 800.0 + 50.0);
            }
        }
    }

    #[test]
    fn test_frame_without_analysis_has_no_overlay() {
        let mut canvas = CommandCanvas::new(800.0, 600.0);
        render_frame(&mut canvas, Environment::Water, 0.0, None);
        assert!(canvas.commands()[0] == DrawCommand::ClearRect { x: 0.0, y: 0.0, w: 800.0, h: 600.0 });
        assert_eq!(count(&canvas, |c| matches!(c, DrawCommand::FillText { .. })), 0);
        assert!(canvas.commands().contains(&DrawCommand::Translate { x: 400.0, y: 300.0 }));
    }

    #[test]
    fn test_frame_with_analysis_draws_overlay() {
        let analysis = analysis();
        let mut canvas = CommandCanvas::new(800.0, 600.0);
        render_frame(&mut canvas, Environment::Land, 0.0, Some(&analysis));
        let frame = canvas.into_frame(0, 0.0);
        let texts: Vec<&str> = frame.texts().collect();

        assert_eq!(texts[0], "Performance Analysis");
        for label in ["Mobility", "Durability", "Efficiency", "Task Fit", "Overall Score"] {
            assert!(texts.contains(&label), "missing {}", label);
        }
        assert!(texts.contains(&analysis.overall_score.to_string().as_str()));
    }

    #[test]
    fn test_overlay_bar_colours_follow_scores() {
        let analysis = analysis();
        let mut canvas = CommandCanvas::new(800.0, 600.0);
        draw_performance_overlay(&mut canvas, &analysis);

        let styles: Vec<&str> = canvas
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillStyle { style } => Some(style.as_str()),
                _ => None,
            })
            .collect();
        for (_, score) in analysis.metrics() {
            assert!(styles.contains(&score_color(score)));
        }
    }

    #[test]
    fn test_overlay_sits_top_right() {
        let mut canvas = CommandCanvas::new(800.0, 600.0);
        draw_performance_overlay(&mut canvas, &analysis());
        let title = canvas.commands().iter().find_map(|c| match c {
            DrawCommand::FillText { text, x, y } if text == "Performance Analysis" => Some((*x, *y)),
            _ => None,
        });
        assert_eq!(title, Some((590.0, 45.0)));
    }

    #[test]
    fn test_base_robots_differ_by_environment() {
        let render = |env| {
            let mut canvas = CommandCanvas::new(400.0, 400.0);
            draw_base_robot(&mut canvas, env);
            canvas
        };
        let land = render(Environment::Land);
        let air = render(Environment::Air);
        let water = render(Environment::Water);

        let curves = |c: &CommandCanvas| count(c, |c| matches!(c, DrawCommand::QuadraticCurveTo { .. }));
        assert_eq!(curves(&land), 0);
        assert_eq!(curves(&air), 2);
        assert_eq!(curves(&water), 3);
        assert!(land.commands().contains(&DrawCommand::Ellipse {
            x: 200.0,
            y: 200.0,
            rx: 60.0,
            ry: 80.0,
            rotation: 0.0,
            start: 0.0,
            end: 2.0 * PI,
        }));
    }
}
