use glam::Vec3;
use runner_kernel::{GameSettings, PropKind, RunPhase};
use std::fmt::Write as _;

use crate::frame::RenderFrame;

/// Camera height above the road for the chase view.
const CHASE_HEIGHT: f32 = 5.0;

/// Chase camera behind and above the runner, looking down the road.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    pub eye: Vec3,
    pub look_at: Vec3,
}

impl RenderView {
    pub fn chase(settings: &GameSettings) -> Self {
        Self {
            eye: Vec3::new(
                0.0,
                settings.ground_level + CHASE_HEIGHT,
                settings.scenery.camera_distance,
            ),
            look_at: Vec3::new(0.0, settings.ground_contact_height(), 0.0),
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer only ever sees an owned [`RenderFrame`], so it cannot reach
/// back into the session.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from a snapshot and a view.
    fn render(&self, frame: &RenderFrame, view: &RenderView) -> Self::Output;
}

/// Human-readable dump of a frame, for the CLI, logs, and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Also list every tree and cloud.
    pub show_props: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &RenderFrame, view: &RenderView) -> String {
        let mut out = String::new();
        let phase = match frame.phase {
            RunPhase::NotStarted => "waiting",
            RunPhase::Running => "running",
            RunPhase::Over => "GAME OVER",
        };
        let board = frame.scoreboard;
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "=== {phase} | score={} distance={} | best score={} distance={} ===",
            board.score, board.distance, board.high_score, board.high_distance
        );
        let (eye, at) = (view.eye, view.look_at);
        let _ = writeln!(
            out,
            "speed={:.2} ground_offset={:.2} camera=({:.1}, {:.1}, {:.1})->({:.1}, {:.1}, {:.1})",
            frame.speed, frame.ground_offset, eye.x, eye.y, eye.z, at.x, at.y, at.z
        );
        let c = &frame.character;
        let _ = writeln!(
            out,
            "runner: {:?} height={:.2} bob={:+.3} box=[{:.2}..{:.2}]",
            c.pose, c.height, c.bob, c.bounds.min.y, c.bounds.max.y
        );
        let _ = writeln!(out, "obstacles: {}", frame.obstacles.len());
        for o in &frame.obstacles {
            let _ = writeln!(
                out,
                "  #{:<4} {:<11} z={:>7.2} top={:.2}",
                o.id.0,
                o.kind.name(),
                o.position.z,
                o.bounds.max.y
            );
        }

        if self.show_props {
            for p in &frame.props {
                let label = match p.kind {
                    PropKind::Tree => "tree",
                    PropKind::Cloud => "cloud",
                };
                let _ = writeln!(
                    out,
                    "  {label:<5} ({:.1}, {:.1}, {:.1})",
                    p.position.x, p.position.y, p.position.z
                );
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runner_kernel::{GameSession, GameSettings};
    use std::time::Duration;

    #[test]
    fn idle_frame() {
        let settings = GameSettings::default();
        let s = GameSession::new(settings.clone());
        let view = RenderView::chase(&settings);
        let out = DebugTextRenderer::new().render(&RenderFrame::capture(&s), &view);
        assert!(out.starts_with("=== waiting"));
        assert!(out.contains("camera=(0.0, 5.0, 10.0)->(0.0, 0.8, 0.0)"));
        assert!(out.contains("obstacles: 0"));
        assert!(out.contains("Grounded"));
        assert!(!out.contains("tree"));
    }

    #[test]
    fn lists_obstacles_and_props() {
        let settings = GameSettings::default();
        let mut s = GameSession::new(settings.clone());
        s.start();
        for _ in 0..130 {
            s.update(Duration::from_millis(16));
        }
        assert_eq!(s.obstacles().len(), 1);
        let renderer = DebugTextRenderer { show_props: true };
        let out = renderer.render(&RenderFrame::capture(&s), &RenderView::chase(&settings));
        assert!(out.contains("=== running"));
        assert!(out.contains("obstacles: 1"));
        assert!(out.contains(s.obstacles().active()[0].kind.name()));
        assert_eq!(out.matches("  tree").count(), settings.scenery.tree_count);
        assert_eq!(out.matches("  cloud").count(), settings.scenery.cloud_count);
    }

    #[test]
    fn chase_view_follows_camera_distance() {
        let settings = GameSettings::default();
        let view = RenderView::chase(&settings);
        assert_eq!(view.eye.z, settings.scenery.camera_distance);
        assert_eq!(view.look_at.y, settings.ground_contact_height());
    }
}
