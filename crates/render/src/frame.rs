use glam::Vec3;
use runner_common::Aabb;
use runner_kernel::{
    GameSession, ObstacleId, ObstacleKind, Pose, Prop, RunPhase, Scoreboard, collision,
};
use serde::Serialize;

/// What a renderer needs to draw the runner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CharacterView {
    pub pose: Pose,
    /// Body origin height, ducking included.
    pub height: f32,
    /// Cosmetic bob to add on top of `height` when drawing.
    pub bob: f32,
    /// Leg swing phase in radians.
    pub stride_phase: f32,
    pub bounds: Aabb,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObstacleView {
    pub id: ObstacleId,
    pub kind: ObstacleKind,
    pub position: Vec3,
    pub bounds: Aabb,
}

/// Owned snapshot of everything visible in one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub phase: RunPhase,
    pub speed: f32,
    pub character: CharacterView,
    pub obstacles: Vec<ObstacleView>,
    /// Scroll offset of the ground and road textures.
    pub ground_offset: f32,
    pub props: Vec<Prop>,
    pub scoreboard: Scoreboard,
}

impl RenderFrame {
    pub fn capture(session: &GameSession) -> Self {
        let settings = session.settings();
        let character = session.character();
        Self {
            phase: session.phase(),
            speed: session.speed(),
            character: CharacterView {
                pose: character.pose(),
                height: character.body_origin(settings),
                bob: character.bob_offset(),
                stride_phase: character.stride_phase(),
                bounds: collision::character_box(character, settings),
            },
            obstacles: session
                .obstacles()
                .active()
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    kind: o.kind,
                    position: o.position(),
                    bounds: o.bounding_box(),
                })
                .collect(),
            ground_offset: session.scenery().ground_offset(),
            props: session.scenery().props().to_vec(),
            scoreboard: session.scoreboard(),
        }
    }
}
