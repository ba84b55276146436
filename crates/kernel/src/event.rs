use serde::{Deserialize, Serialize};

use crate::highscore::HighScoreRecord;
use crate::obstacle::{ObstacleId, ObstacleKind};

/// Something that happened during a frame update or an input call.
///
/// The session appends these to a log the driver drains; displays and
/// audio can react to them without inspecting state diffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted { run: u32 },
    Jumped { chain: u8 },
    Landed,
    DuckChanged { ducking: bool },
    ObstacleSpawned { id: ObstacleId, kind: ObstacleKind },
    /// An obstacle crossed the despawn threshold. `score` is the new score.
    ObstaclePassed { id: ObstacleId, score: u32 },
    DistanceTick { distance: u32, speed: f32 },
    Collision { id: ObstacleId, kind: ObstacleKind },
    /// The run ended. `new_record` is set when a high-water mark was beaten
    /// and a save was requested.
    RunOver {
        score: u32,
        distance: u32,
        new_record: bool,
    },
    HighScoresLoaded { record: HighScoreRecord },
}
