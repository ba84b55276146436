//! Obstacle stream: timed spawning, scrolling, and passage detection.

use glam::Vec3;
use runner_common::Aabb;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::clock::Cadence;
use crate::rng::SplitMix64;
use crate::settings::GameSettings;

/// Obstacle variants, each with its own collision footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Tall narrow box.
    LowBarrier,
    /// Sphere of radius 0.8 resting on the ground.
    RoundRock,
    /// Thin cylinder.
    Post,
    /// Sphere of radius 1.
    Bush,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::LowBarrier,
        ObstacleKind::RoundRock,
        ObstacleKind::Post,
        ObstacleKind::Bush,
    ];

    /// Bounding box relative to the obstacle's ground anchor.
    pub fn footprint(self) -> Aabb {
        let (center_y, size) = match self {
            Self::LowBarrier => (1.0, Vec3::new(0.5, 2.0, 0.5)),
            Self::RoundRock => (0.8, Vec3::splat(1.6)),
            Self::Post => (1.0, Vec3::new(0.6, 2.0, 0.6)),
            Self::Bush => (1.0, Vec3::splat(2.0)),
        };
        Aabb::from_center_size(Vec3::new(0.0, center_y, 0.0), size)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::LowBarrier => "low-barrier",
            Self::RoundRock => "roundrock",
            Self::Post => "post",
            Self::Bush => "bush",
        }
    }
}

impl std::fmt::Display for ObstacleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Monotonic id assigned at spawn, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(pub u64);

/// An active obstacle. `z` is measured along the scroll axis: negative is
/// ahead of the character, positive is behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub kind: ObstacleKind,
    pub z: f32,
    /// Lateral offset, fixed at spawn.
    pub x: f32,
    /// Ground anchor height, fixed at spawn.
    pub base_y: f32,
}

impl Obstacle {
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.base_y, self.z)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.kind.footprint().translated(self.position())
    }

    /// Distance still to cover before reaching the character's plane.
    pub fn distance_ahead(&self) -> f32 {
        -self.z
    }
}

/// Owns the active obstacle set, kept in spawn order.
#[derive(Debug, Clone)]
pub struct ObstacleStream {
    active: Vec<Obstacle>,
    spawn_timer: Cadence,
    next_id: u64,
    passed: u32,
}

impl ObstacleStream {
    pub fn new(spawn_interval: Duration) -> Self {
        Self {
            active: Vec::new(),
            spawn_timer: Cadence::new(spawn_interval),
            next_id: 0,
            passed: 0,
        }
    }

    /// Drop every obstacle and restart the spawn timer and pass count.
    /// Ids keep increasing across runs.
    pub fn clear(&mut self) {
        self.active.clear();
        self.spawn_timer.reset();
        self.passed = 0;
    }

    pub fn active(&self) -> &[Obstacle] {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Obstacles passed since the last `clear`.
    pub fn passed(&self) -> u32 {
        self.passed
    }

    /// Place a uniformly chosen obstacle at the spawn distance.
    pub fn spawn(&mut self, settings: &GameSettings, rng: &mut SplitMix64) -> &Obstacle {
        let kind = ObstacleKind::ALL[rng.index(ObstacleKind::ALL.len())];
        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        tracing::debug!(id = id.0, %kind, "spawning obstacle");
        self.active.push(Obstacle {
            id,
            kind,
            z: -settings.spawn_distance,
            x: 0.0,
            base_y: settings.ground_level,
        });
        &self.active[self.active.len() - 1]
    }

    /// Run the spawn timer. Spawns at most one obstacle per call; the timer
    /// is wall-clock based and does not scale with scroll speed.
    pub fn tick_spawner(
        &mut self,
        dt: Duration,
        settings: &GameSettings,
        rng: &mut SplitMix64,
    ) -> Option<&Obstacle> {
        let due = self.spawn_timer.advance(dt);
        if due == 0 {
            return None;
        }
        if due > 1 {
            tracing::debug!(skipped = due - 1, "spawn timer overran; spawning once");
        }
        Some(self.spawn(settings, rng))
    }

    /// Move every obstacle `travel` units toward and past the character.
    /// Obstacles beyond `despawn_distance` are removed and returned in
    /// spawn order.
    pub fn advance(&mut self, travel: f32, despawn_distance: f32) -> Vec<Obstacle> {
        let mut passed = Vec::new();
        self.active.retain_mut(|o| {
            o.z += travel;
            if o.z > despawn_distance {
                passed.push(o.clone());
                false
            } else {
                true
            }
        });
        self.passed += passed.len() as u32;
        passed
    }

    /// The closest obstacle whose trailing edge has not yet passed the character.
    pub fn nearest_ahead(&self) -> Option<&Obstacle> {
        self.active
            .iter()
            .filter(|o| o.bounding_box().min.z <= 0.0)
            .max_by(|a, b| a.z.total_cmp(&b.z))
    }
}
