//! Axis-aligned collision between the character and obstacles.

use glam::Vec3;
use runner_common::Aabb;

use crate::character::Character;
use crate::obstacle::Obstacle;
use crate::settings::GameSettings;

/// Character extents relative to its body origin while standing.
const CHARACTER_MIN: Vec3 = Vec3::new(-0.5, 0.0, -0.4);
const CHARACTER_MAX: Vec3 = Vec3::new(0.5, 2.2, 0.7);

/// Collision box of the character for its current pose.
///
/// Ducking halves the box height and lowers the origin. The cosmetic bob is
/// deliberately absent.
pub fn character_box(character: &Character, settings: &GameSettings) -> Aabb {
    let origin = Vec3::new(0.0, character.body_origin(settings), 0.0);
    let mut max = CHARACTER_MAX;
    if character.is_ducking() {
        max.y *= 0.5;
    }
    Aabb::new(CHARACTER_MIN + origin, max + origin)
}

/// Pure overlap test between two boxes.
///
/// Malformed boxes are a caller bug, not a runtime condition.
pub fn intersects(character: &Aabb, obstacle: &Aabb) -> bool {
    debug_assert!(character.is_valid(), "malformed character box {character:?}");
    debug_assert!(obstacle.is_valid(), "malformed obstacle box {obstacle:?}");
    character.intersects(obstacle)
}

/// First obstacle touching the character, if any. Any hit ends the run, so
/// the scan stops there.
pub fn first_hit<'a>(character: &Aabb, obstacles: &'a [Obstacle]) -> Option<&'a Obstacle> {
    obstacles
        .iter()
        .find(|o| intersects(character, &o.bounding_box()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacle::{ObstacleId, ObstacleKind};

    fn obstacle_at(kind: ObstacleKind, z: f32) -> Obstacle {
        Obstacle {
            id: ObstacleId(0),
            kind,
            z,
            x: 0.0,
            base_y: 0.0,
        }
    }

    #[test]
    fn standing_character_hits_every_kind_at_its_position() {
        let s = GameSettings::default();
        let c = Character::new();
        let cb = character_box(&c, &s);
        for kind in ObstacleKind::ALL {
            assert!(intersects(&cb, &obstacle_at(kind, 0.0).bounding_box()), "{kind}");
        }
    }

    #[test]
    fn distant_obstacle_misses() {
        let s = GameSettings::default();
        let cb = character_box(&Character::new(), &s);
        let far = obstacle_at(ObstacleKind::Bush, -10.0);
        assert!(!intersects(&cb, &far.bounding_box()));
    }

    #[test]
    fn airborne_character_clears_obstacles() {
        let s = GameSettings::default();
        let mut c = Character::new();
        c.jump(&s);
        // Near the apex the body is well above every footprint.
        for _ in 0..25 {
            c.tick(1.0 / 60.0, &s);
        }
        let cb = character_box(&c, &s);
        for kind in ObstacleKind::ALL {
            assert!(!intersects(&cb, &obstacle_at(kind, 0.0).bounding_box()), "{kind}");
        }
    }

    #[test]
    fn ducking_halves_box_height() {
        let s = GameSettings::default();
        let mut c = Character::new();
        let standing = character_box(&c, &s);
        c.duck(true);
        let ducked = character_box(&c, &s);
        assert!((ducked.size().y - standing.size().y * 0.5).abs() < 1e-6);
        assert!(ducked.min.y < standing.min.y);
    }

    #[test]
    fn bob_does_not_move_the_box() {
        let s = GameSettings::default();
        let mut c = Character::new();
        let before = character_box(&c, &s);
        c.tick(0.05, &s);
        assert_ne!(c.bob_offset(), 0.0);
        assert_eq!(character_box(&c, &s), before);
    }

    #[test]
    fn first_hit_reports_touching_obstacle() {
        let s = GameSettings::default();
        let cb = character_box(&Character::new(), &s);
        let obstacles = vec![
            obstacle_at(ObstacleKind::Post, -20.0),
            obstacle_at(ObstacleKind::RoundRock, 0.5),
        ];
        let hit = first_hit(&cb, &obstacles).unwrap();
        assert_eq!(hit.kind, ObstacleKind::RoundRock);
        assert!(first_hit(&cb, &obstacles[..1]).is_none());
    }
}
