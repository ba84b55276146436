//! Tunable game constants.
//!
//! Rates are per second. The defaults reproduce the feel of tuning done
//! per frame at a 60 Hz display refresh.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Errors from loading or validating settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Scroll speed at run start, units per second.
    pub base_speed: f32,
    /// Scroll speed cap, units per second.
    pub max_speed: f32,
    /// Speed added on every distance tick.
    pub speed_increment: f32,
    /// Upward velocity applied by a jump, units per second.
    pub jump_force: f32,
    /// Downward acceleration while airborne, units per second squared.
    pub gravity: f32,
    pub ground_level: f32,
    /// Height of the body origin above ground while standing.
    pub ground_contact_offset: f32,
    /// Height of the body origin above ground while ducking.
    pub duck_offset: f32,
    /// A jump is refused once the body is at or above this height.
    pub max_jump_height: f32,
    /// Airborne impulses allowed before touching ground again.
    pub max_jump_chain: u8,
    pub obstacle_interval_ms: u64,
    pub distance_interval_ms: u64,
    /// Obstacles appear this far ahead of the character.
    pub spawn_distance: f32,
    /// Obstacles further than this behind the character count as passed.
    pub despawn_distance: f32,
    /// Frame deltas are clamped to this before integrating.
    pub max_frame_delta_ms: u64,
    /// Repeat length of the scrolling ground and road.
    pub ground_tile_length: f32,
    pub scenery: ScenerySettings,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            base_speed: 12.0,
            max_speed: 30.0,
            speed_increment: 0.003,
            jump_force: 24.0,
            gravity: 54.0,
            ground_level: 0.0,
            ground_contact_offset: 0.8,
            duck_offset: 0.4,
            max_jump_height: 4.0,
            max_jump_chain: 2,
            obstacle_interval_ms: 2000,
            distance_interval_ms: 100,
            spawn_distance: 50.0,
            despawn_distance: 20.0,
            max_frame_delta_ms: 100,
            ground_tile_length: 20.0,
            scenery: ScenerySettings::default(),
        }
    }
}

/// Layout of the decorative props that scroll past the road.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenerySettings {
    pub tree_count: usize,
    pub cloud_count: usize,
    pub world_width: f32,
    pub world_depth: f32,
    pub road_width: f32,
    pub camera_distance: f32,
    /// Clouds drift at this fraction of the scroll speed.
    pub cloud_speed_factor: f32,
}

impl Default for ScenerySettings {
    fn default() -> Self {
        Self {
            tree_count: 50,
            cloud_count: 20,
            world_width: 200.0,
            world_depth: 1000.0,
            road_width: 10.0,
            camera_distance: 10.0,
            cloud_speed_factor: 0.3,
        }
    }
}

impl GameSettings {
    /// Parse settings from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings the loop cannot run with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("base_speed", self.base_speed)?;
        positive("jump_force", self.jump_force)?;
        positive("gravity", self.gravity)?;
        positive("spawn_distance", self.spawn_distance)?;
        positive("despawn_distance", self.despawn_distance)?;
        positive("ground_tile_length", self.ground_tile_length)?;
        if !(self.speed_increment >= 0.0) {
            return Err(invalid("speed_increment", "must not be negative"));
        }
        if !(self.max_speed >= self.base_speed) {
            return Err(invalid("max_speed", "must be at least base_speed"));
        }
        if self.max_jump_chain == 0 {
            return Err(invalid("max_jump_chain", "must allow at least one jump"));
        }
        if self.max_jump_height <= self.ground_contact_offset {
            return Err(invalid(
                "max_jump_height",
                "must be above the standing height",
            ));
        }
        if self.duck_offset < 0.0 || self.duck_offset > self.ground_contact_offset {
            return Err(invalid(
                "duck_offset",
                "must lie between the ground and the standing height",
            ));
        }
        for (field, ms) in [
            ("obstacle_interval_ms", self.obstacle_interval_ms),
            ("distance_interval_ms", self.distance_interval_ms),
            ("max_frame_delta_ms", self.max_frame_delta_ms),
        ] {
            if ms == 0 {
                return Err(invalid(field, "must be greater than zero"));
            }
        }
        Ok(())
    }

    pub fn obstacle_interval(&self) -> Duration {
        Duration::from_millis(self.obstacle_interval_ms)
    }

    pub fn distance_interval(&self) -> Duration {
        Duration::from_millis(self.distance_interval_ms)
    }

    pub fn max_frame_delta(&self) -> Duration {
        Duration::from_millis(self.max_frame_delta_ms)
    }

    /// Body origin height while standing on the ground.
    pub fn ground_contact_height(&self) -> f32 {
        self.ground_level + self.ground_contact_offset
    }

    /// Seconds an undisturbed jump stays airborne.
    pub fn airtime(&self) -> f32 {
        2.0 * self.jump_force / self.gravity
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be a positive number"))
    }
}

fn invalid(field: &'static str, reason: &str) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.into(),
    }
}
