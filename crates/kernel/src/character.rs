//! Character state machine: grounded, ducking, or jumping.

use serde::{Deserialize, Serialize};

use crate::settings::GameSettings;

/// Bob amplitude of the running animation.
const BOB_AMPLITUDE: f32 = 0.05;
/// Leg swing frequency in radians per second. The bob runs at twice this.
const STRIDE_RATE: f32 = 15.0;

/// Mutually exclusive character states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pose {
    Grounded,
    Ducking,
    Jumping,
}

/// The player-controlled runner.
///
/// Vertical kinematics are kept as `elevation` above the standing height so
/// the ground clamp is a comparison against zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Character {
    elevation: f32,
    velocity: f32,
    airborne: bool,
    ducking: bool,
    jump_chain: u8,
    anim_time: f32,
}

impl Character {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pose(&self) -> Pose {
        if self.airborne {
            Pose::Jumping
        } else if self.ducking {
            Pose::Ducking
        } else {
            Pose::Grounded
        }
    }

    pub fn is_airborne(&self) -> bool {
        self.airborne
    }

    pub fn is_ducking(&self) -> bool {
        self.ducking
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn jump_chain(&self) -> u8 {
        self.jump_chain
    }

    /// Kinematic height of the body origin. Never below the standing height.
    pub fn height(&self, settings: &GameSettings) -> f32 {
        settings.ground_contact_height() + self.elevation
    }

    /// Where the body origin actually sits, accounting for ducking.
    pub fn body_origin(&self, settings: &GameSettings) -> f32 {
        if self.ducking {
            settings.ground_level + settings.duck_offset
        } else {
            self.height(settings)
        }
    }

    /// Cosmetic vertical bob while running. Not part of the collision box.
    pub fn bob_offset(&self) -> f32 {
        if self.pose() == Pose::Grounded {
            (self.anim_time * STRIDE_RATE * 2.0).sin() * BOB_AMPLITUDE
        } else {
            0.0
        }
    }

    /// Phase of the leg swing animation, in radians.
    pub fn stride_phase(&self) -> f32 {
        self.anim_time * STRIDE_RATE
    }

    /// Apply a jump impulse. Returns `false` when the request is ignored:
    /// the jump chain is exhausted or the body is already too high.
    pub fn jump(&mut self, settings: &GameSettings) -> bool {
        if self.jump_chain >= settings.max_jump_chain {
            return false;
        }
        let ceiling = settings.ground_level + settings.max_jump_height;
        if self.airborne && self.height(settings) >= ceiling {
            return false;
        }
        self.airborne = true;
        self.ducking = false;
        self.velocity = settings.jump_force;
        self.jump_chain += 1;
        true
    }

    /// Start or stop ducking. Ducking is suppressed while airborne; releasing
    /// always applies. Returns whether the ducking flag changed.
    pub fn duck(&mut self, active: bool) -> bool {
        if active && self.airborne {
            return false;
        }
        let changed = self.ducking != active;
        self.ducking = active;
        changed
    }

    /// Integrate one frame of `dt` seconds. Returns `true` on landing.
    pub fn tick(&mut self, dt: f32, settings: &GameSettings) -> bool {
        self.anim_time += dt;
        if !self.airborne {
            return false;
        }
        // Exact for constant acceleration, so landing time does not depend on dt.
        self.elevation += self.velocity * dt - 0.5 * settings.gravity * dt * dt;
        self.velocity -= settings.gravity * dt;
        if self.elevation <= 0.0 {
            self.elevation = 0.0;
            self.velocity = 0.0;
            self.airborne = false;
            self.jump_chain = 0;
            return true;
        }
        false
    }
}
