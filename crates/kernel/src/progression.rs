//! Run lifecycle phases, distance counter, and scroll speed ramp.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::clock::Cadence;
use crate::settings::GameSettings;

/// `NotStarted -> Running -> Over`, and back to `Running` only via `start()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    NotStarted,
    Running,
    Over,
}

/// Distance and speed progression for one run.
#[derive(Debug, Clone)]
pub struct Progression {
    distance: u32,
    speed: f32,
    cadence: Cadence,
}

impl Progression {
    pub fn new(settings: &GameSettings) -> Self {
        Self {
            distance: 0,
            speed: settings.base_speed,
            cadence: Cadence::new(settings.distance_interval()),
        }
    }

    pub fn reset(&mut self, settings: &GameSettings) {
        *self = Self::new(settings);
    }

    pub fn distance(&self) -> u32 {
        self.distance
    }

    /// Current scroll speed in units per second.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Advance the real-time cadence. Each completed interval adds one to
    /// distance and bumps speed towards the cap. Returns the ticks applied.
    pub fn tick(&mut self, dt: Duration, settings: &GameSettings) -> u32 {
        let ticks = self.cadence.advance(dt);
        for _ in 0..ticks {
            self.distance += 1;
            self.speed = (self.speed + settings.speed_increment).min(settings.max_speed);
        }
        ticks
    }
}
