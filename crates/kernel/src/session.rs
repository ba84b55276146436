//! The game session: one explicit value owning all gameplay state.
//!
//! The frame-driving caller owns the session and calls [`GameSession::update`]
//! once per display refresh. Input handlers call `start`, `jump` and `duck`
//! between updates on the same thread.

use std::time::Duration;

use crate::character::Character;
use crate::collision;
use crate::event::GameEvent;
use crate::highscore::{HighScoreRecord, NoPersistence, ScorePersistence, Scoreboard};
use crate::obstacle::{ObstacleId, ObstacleKind, ObstacleStream};
use crate::progression::{Progression, RunPhase};
use crate::rng::SplitMix64;
use crate::scenery::Scenery;
use crate::settings::GameSettings;

/// Scenery draws from its own stream so obstacle kinds depend only on the seed.
const SCENERY_SEED_SALT: u64 = 0x5eed_5ce7_e4f1_a3c9;

/// Longest scroll distance covered between two collision checks. Well under
/// the shallowest overlap along the scroll axis (a low barrier against the
/// character box, 1.6 units).
const MAX_SLICE_TRAVEL: f32 = 0.5;

/// Summary of one `update` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub phase: RunPhase,
    pub scoreboard: Scoreboard,
    /// Set when any scoreboard number differs from before the update.
    pub scoreboard_changed: bool,
    /// Number of events appended during the update.
    pub events: usize,
}

pub struct GameSession {
    settings: GameSettings,
    phase: RunPhase,
    character: Character,
    obstacles: ObstacleStream,
    progression: Progression,
    scenery: Scenery,
    rng: SplitMix64,
    scenery_rng: SplitMix64,
    high_scores: HighScoreRecord,
    persistence: Box<dyn ScorePersistence>,
    run_count: u32,
    run_time: Duration,
    events: Vec<GameEvent>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("phase", &self.phase)
            .field("score", &self.score())
            .field("distance", &self.distance())
            .field("speed", &self.speed())
            .field("obstacles", &self.obstacles.len())
            .field("high_scores", &self.high_scores)
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// Session with seed 0 and in-memory high scores.
    pub fn new(settings: GameSettings) -> Self {
        Self::with_seed(settings, 0)
    }

    /// Session with a specific seed, for reproducible runs.
    pub fn with_seed(settings: GameSettings, seed: u64) -> Self {
        if let Err(e) = settings.validate() {
            tracing::warn!(error = %e, "running with invalid settings");
        }
        let mut scenery_rng = SplitMix64::new(seed ^ SCENERY_SEED_SALT);
        let scenery = Scenery::generate(&settings, &mut scenery_rng);
        Self {
            phase: RunPhase::NotStarted,
            character: Character::new(),
            obstacles: ObstacleStream::new(settings.obstacle_interval()),
            progression: Progression::new(&settings),
            scenery,
            rng: SplitMix64::new(seed),
            scenery_rng,
            high_scores: HighScoreRecord::default(),
            persistence: Box::new(NoPersistence),
            run_count: 0,
            run_time: Duration::ZERO,
            events: Vec::new(),
            settings,
        }
    }

    /// Attach a persistence capability and ask it for the stored record.
    /// The load completes in the background; gameplay does not wait for it.
    pub fn with_persistence(mut self, persistence: Box<dyn ScorePersistence>) -> Self {
        self.persistence = persistence;
        self.persistence.request_load();
        self
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn obstacles(&self) -> &ObstacleStream {
        &self.obstacles
    }

    pub fn scenery(&self) -> &Scenery {
        &self.scenery
    }

    /// Obstacles passed since the run started.
    pub fn score(&self) -> u32 {
        self.obstacles.passed()
    }

    pub fn distance(&self) -> u32 {
        self.progression.distance()
    }

    /// Current scroll speed in units per second.
    pub fn speed(&self) -> f32 {
        self.progression.speed()
    }

    pub fn high_scores(&self) -> HighScoreRecord {
        self.high_scores
    }

    pub fn scoreboard(&self) -> Scoreboard {
        Scoreboard {
            score: self.score(),
            distance: self.distance(),
            high_score: self.high_scores.score,
            high_distance: self.high_scores.distance,
        }
    }

    /// Runs started so far, including the current one.
    pub fn run_count(&self) -> u32 {
        self.run_count
    }

    /// Simulated time spent in the current (or last) run.
    pub fn run_time(&self) -> Duration {
        self.run_time
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Begin a fresh run. Ignored while a run is already in progress.
    pub fn start(&mut self) -> bool {
        if self.phase == RunPhase::Running {
            tracing::debug!("start ignored: run in progress");
            return false;
        }
        self.obstacles.clear();
        self.progression.reset(&self.settings);
        self.character = Character::new();
        self.run_time = Duration::ZERO;
        self.run_count += 1;
        self.phase = RunPhase::Running;
        self.events.push(GameEvent::RunStarted {
            run: self.run_count,
        });
        tracing::info!(run = self.run_count, "run started");
        true
    }

    /// Request a jump. Returns `false` when the request is ignored.
    pub fn jump(&mut self) -> bool {
        if self.phase != RunPhase::Running {
            return false;
        }
        if !self.character.jump(&self.settings) {
            tracing::trace!(chain = self.character.jump_chain(), "jump ignored");
            return false;
        }
        let chain = self.character.jump_chain();
        tracing::debug!(chain, "jump");
        self.events.push(GameEvent::Jumped { chain });
        true
    }

    /// Start or stop ducking. Starting only applies during a run; stopping
    /// always applies. Returns whether the ducking state changed.
    pub fn duck(&mut self, active: bool) -> bool {
        if active && self.phase != RunPhase::Running {
            return false;
        }
        if !self.character.duck(active) {
            return false;
        }
        self.events.push(GameEvent::DuckChanged { ducking: active });
        true
    }

    /// Give the persistence layer up to `timeout` to finish outstanding
    /// saves. Call once before dropping the session.
    pub fn flush_persistence(&mut self, timeout: Duration) -> bool {
        self.persistence.flush(timeout)
    }

    /// Advance the session by one frame of real elapsed time.
    ///
    /// `dt` is clamped to `max_frame_delta`, then integrated in slices short
    /// enough that no obstacle can pass through the character unchecked.
    pub fn update(&mut self, dt: Duration) -> FrameReport {
        let _span = tracing::info_span!("session_update").entered();
        let dt = dt.min(self.settings.max_frame_delta());
        let events_before = self.events.len();
        let board_before = self.scoreboard();

        self.poll_persistence();
        if self.phase == RunPhase::Running {
            self.step_run(dt);
        }

        let scoreboard = self.scoreboard();
        FrameReport {
            phase: self.phase,
            scoreboard,
            scoreboard_changed: scoreboard != board_before,
            events: self.events.len() - events_before,
        }
    }

    fn step_run(&mut self, dt: Duration) {
        let secs = dt.as_secs_f32();
        self.run_time += dt;

        // Move in slices no longer than the shallowest overlap window so an
        // obstacle cannot skip over the character within one frame.
        let travel = self.progression.speed() * secs;
        let slices = (travel / MAX_SLICE_TRAVEL).ceil().max(1.0) as u32;
        let slice_secs = secs / slices as f32;
        let slice_travel = travel / slices as f32;
        for _ in 0..slices {
            if self.step_slice(slice_secs, slice_travel) {
                return;
            }
        }

        if let Some(o) = self
            .obstacles
            .tick_spawner(dt, &self.settings, &mut self.rng)
        {
            self.events.push(GameEvent::ObstacleSpawned {
                id: o.id,
                kind: o.kind,
            });
        }

        if self.progression.tick(dt, &self.settings) > 0 {
            self.events.push(GameEvent::DistanceTick {
                distance: self.progression.distance(),
                speed: self.progression.speed(),
            });
        }

        self.scenery
            .advance(travel, &self.settings, &mut self.scenery_rng);

        tracing::trace!(
            score = self.score(),
            distance = self.distance(),
            speed = self.speed(),
            obstacles = self.obstacles.len(),
            "frame"
        );
    }

    /// Integrate the character and move obstacles by one slice of a frame.
    /// Returns `true` if the slice ended the run.
    fn step_slice(&mut self, secs: f32, travel: f32) -> bool {
        if self.character.tick(secs, &self.settings) {
            tracing::debug!("landed");
            self.events.push(GameEvent::Landed);
        }

        let passed = self.obstacles.advance(travel, self.settings.despawn_distance);
        let first_score = self.obstacles.passed() - passed.len() as u32;
        for (i, obstacle) in passed.iter().enumerate() {
            let score = first_score + i as u32 + 1;
            tracing::debug!(id = obstacle.id.0, score, "obstacle passed");
            self.events.push(GameEvent::ObstaclePassed {
                id: obstacle.id,
                score,
            });
        }

        let character_box = collision::character_box(&self.character, &self.settings);
        let hit = collision::first_hit(&character_box, self.obstacles.active())
            .map(|o| (o.id, o.kind));
        match hit {
            Some((id, kind)) => {
                self.end_run(id, kind);
                true
            }
            None => false,
        }
    }

    fn end_run(&mut self, id: ObstacleId, kind: ObstacleKind) {
        self.phase = RunPhase::Over;
        self.events.push(GameEvent::Collision { id, kind });

        let result = HighScoreRecord::new(self.score(), self.distance());
        let new_record = result.beats(&self.high_scores);
        if new_record {
            self.high_scores = self.high_scores.merged(result);
            self.persistence.request_save(self.high_scores);
        }
        tracing::info!(
            score = result.score,
            distance = result.distance,
            %kind,
            new_record,
            "run over"
        );
        self.events.push(GameEvent::RunOver {
            score: result.score,
            distance: result.distance,
            new_record,
        });
    }

    /// Fold in any record the persistence layer finished loading. Only the
    /// displayed high-water marks change; gameplay state is untouched.
    fn poll_persistence(&mut self) {
        while let Some(record) = self.persistence.poll() {
            self.high_scores = self.high_scores.merged(record);
            tracing::debug!(?record, "high scores loaded");
            self.events.push(GameEvent::HighScoresLoaded { record });
        }
    }
}
