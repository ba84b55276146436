//! Runner kernel: the per-frame game loop and everything it mutates.
//!
//! # Invariants
//! - Gameplay state lives here; renderers and persistence only read it.
//! - All state mutations flow through [`GameSession`] operations.
//! - Given the same seed, settings and sequence of inputs/frame deltas, a
//!   session produces identical runs.

pub mod character;
pub mod clock;
pub mod collision;
pub mod event;
pub mod highscore;
pub mod obstacle;
pub mod progression;
pub mod rng;
pub mod scenery;
pub mod session;
pub mod settings;

pub use character::{Character, Pose};
pub use clock::{Cadence, FixedTimestep};
pub use event::GameEvent;
pub use highscore::{HighScoreRecord, NoPersistence, ScorePersistence, Scoreboard};
pub use obstacle::{Obstacle, ObstacleId, ObstacleKind, ObstacleStream};
pub use progression::{Progression, RunPhase};
pub use scenery::{Prop, PropKind, Scenery};
pub use session::{FrameReport, GameSession};
pub use settings::{GameSettings, ScenerySettings, SettingsError};
