//! High-water marks and the persistence capability the session is given.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Best score and best distance. The two marks are tracked independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub score: u32,
    pub distance: u32,
}

impl HighScoreRecord {
    pub fn new(score: u32, distance: u32) -> Self {
        Self { score, distance }
    }

    /// Element-wise maximum. Merging never lowers either mark.
    pub fn merged(self, other: HighScoreRecord) -> Self {
        Self {
            score: self.score.max(other.score),
            distance: self.distance.max(other.distance),
        }
    }

    /// True when either mark of `self` is better than `best`.
    pub fn beats(&self, best: &HighScoreRecord) -> bool {
        self.score > best.score || self.distance > best.distance
    }
}

/// Numbers a score display shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: u32,
    pub distance: u32,
    pub high_score: u32,
    pub high_distance: u32,
}

/// Injected high-score storage.
///
/// Implementations must never block the frame loop: `request_*` only
/// enqueue work and `poll` returns immediately. Failures are absorbed by the
/// implementation; the session only ever sees successfully loaded records.
pub trait ScorePersistence {
    /// Ask for the stored record of the current player.
    fn request_load(&mut self);

    /// Store `record` as the new high-water mark.
    fn request_save(&mut self, record: HighScoreRecord);

    /// A record loaded since the last poll, if any.
    fn poll(&mut self) -> Option<HighScoreRecord>;

    /// Wait up to `timeout` for queued requests to finish. Only for use at
    /// shutdown. Returns `false` if work may still be outstanding.
    fn flush(&mut self, _timeout: Duration) -> bool {
        true
    }
}

/// Keeps high scores in memory only.
#[derive(Debug, Default)]
pub struct NoPersistence;

impl ScorePersistence for NoPersistence {
    fn request_load(&mut self) {}

    fn request_save(&mut self, _record: HighScoreRecord) {}

    fn poll(&mut self) -> Option<HighScoreRecord> {
        None
    }
}
