use std::time::Duration;

/// Errors from high-score persistence.
///
/// Every variant means the same thing to gameplay: persistence is
/// unavailable right now. They are logged and never reach the session.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("player identity unavailable: {0}")]
    IdentityUnavailable(String),
    #[error("integrity check failed for player {player}: expected {expected}, got {actual}")]
    IntegrityMismatch {
        player: String,
        expected: String,
        actual: String,
    },
    #[error("schema version mismatch: file has v{file_version}, expected v{expected_version}")]
    SchemaMismatch {
        file_version: u32,
        expected_version: u32,
    },
    #[error("persistence worker stopped")]
    WorkerStopped,
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}
