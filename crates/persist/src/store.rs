//! High-score stores.
//!
//! The file-backed store keeps every player in one JSON document:
//! ```text
//! highscores.json
//! {
//!   "schema_version": 1,
//!   "players": {
//!     "<player id>": { "score": 12, "distance": 840, "sha256": "<hex>" }
//!   }
//! }
//! ```

use runner_common::PlayerId;
use runner_kernel::HighScoreRecord;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::PersistError;

const SCHEMA_VERSION: u32 = 1;

/// Durable storage for per-player high-water marks.
pub trait HighScoreStore: Send {
    /// The stored record for `player`, or `None` if they have none yet.
    fn load(&mut self, player: &PlayerId) -> Result<Option<HighScoreRecord>, PersistError>;

    /// Merge `record` into the stored marks and return what is now stored.
    /// Never lowers a mark.
    fn save(
        &mut self,
        player: &PlayerId,
        record: HighScoreRecord,
    ) -> Result<HighScoreRecord, PersistError>;
}

/// Volatile store for tests and sessions without a data directory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<PlayerId, HighScoreRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self, player: &PlayerId) -> Result<Option<HighScoreRecord>, PersistError> {
        Ok(self.records.get(player).copied())
    }

    fn save(
        &mut self,
        player: &PlayerId,
        record: HighScoreRecord,
    ) -> Result<HighScoreRecord, PersistError> {
        let stored = self.records.entry(player.clone()).or_default();
        *stored = stored.merged(record);
        Ok(*stored)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    score: u32,
    distance: u32,
    sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    schema_version: u32,
    players: BTreeMap<String, StoredEntry>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            players: BTreeMap::new(),
        }
    }
}

/// JSON file store with schema versioning and per-entry checksums.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub const FILE_NAME: &'static str = "highscores.json";

    /// Open a store in `dir`, creating the directory if needed. The file
    /// itself is created on first save.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, PersistError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(Self::FILE_NAME),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every player in the file, verified. Fails on the first bad entry.
    pub fn entries(&self) -> Result<Vec<(PlayerId, HighScoreRecord)>, PersistError> {
        let file = self.read_file()?;
        file.players
            .iter()
            .map(|(id, entry)| {
                let player = PlayerId::new(id.clone());
                let record = verify_entry(&player, entry)?;
                Ok((player, record))
            })
            .collect()
    }

    fn read_file(&self) -> Result<StoreFile, PersistError> {
        if !self.path.exists() {
            return Ok(StoreFile::default());
        }
        let file: StoreFile = serde_json::from_reader(std::fs::File::open(&self.path)?)?;
        if file.schema_version != SCHEMA_VERSION {
            return Err(PersistError::SchemaMismatch {
                file_version: file.schema_version,
                expected_version: SCHEMA_VERSION,
            });
        }
        Ok(file)
    }

    /// Write through a temporary file so a crash never leaves a torn document.
    fn write_file(&self, file: &StoreFile) -> Result<(), PersistError> {
        let tmp = self.path.with_extension("json.tmp");
        serde_json::to_writer_pretty(std::fs::File::create(&tmp)?, file)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&mut self, player: &PlayerId) -> Result<Option<HighScoreRecord>, PersistError> {
        let file = self.read_file()?;
        file.players
            .get(player.as_str())
            .map(|entry| verify_entry(player, entry))
            .transpose()
    }

    fn save(
        &mut self,
        player: &PlayerId,
        record: HighScoreRecord,
    ) -> Result<HighScoreRecord, PersistError> {
        let mut file = self.read_file()?;
        let existing = file
            .players
            .get(player.as_str())
            .map(|entry| verify_entry(player, entry))
            .transpose()?;

        let merged = existing.unwrap_or_default().merged(record);
        if existing == Some(merged) {
            tracing::debug!(%player, ?merged, "high score unchanged; skipping write");
            return Ok(merged);
        }

        file.players.insert(
            player.as_str().to_owned(),
            StoredEntry {
                score: merged.score,
                distance: merged.distance,
                sha256: entry_checksum(player, merged),
            },
        );
        self.write_file(&file)?;
        tracing::info!(
            %player,
            score = merged.score,
            distance = merged.distance,
            "high score saved"
        );
        Ok(merged)
    }
}

fn verify_entry(player: &PlayerId, entry: &StoredEntry) -> Result<HighScoreRecord, PersistError> {
    let record = HighScoreRecord::new(entry.score, entry.distance);
    let actual = entry_checksum(player, record);
    if actual != entry.sha256 {
        return Err(PersistError::IntegrityMismatch {
            player: player.to_string(),
            expected: entry.sha256.clone(),
            actual,
        });
    }
    Ok(record)
}

fn entry_checksum(player: &PlayerId, record: HighScoreRecord) -> String {
    let mut hasher = Sha256::new();
    hasher.update(player.as_str().as_bytes());
    hasher.update(b"\0");
    hasher.update(record.score.to_le_bytes());
    hasher.update(record.distance.to_le_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> PlayerId {
        PlayerId::new("198.51.100.7")
    }

    #[test]
    fn memory_store_merges() {
        let mut store = MemoryStore::new();
        assert!(store.load(&player()).unwrap().is_none());
        store.save(&player(), HighScoreRecord::new(3, 50)).unwrap();
        let stored = store.save(&player(), HighScoreRecord::new(1, 80)).unwrap();
        assert_eq!(stored, HighScoreRecord::new(3, 80));
        assert_eq!(store.load(&player()).unwrap(), Some(stored));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn file_store_missing_player_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(tmp.path()).unwrap();
        assert!(store.load(&player()).unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn file_store_roundtrip_across_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let mut store = JsonFileStore::open(tmp.path()).unwrap();
            store.save(&player(), HighScoreRecord::new(9, 420)).unwrap();
        }
        let mut store = JsonFileStore::open(tmp.path()).unwrap();
        assert_eq!(
            store.load(&player()).unwrap(),
            Some(HighScoreRecord::new(9, 420))
        );
    }

    #[test]
    fn saving_same_record_twice_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(tmp.path()).unwrap();
        let record = HighScoreRecord::new(4, 100);
        store.save(&player(), record).unwrap();
        let first = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(store.save(&player(), record).unwrap(), record);
        let second = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.entries().unwrap().len(), 1);
    }

    #[test]
    fn lower_save_never_decreases() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(tmp.path()).unwrap();
        store.save(&player(), HighScoreRecord::new(10, 500)).unwrap();
        let stored = store.save(&player(), HighScoreRecord::new(2, 900)).unwrap();
        assert_eq!(stored, HighScoreRecord::new(10, 900));
    }

    #[test]
    fn players_are_kept_apart() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(tmp.path()).unwrap();
        let other = PlayerId::new("203.0.113.9");
        store.save(&player(), HighScoreRecord::new(1, 1)).unwrap();
        store.save(&other, HighScoreRecord::new(2, 2)).unwrap();
        assert_eq!(store.load(&player()).unwrap(), Some(HighScoreRecord::new(1, 1)));
        assert_eq!(store.load(&other).unwrap(), Some(HighScoreRecord::new(2, 2)));
    }

    #[test]
    fn tampered_entry_fails_closed() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(tmp.path()).unwrap();
        store.save(&player(), HighScoreRecord::new(5, 50)).unwrap();

        let mut file: StoreFile =
            serde_json::from_reader(std::fs::File::open(store.path()).unwrap()).unwrap();
        file.players.get_mut(player().as_str()).unwrap().score = 9_999;
        serde_json::to_writer(std::fs::File::create(store.path()).unwrap(), &file).unwrap();

        assert!(matches!(
            store.load(&player()),
            Err(PersistError::IntegrityMismatch { .. })
        ));
        assert!(store.save(&player(), HighScoreRecord::new(6, 60)).is_err());
    }

    #[test]
    fn schema_mismatch_fails_closed() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(tmp.path()).unwrap();
        std::fs::write(
            store.path(),
            r#"{ "schema_version": 999, "players": {} }"#,
        )
        .unwrap();
        match store.load(&player()) {
            Err(PersistError::SchemaMismatch {
                file_version,
                expected_version,
            }) => {
                assert_eq!(file_version, 999);
                assert_eq!(expected_version, SCHEMA_VERSION);
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn garbage_file_is_a_json_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(tmp.path()).unwrap();
        std::fs::write(store.path(), "not json at all").unwrap();
        assert!(matches!(store.load(&player()), Err(PersistError::Json(_))));
    }
}
