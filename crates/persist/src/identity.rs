use runner_common::PlayerId;
use std::path::{Path, PathBuf};

use crate::error::PersistError;

/// Source of the identity high scores are stored under.
///
/// Resolution may be slow or fail (it can involve the network); callers run
/// it off the frame loop.
pub trait IdentityProvider: Send {
    fn resolve(&mut self) -> Result<PlayerId, PersistError>;
}

/// A fixed identity, e.g. from the command line.
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub PlayerId);

impl StaticIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(PlayerId::new(id))
    }
}

impl IdentityProvider for StaticIdentity {
    fn resolve(&mut self) -> Result<PlayerId, PersistError> {
        Ok(self.0.clone())
    }
}

/// Identity generated once per installation and kept in a file.
#[derive(Debug)]
pub struct InstallIdentity {
    path: PathBuf,
    cached: Option<PlayerId>,
}

impl InstallIdentity {
    pub const FILE_NAME: &'static str = "player_id";

    /// Identity file inside `dir`. Nothing is read until `resolve`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(Self::FILE_NAME),
            cached: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentityProvider for InstallIdentity {
    fn resolve(&mut self) -> Result<PlayerId, PersistError> {
        if let Some(id) = &self.cached {
            return Ok(id.clone());
        }
        let id = match std::fs::read_to_string(&self.path) {
            Ok(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(PersistError::IdentityUnavailable(format!(
                        "{} is empty",
                        self.path.display()
                    )));
                }
                PlayerId::new(trimmed)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let id = PlayerId::generate();
                if let Some(parent) = self.path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&self.path, id.as_str())?;
                tracing::info!(player = %id, "generated new player identity");
                id
            }
            Err(e) => return Err(e.into()),
        };
        self.cached = Some(id.clone());
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_identity_resolves_to_itself() {
        let mut id = StaticIdentity::new("player-one");
        assert_eq!(id.resolve().unwrap(), PlayerId::new("player-one"));
    }

    #[test]
    fn install_identity_is_stable_across_instances() {
        let tmp = tempfile::tempdir().unwrap();
        let first = InstallIdentity::in_dir(tmp.path()).resolve().unwrap();
        let second = InstallIdentity::in_dir(tmp.path()).resolve().unwrap();
        assert_eq!(first, second);
        assert!(tmp.path().join(InstallIdentity::FILE_NAME).is_file());
    }

    #[test]
    fn empty_identity_file_is_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(InstallIdentity::FILE_NAME), "  \n").unwrap();
        let err = InstallIdentity::in_dir(tmp.path()).resolve().unwrap_err();
        assert!(matches!(err, PersistError::IdentityUnavailable(_)));
    }
}
