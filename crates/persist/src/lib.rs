//! Persistence: high-water marks keyed by an opaque player identity.
//!
//! # Invariants
//! - A save never lowers a stored mark; repeated saves are idempotent.
//! - Stored entries are checksummed; mismatches fail closed.
//! - Failures stay inside this crate. The game loop sees either a loaded
//!   record or nothing.

mod error;
mod identity;
mod store;
mod worker;

pub use error::PersistError;
pub use identity::{IdentityProvider, InstallIdentity, StaticIdentity};
pub use runner_kernel::HighScoreRecord;
pub use store::{HighScoreStore, JsonFileStore, MemoryStore};
pub use worker::{PersistenceWorker, SyncPersistence, WorkerConfig};
