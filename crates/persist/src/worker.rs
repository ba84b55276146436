//! Off-thread persistence for the frame loop.
//!
//! Flow:
//! 1. The session calls `request_load`/`request_save`, which only enqueue a
//!    request on a crossbeam channel.
//! 2. A dedicated thread resolves the player identity and talks to the store.
//! 3. Load results come back on a reply channel the session polls with
//!    `try_recv` once per frame.

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use runner_common::PlayerId;
use runner_kernel::{HighScoreRecord, ScorePersistence};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::PersistError;
use crate::identity::IdentityProvider;
use crate::store::HighScoreStore;

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// A load not answered within this window is abandoned; a late answer is
    /// dropped. Queued loads older than this are skipped by the worker.
    pub request_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
        }
    }
}

enum Request {
    Load { issued: Instant },
    Save { record: HighScoreRecord },
    Flush { ack: Sender<()> },
    Shutdown,
}

enum Reply {
    Loaded(Option<HighScoreRecord>),
    LoadFailed,
}

/// Background persistence implementing the session's capability.
pub struct PersistenceWorker {
    requests: Sender<Request>,
    replies: Receiver<Reply>,
    pending_load: Option<Instant>,
    timeout: Duration,
    handle: Option<JoinHandle<()>>,
}

impl PersistenceWorker {
    /// Spawn the worker thread owning `store` and `identity`.
    pub fn spawn<S, I>(store: S, identity: I, config: WorkerConfig) -> Result<Self, PersistError>
    where
        S: HighScoreStore + 'static,
        I: IdentityProvider + 'static,
    {
        let (request_tx, request_rx) = crossbeam_channel::unbounded::<Request>();
        let (reply_tx, reply_rx) = crossbeam_channel::unbounded::<Reply>();
        let timeout = config.request_timeout;

        let handle = thread::Builder::new()
            .name("highscore-persist".into())
            .spawn(move || {
                Backend {
                    store,
                    identity,
                    player: None,
                    timeout,
                }
                .run(request_rx, reply_tx)
            })?;

        Ok(Self {
            requests: request_tx,
            replies: reply_rx,
            pending_load: None,
            timeout,
            handle: Some(handle),
        })
    }

    /// Whether a load is still outstanding.
    pub fn load_pending(&self) -> bool {
        self.pending_load.is_some()
    }

    /// Block until every request queued so far has been processed, or
    /// `timeout` passes. Meant for shutdown, never for the frame loop.
    pub fn flush(&self, timeout: Duration) -> Result<(), PersistError> {
        let (ack_tx, ack_rx) = crossbeam_channel::bounded(1);
        self.requests
            .send(Request::Flush { ack: ack_tx })
            .map_err(|_| PersistError::WorkerStopped)?;
        ack_rx.recv_timeout(timeout).map_err(|e| {
            if e.is_timeout() {
                PersistError::Timeout(timeout)
            } else {
                PersistError::WorkerStopped
            }
        })
    }

    fn send(&self, request: Request) {
        if self.requests.send(request).is_err() {
            tracing::warn!("persistence worker is gone; request dropped");
        }
    }
}

impl ScorePersistence for PersistenceWorker {
    fn request_load(&mut self) {
        let issued = Instant::now();
        self.pending_load = Some(issued);
        self.send(Request::Load { issued });
    }

    fn request_save(&mut self, record: HighScoreRecord) {
        self.send(Request::Save { record });
    }

    fn poll(&mut self) -> Option<HighScoreRecord> {
        loop {
            match self.replies.try_recv() {
                Ok(Reply::Loaded(record)) => {
                    if self.pending_load.take().is_none() {
                        tracing::debug!("dropping late high score reply");
                        continue;
                    }
                    if record.is_some() {
                        return record;
                    }
                }
                Ok(Reply::LoadFailed) => {
                    self.pending_load = None;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.pending_load.take().is_some() {
                        tracing::warn!("persistence worker stopped before answering");
                    }
                    break;
                }
            }
        }
        if let Some(issued) = self.pending_load {
            if issued.elapsed() > self.timeout {
                tracing::warn!(timeout = ?self.timeout, "high score load timed out; giving up");
                self.pending_load = None;
            }
        }
        None
    }

    fn flush(&mut self, timeout: Duration) -> bool {
        match PersistenceWorker::flush(self, timeout) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "high score writes may be incomplete");
                false
            }
        }
    }
}

impl Drop for PersistenceWorker {
    fn drop(&mut self) {
        let _ = self.requests.send(Request::Shutdown);
        // Detach rather than join: a store stuck on slow I/O must not hang
        // the caller. Drivers that need saves on disk call `flush` first.
        drop(self.handle.take());
    }
}

struct Backend<S, I> {
    store: S,
    identity: I,
    player: Option<PlayerId>,
    timeout: Duration,
}

impl<S: HighScoreStore, I: IdentityProvider> Backend<S, I> {
    fn run(mut self, requests: Receiver<Request>, replies: Sender<Reply>) {
        for request in requests.iter() {
            match request {
                Request::Load { issued } => {
                    if issued.elapsed() > self.timeout {
                        tracing::debug!("skipping stale high score load");
                        continue;
                    }
                    let reply = match self.load() {
                        Ok(record) => Reply::Loaded(record),
                        Err(e) => {
                            tracing::warn!(error = %e, "could not load high scores");
                            Reply::LoadFailed
                        }
                    };
                    // The session may be gone already.
                    let _ = replies.send(reply);
                }
                Request::Save { record } => {
                    if let Err(e) = self.save(record) {
                        tracing::warn!(error = %e, ?record, "could not save high scores");
                    }
                }
                Request::Flush { ack } => {
                    let _ = ack.send(());
                }
                Request::Shutdown => break,
            }
        }
        tracing::debug!("persistence worker exiting");
    }

    fn player(&mut self) -> Result<PlayerId, PersistError> {
        if let Some(player) = &self.player {
            return Ok(player.clone());
        }
        let player = self.identity.resolve()?;
        self.player = Some(player.clone());
        Ok(player)
    }

    fn load(&mut self) -> Result<Option<HighScoreRecord>, PersistError> {
        let player = self.player()?;
        self.store.load(&player)
    }

    fn save(&mut self, record: HighScoreRecord) -> Result<HighScoreRecord, PersistError> {
        let player = self.player()?;
        self.store.save(&player, record)
    }
}

/// Runs store calls inline on the caller's thread.
///
/// For tests and tools only: a slow store would stall the frame loop.
pub struct SyncPersistence<S, I> {
    store: S,
    identity: I,
    loaded: Option<HighScoreRecord>,
}

impl<S: HighScoreStore, I: IdentityProvider> SyncPersistence<S, I> {
    pub fn new(store: S, identity: I) -> Self {
        Self {
            store,
            identity,
            loaded: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: HighScoreStore, I: IdentityProvider> ScorePersistence for SyncPersistence<S, I> {
    fn request_load(&mut self) {
        let result = self
            .identity
            .resolve()
            .and_then(|player| self.store.load(&player));
        match result {
            Ok(record) => self.loaded = record,
            Err(e) => tracing::warn!(error = %e, "could not load high scores"),
        }
    }

    fn request_save(&mut self, record: HighScoreRecord) {
        let result = self
            .identity
            .resolve()
            .and_then(|player| self.store.save(&player, record));
        if let Err(e) = result {
            tracing::warn!(error = %e, ?record, "could not save high scores");
        }
    }

    fn poll(&mut self) -> Option<HighScoreRecord> {
        self.loaded.take()
    }
}
