//! Time-boxed memo of origins that are blocking this client
//!
//! Reads take a read lock and never block on writers. Writes (new penalties
//! and expiry deletes) go through bounded channels to a single task that
//! owns every mutation, so there is exactly one writer.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::constants::memo::{EXPIRY_QUEUE, PENALTY_QUEUE};

type Entries = Arc<RwLock<HashMap<String, Instant>>>;

enum Command {
    Penalize(String),
    Flush(oneshot::Sender<()>),
}

/// Block-status memo keyed by relay prefix + origin host
///
/// An entry past its expiry is logically absent; the read that notices
/// the expiry queues its removal. Must be created inside a Tokio runtime.
#[derive(Debug)]
pub struct PenaltyBox {
    entries: Entries,
    commands: mpsc::Sender<Command>,
    expiries: mpsc::Sender<String>,
    window: Duration,
}

impl PenaltyBox {
    /// Create the memo and spawn its writer task
    pub fn new(window: Duration) -> Self {
        let entries: Entries = Arc::default();
        let (commands, command_rx) = mpsc::channel(PENALTY_QUEUE);
        let (expiries, expiry_rx) = mpsc::channel(EXPIRY_QUEUE);
        tokio::spawn(run_writer(entries.clone(), command_rx, expiry_rx, window));
        Self {
            entries,
            commands,
            expiries,
            window,
        }
    }

    /// Build the memo key for an origin
    #[must_use]
    pub fn key(relay: &str, server: &str) -> String {
        format!("{}{}", relay, server)
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Check if `key` is within its penalty window
    ///
    /// Never waits: an expired entry is reported absent and its delete is
    /// queued with `try_send`. A full queue drops the delete; the next read
    /// will queue it again.
    pub fn is_penalized(&self, key: &str) -> bool {
        let expiry = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied();
        match expiry {
            Some(expiry) if Instant::now() <= expiry => true,
            Some(_) => {
                let _ = self.expiries.try_send(key.to_string());
                false
            }
            None => false,
        }
    }

    /// Penalize `key` for the window starting now
    ///
    /// Idempotent; the last write wins.
    pub async fn penalize(&self, key: &str) {
        warn!(key, window = ?self.window, "origin penalized");
        if self
            .commands
            .send(Command::Penalize(key.to_string()))
            .await
            .is_err()
        {
            warn!(key, "penalty writer stopped; penalty dropped");
        }
    }

    /// Wait until every previously queued write has been applied
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.commands.send(Command::Flush(tx)).await.is_ok() {
            let _ = rx.await;
        }
    }

    /// Number of stored entries, expired ones included
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

async fn run_writer(
    entries: Entries,
    mut commands: mpsc::Receiver<Command>,
    mut expiries: mpsc::Receiver<String>,
    window: Duration,
) {
    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Penalize(key)) => {
                    let expiry = Instant::now() + window;
                    entries
                        .write()
                        .unwrap_or_else(PoisonError::into_inner)
                        .insert(key, expiry);
                }
                Some(Command::Flush(ack)) => {
                    while let Ok(key) = expiries.try_recv() {
                        remove_expired(&entries, &key);
                    }
                    let _ = ack.send(());
                }
                None => break,
            },
            Some(key) = expiries.recv() => remove_expired(&entries, &key),
        }
    }
    debug!("penalty writer stopped");
}

/// Remove `key` only if it is still expired; a fresh penalty may have
/// replaced it since the delete was queued.
fn remove_expired(entries: &Entries, key: &str) {
    let mut map = entries.write().unwrap_or_else(PoisonError::into_inner);
    if map.get(key).is_some_and(|expiry| Instant::now() > *expiry) {
        map.remove(key);
    }
}
