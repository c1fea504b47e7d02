//! Board → origin server directory
//!
//! The map is rebuilt from the board menu on a schedule and on demand.
//! Readers clone the current `Arc` under a short read lock; a rebuild runs
//! outside the lock and only the swap takes the write lock, so a lookup
//! sees either the old snapshot or the new one, never a mix.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::protocol::HiddenBoard;
use crate::protocol::menu::merge_hidden;

/// Board → server map
pub type Snapshot = Arc<HashMap<String, String>>;

/// Produces a fresh board → server map
#[async_trait]
pub trait DirectorySource: Send + Sync + fmt::Debug {
    async fn load(&self) -> Result<HashMap<String, String>>;
}

pub struct ServerDirectory {
    snapshot: RwLock<Snapshot>,
    source: Arc<dyn DirectorySource>,
    hidden: BTreeMap<String, HiddenBoard>,
    refreshing: AtomicBool,
}

impl fmt::Debug for ServerDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerDirectory")
            .field("boards", &self.snapshot().len())
            .field("source", &self.source)
            .finish()
    }
}

impl ServerDirectory {
    /// Create a directory holding only the hidden boards
    #[must_use]
    pub fn new(source: Arc<dyn DirectorySource>, hidden: BTreeMap<String, HiddenBoard>) -> Self {
        let mut map = HashMap::new();
        merge_hidden(&mut map, &hidden);
        Self {
            snapshot: RwLock::new(Arc::new(map)),
            source,
            hidden,
            refreshing: AtomicBool::new(false),
        }
    }

    /// Create, build once and keep rebuilding every `period`
    ///
    /// A failed first build leaves the hidden boards only; the next scheduled
    /// rebuild tries again.
    pub async fn start(
        source: Arc<dyn DirectorySource>,
        hidden: BTreeMap<String, HiddenBoard>,
        period: Duration,
    ) -> Arc<Self> {
        let directory = Arc::new(Self::new(source, hidden));
        if let Err(e) = directory.rebuild().await {
            warn!("Initial server directory build failed: {:#}", e);
        }
        directory.spawn_periodic(period);
        directory
    }

    /// Server hosting `board`
    #[must_use]
    pub fn lookup(&self, board: &str) -> Option<String> {
        self.snapshot().get(board).cloned()
    }

    /// Current snapshot
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Rebuild from the source and swap in the result
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn rebuild(&self) -> Result<usize> {
        let mut map = self.source.load().await?;
        merge_hidden(&mut map, &self.hidden);
        let boards = map.len();
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(map);
        info!(boards, "server directory rebuilt");
        Ok(boards)
    }

    /// Rebuild in the background; returns immediately
    ///
    /// Requests arriving while a refresh is already running are coalesced
    /// into it.
    pub fn spawn_refresh(self: &Arc<Self>) {
        if self.refreshing.swap(true, Ordering::AcqRel) {
            debug!("server directory refresh already running");
            return;
        }
        let directory = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = directory.rebuild().await {
                warn!("Server directory refresh failed: {:#}", e);
            }
            directory.refreshing.store(false, Ordering::Release);
        });
    }

    /// Rebuild every `period` until the directory is dropped
    pub fn spawn_periodic(self: &Arc<Self>, period: Duration) {
        let weak: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let Some(directory) = weak.upgrade() else {
                    break;
                };
                if let Err(e) = directory.rebuild().await {
                    warn!("Scheduled server directory rebuild failed: {:#}", e);
                }
            }
        });
    }
}
