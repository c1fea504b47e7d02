//! Fetch/cache decision engine
//!
//! One [`FetchEngine`] serves one target. Each [`fetch`](FetchEngine::fetch)
//! picks a path and always returns protocol-shaped data:
//!
//! - **direct**: conditional / ranged GET against the origin, then classify
//!   the status into a cache write, an append, a fallback or a placeholder
//! - **relay**: while the origin is penalized, ask the mirror instead and
//!   accept only data that improves on the cache
//!
//! A block redirect from the origin penalizes it and hands the same call to
//! the relay path.
//!
//! Failures never escape as `Err`; they travel as [`FetchError`] next to a
//! cached copy, a placeholder, or (for moved boards) an empty payload.

mod board_name;
mod direct;
mod menu;
mod reconcile;
mod relay;

pub use menu::{Downloaded, MenuFetcher};

use std::sync::Arc;

use bytes::Bytes;
use once_cell::sync::OnceCell;
use tracing::{debug, error, warn};

use crate::cache::unix_now;
use crate::client::Client;
use crate::error::FetchError;
use crate::protocol::Reason;
use crate::types::{FetchOutcome, Target, TargetKind};

/// Whether a thread request may resume from the cached size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RangeMode {
    /// `Range` + `If-Modified-Since` from the cached copy
    Resume,
    /// Whole resource, gzip allowed
    Full,
}

/// Values reset at the start of every call
#[derive(Debug, Default)]
struct CallState {
    status: u16,
    size: u64,
    modified: i64,
    /// Modification time to stamp on cache writes
    cache_modified: i64,
    error: Option<FetchError>,
    req_time: i64,
    data: Bytes,
    num_lines: OnceCell<usize>,
}

/// Per-target fetch state machine
#[derive(Debug)]
pub struct FetchEngine {
    client: Arc<Client>,
    target: Target,
    state: CallState,
}

impl FetchEngine {
    /// Engine for `board` / `thread`, resolving the server through the
    /// directory
    ///
    /// An empty `thread` targets the board listing, an empty `board` the
    /// menu. An unknown board still yields an engine: fetching its listing
    /// triggers a directory refresh, fetching one of its threads is invalid.
    pub fn new(client: &Arc<Client>, board: &str, thread: &str) -> Result<Self, FetchError> {
        let server = client.directory.lookup(board).unwrap_or_default();
        let target = Target::new(server, board, thread)?;
        Ok(Self::for_target(client, target))
    }

    /// Engine against the process-wide client
    pub fn from_global(board: &str, thread: &str) -> Result<Self, FetchError> {
        let client = Client::global().ok_or(FetchError::NotInitialized)?;
        Self::new(&client, board, thread)
    }

    /// Engine for an explicit target
    #[must_use]
    pub fn for_target(client: &Arc<Client>, target: Target) -> Self {
        Self {
            client: Arc::clone(client),
            target,
            state: CallState::default(),
        }
    }

    #[must_use]
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Run one fetch
    pub async fn fetch(&mut self) -> FetchOutcome {
        self.state = CallState {
            req_time: unix_now(),
            ..CallState::default()
        };

        let data = match self.target.kind() {
            TargetKind::Menu => self.fetch_menu().await,
            TargetKind::Thread if !self.target.is_resolved() => self.unresolved_thread(),
            TargetKind::Board if !self.target.is_resolved() => self.unresolved(),
            TargetKind::Board | TargetKind::Thread => {
                let key = self.client.penalty_key(self.target.server());
                if self.client.penalties.is_penalized(&key) {
                    self.relay().await
                } else {
                    self.direct().await
                }
            }
        };
        self.finish(data)
    }

    /// Status of the last call (0 = no response obtained)
    #[must_use]
    pub fn status(&self) -> u16 {
        self.state.status
    }

    /// Byte size of the resource as last observed
    #[must_use]
    pub fn byte_size(&self) -> u64 {
        self.state.size
    }

    /// Last-modified time, unix seconds
    #[must_use]
    pub fn modified(&self) -> i64 {
        self.state.modified
    }

    #[must_use]
    pub fn error(&self) -> Option<&FetchError> {
        self.state.error.as_ref()
    }

    /// Records in the last payload, counted once per call
    #[must_use]
    pub fn num_lines(&self) -> usize {
        *self
            .state
            .num_lines
            .get_or_init(|| crate::types::count_lines(&self.state.data))
    }

    fn set_error(&mut self, error: FetchError) {
        self.state.error = Some(error);
    }

    /// Board not in the directory: same handling as a board that moved
    fn unresolved(&mut self) -> Bytes {
        debug!(board = self.target.board(), "board not in server directory");
        self.board_moved()
    }

    /// Thread on a board without a server: invalid, no network
    fn unresolved_thread(&mut self) -> Bytes {
        let reason = format!("no server known for board '{}'", self.target.board());
        let data = self.placeholder(Reason::Retired);
        self.set_error(FetchError::InvalidTarget(reason));
        data
    }

    fn board_moved(&mut self) -> Bytes {
        self.client.directory.spawn_refresh();
        self.set_error(FetchError::UpstreamRejected(
            "２ちゃんねるにアクセスできなかったので、サーバー移転チェックを行いました。".to_string(),
        ));
        Bytes::new()
    }

    fn finish(&mut self, data: Bytes) -> FetchOutcome {
        let state = &mut self.state;
        if data.is_empty() && state.error.is_none() {
            state.error = Some(FetchError::CacheUnavailable(
                "no data for target".to_string(),
            ));
        }
        if state.status == 0 && state.error.is_none() {
            state.error = Some(FetchError::Transport("no response obtained".to_string()));
        }
        state.data = data.clone();

        if let Some(err) = &state.error {
            let level = err.log_level();
            if level == tracing::Level::ERROR {
                error!(resource = %self.target, status = state.status, "{}", err);
            } else if level == tracing::Level::WARN {
                warn!(resource = %self.target, status = state.status, "{}", err);
            } else {
                debug!(resource = %self.target, status = state.status, "{}", err);
            }
        }

        FetchOutcome {
            data,
            status: state.status,
            modified: state.modified,
            size: state.size,
            error: state.error.clone(),
        }
    }
}
