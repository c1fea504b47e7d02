//! Cache reconciliation and fallbacks

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};

use super::FetchEngine;
use crate::cache::CacheError;
use crate::protocol::placeholder;
use crate::protocol::Reason;
use crate::types::TargetKind;

/// How fetched bytes are merged into the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum WriteMode {
    /// Overwrite
    Create,
    /// Append non-empty data; empty data only refreshes the time
    Append,
    /// Overwrite only when strictly longer than the cached copy
    MirrorThread,
    /// Overwrite
    MirrorBoard,
}

impl FetchEngine {
    /// Merge `data` into the cache and stamp the modification time
    ///
    /// Returns whether the data was accepted. Store failures are logged,
    /// not surfaced.
    pub(super) async fn write_cache(&mut self, data: &[u8], mode: WriteMode) -> bool {
        let cache = Arc::clone(&self.client.cache);
        let key = self.target.cache_key();
        let modified = self.state.cache_modified;

        let renew = match mode {
            WriteMode::Create | WriteMode::MirrorBoard => true,
            WriteMode::Append => !data.is_empty(),
            WriteMode::MirrorThread => match cache.stat(&key).await {
                Ok(stat) => data.len() as u64 > stat.size,
                Err(_) => true,
            },
        };

        if renew {
            let written = if mode == WriteMode::Append {
                cache.append(&key, data).await
            } else {
                cache.set(&key, data).await
            };
            if let Err(e) = written {
                warn!(key = %key, "Failed to write cache entry: {}", e);
            }
        } else {
            debug!(key = %key, ?mode, bytes = data.len(), "cache left unchanged");
        }

        if modified != 0 {
            if let Err(e) = cache.set_modified(&key, modified, modified).await {
                debug!(key = %key, "Failed to stamp modification time: {}", e);
            }
            self.state.modified = modified;
        }
        renew
    }

    /// Read the cached copy, recording its size and time
    pub(super) async fn read_cached(&mut self) -> Result<Bytes, CacheError> {
        let cache = Arc::clone(&self.client.cache);
        let key = self.target.cache_key();
        let stat = cache.stat(&key).await?;
        let data = cache.get(&key).await?;
        self.state.size = stat.size;
        self.state.modified = stat.modified;
        Ok(data)
    }

    /// Cached copy, or the "retired" placeholder when there is none
    pub(super) async fn cached_or_retired(&mut self) -> Bytes {
        match self.read_cached().await {
            Ok(data) if !data.is_empty() => data,
            Ok(_) => self.placeholder(Reason::Retired),
            Err(e) => {
                debug!(resource = %self.target, "No usable cache: {}", e);
                self.placeholder(Reason::Retired)
            }
        }
    }

    /// Re-read the cache after an append or a refused whole-thread retry
    ///
    /// A store that cannot serve the entry here is reported corrupted.
    pub(super) async fn reread_merged(&mut self) -> Bytes {
        match self.read_cached().await {
            Ok(data) if !data.is_empty() => data,
            Ok(_) => self.placeholder(Reason::Retired),
            Err(e) => {
                warn!(resource = %self.target, "Cache unreadable after merge: {}", e);
                self.placeholder(Reason::Corrupted)
            }
        }
    }

    /// Fallback while the origin or mirror refuses us
    ///
    /// Cached copies at or above the payload cap are reported corrupted.
    pub(super) async fn blocked_fallback(&mut self) -> Bytes {
        let cache = Arc::clone(&self.client.cache);
        let key = self.target.cache_key();
        let Ok(stat) = cache.stat(&key).await else {
            return self.placeholder(Reason::Retired);
        };
        self.state.size = stat.size;
        self.state.modified = stat.modified;

        if stat.size >= self.client.config.limits.max_payload as u64 {
            return self.placeholder(Reason::Corrupted);
        }
        match cache.get(&key).await {
            Ok(data) if !data.is_empty() => data,
            _ => self.placeholder(Reason::Retired),
        }
    }

    /// Synthesize a placeholder record and set the matching error
    pub(super) fn placeholder(&mut self, reason: Reason) -> Bytes {
        let req_time = self.state.req_time;
        let text = match self.target.kind() {
            TargetKind::Thread => placeholder::thread_record(
                &self.client.config.placeholder.site_name,
                reason,
                req_time,
            ),
            TargetKind::Board | TargetKind::Menu => placeholder::board_record(reason, req_time),
        };
        self.set_error(reason.error());
        Bytes::from(self.client.codec.encode(&text).into_owned())
    }
}
