//! Direct-origin path

use bytes::Bytes;
use tracing::debug;

use super::reconcile::WriteMode;
use super::{FetchEngine, RangeMode};
use crate::constants::wire::BLOCK_REDIRECT_MARKER;
use crate::error::FetchError;
use crate::protocol::strip_continuity;
use crate::transport::HttpRequest;
use crate::types::TargetKind;

/// Body of one origin exchange; the status lives in the call state
struct Reply {
    body: Bytes,
    /// Redirect pointed at the block page
    blocked: bool,
}

impl Reply {
    const fn empty() -> Self {
        Self {
            body: Bytes::new(),
            blocked: false,
        }
    }
}

impl FetchEngine {
    pub(super) async fn direct(&mut self) -> Bytes {
        let mut mode = RangeMode::Resume;
        loop {
            let reply = self.request(mode).await;
            match self.target.kind() {
                TargetKind::Thread => {
                    if self.state.status == 416 && mode == RangeMode::Resume {
                        debug!(resource = %self.target, "range rejected; refetching whole thread");
                        mode = RangeMode::Full;
                        continue;
                    }
                    return self.classify_thread(reply, mode).await;
                }
                TargetKind::Board | TargetKind::Menu => return self.classify_board(reply).await,
            }
        }
    }

    fn build_request(&self, mode: RangeMode, cached: Option<(u64, i64)>) -> HttpRequest {
        let urls = &self.client.urls;
        let (server, board) = (self.target.server(), self.target.board());
        match self.target.kind() {
            TargetKind::Thread => {
                let request = HttpRequest::get(urls.thread(server, board, self.target.thread()));
                match (mode, cached) {
                    (RangeMode::Resume, Some((size, modified))) => request
                        .range_from((size > 1).then(|| size - 1))
                        .if_modified_since(Some(modified)),
                    _ => request.gzip(true),
                }
            }
            TargetKind::Board | TargetKind::Menu => HttpRequest::get(urls.board(server, board))
                .if_modified_since(cached.map(|(_, modified)| modified))
                .gzip(true),
        }
    }

    async fn request(&mut self, mode: RangeMode) -> Reply {
        let key = self.target.cache_key();
        let cached = self
            .client
            .cache
            .stat(&key)
            .await
            .ok()
            .map(|stat| (stat.size, stat.modified));
        let request = self.build_request(mode, cached);

        let response = match self.client.transport.get(request).await {
            Ok(response) => response,
            Err(e) => {
                self.state.status = 0;
                self.set_error(FetchError::Transport(e.to_string()));
                return Reply::empty();
            }
        };
        self.state.status = response.status;

        if response.is_redirect() {
            let blocked = response
                .location
                .as_deref()
                .is_some_and(|location| location.contains(BLOCK_REDIRECT_MARKER));
            return Reply {
                body: Bytes::new(),
                blocked,
            };
        }

        self.state.size = response.body.len() as u64;
        self.state.cache_modified = response.last_modified.unwrap_or(self.state.req_time);

        let mut body = response.body;
        if response.status == 304 {
            body = Bytes::new();
        } else if mode == RangeMode::Resume && response.status == 206 && !body.is_empty() {
            match strip_continuity(&body).map(<[u8]>::len) {
                Some(fresh) => body = body.slice(body.len() - fresh..),
                None => {
                    debug!(resource = %self.target, "range body does not continue the cache");
                    self.state.status = 416;
                    body = Bytes::new();
                }
            }
        }
        Reply {
            body,
            blocked: false,
        }
    }

    async fn classify_thread(&mut self, reply: Reply, mode: RangeMode) -> Bytes {
        let status = self.state.status;
        debug!(resource = %self.target, status, bytes = reply.body.len(), "origin reply");
        if reply.blocked {
            return self.origin_blocked().await;
        }
        match status {
            200 if !reply.body.is_empty() => {
                self.write_cache(&reply.body, WriteMode::Create).await;
                reply.body
            }
            206 => {
                self.write_cache(&reply.body, WriteMode::Append).await;
                self.reread_merged().await
            }
            416 if mode == RangeMode::Full => self.reread_merged().await,
            301 | 302 | 404 => {
                self.set_error(FetchError::UpstreamRejected(format!(
                    "origin answered {}; thread is no longer served",
                    status
                )));
                self.blocked_fallback().await
            }
            0 | 200 | 304 => self.cached_or_retired().await,
            _ => {
                self.set_error(FetchError::UpstreamRejected(format!(
                    "origin answered {}",
                    status
                )));
                self.cached_or_retired().await
            }
        }
    }

    async fn classify_board(&mut self, reply: Reply) -> Bytes {
        let status = self.state.status;
        debug!(resource = %self.target, status, bytes = reply.body.len(), "origin reply");
        if reply.blocked {
            return self.origin_blocked().await;
        }
        match status {
            200 if !reply.body.is_empty() => {
                self.write_cache(&reply.body, WriteMode::Create).await;
                reply.body
            }
            301 | 302 | 404 => self.board_moved(),
            0 | 200 | 304 => self.cached_or_retired().await,
            _ => {
                self.set_error(FetchError::UpstreamRejected(format!(
                    "origin answered {}",
                    status
                )));
                self.cached_or_retired().await
            }
        }
    }

    /// Redirect to the block page: penalize the origin and retry through
    /// the mirror
    async fn origin_blocked(&mut self) -> Bytes {
        let key = self.client.penalty_key(self.target.server());
        self.client.penalties.penalize(&key).await;
        debug!(resource = %self.target, "origin redirected to its block page; trying mirror");
        self.relay().await
    }
}
