//! Mirror-relay path, taken while the origin is penalized

use bytes::Bytes;
use tracing::debug;

use super::FetchEngine;
use super::reconcile::WriteMode;
use crate::error::FetchError;
use crate::protocol::{is_always_blocked, is_refusal, refusal_payload};
use crate::transport::HttpRequest;
use crate::types::TargetKind;

impl FetchEngine {
    pub(super) async fn relay(&mut self) -> Bytes {
        let body = self.mirror_request().await;
        let status = self.state.status;
        debug!(resource = %self.target, status, bytes = body.len(), "mirror reply");

        if is_refusal(&body) {
            self.state.status = 302;
            if self.state.error.is_none() {
                self.set_error(FetchError::UpstreamRejected(
                    "mirror refused the request; serving cached copy".to_string(),
                ));
            }
            return self.blocked_fallback().await;
        }

        if status == 200 && !body.is_empty() {
            self.state.cache_modified = self.state.req_time;
            let mode = match self.target.kind() {
                TargetKind::Thread => WriteMode::MirrorThread,
                TargetKind::Board | TargetKind::Menu => WriteMode::MirrorBoard,
            };
            if self.write_cache(&body, mode).await {
                self.state.size = body.len() as u64;
                return body;
            }
            // Not longer than what we have; the cache stays authoritative
            return self.cached_or_retired().await;
        }

        if status != 200 && status != 304 {
            self.set_error(FetchError::UpstreamRejected(format!(
                "mirror answered {}",
                status
            )));
        }
        self.cached_or_retired().await
    }

    /// Ask the mirror for the target
    ///
    /// Always-blocked origins and network failures answer with the canned
    /// refusal so the caller takes the blocked fallback.
    async fn mirror_request(&mut self) -> Bytes {
        let upstream = &self.client.config.upstream;
        let (server, board) = (self.target.server(), self.target.board());
        if is_always_blocked(server, &upstream.always_blocked) {
            debug!(resource = %self.target, "origin class is never mirrored");
            return Bytes::from_static(refusal_payload());
        }

        let urls = &self.client.urls;
        let request = match self.target.kind() {
            TargetKind::Thread => HttpRequest::get(urls.mirror_thread(
                &upstream.mirror_host,
                server,
                board,
                self.target.thread(),
            )),
            TargetKind::Board | TargetKind::Menu => {
                let since = self
                    .client
                    .cache
                    .stat(&self.target.cache_key())
                    .await
                    .ok()
                    .map(|stat| stat.modified);
                HttpRequest::get(urls.mirror_board(&upstream.mirror_host, server, board))
                    .if_modified_since(since)
            }
        };

        match self.client.transport.get(request).await {
            Ok(response) => {
                self.state.status = response.status;
                if response.status == 304 {
                    Bytes::new()
                } else {
                    response.body
                }
            }
            Err(e) => {
                self.set_error(FetchError::Transport(e.to_string()));
                Bytes::from_static(refusal_payload())
            }
        }
    }
}
