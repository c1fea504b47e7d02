//! Board titles and the menu target

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::debug;

use super::FetchEngine;
use crate::cache::{CacheKey, unix_now};
use crate::error::FetchError;
use crate::protocol::menu::find_title;
use crate::protocol::setting::extract_title;
use crate::transport::HttpRequest;

impl FetchEngine {
    /// Human-readable title of the target's board
    ///
    /// Tries the memo, then the board's settings file, then the cached menu
    /// and the hidden boards. Whatever is found (even nothing) is memoized
    /// until the next reset.
    pub async fn board_name(&self) -> String {
        let board = self.target.board();
        if board.is_empty() {
            return String::new();
        }
        if let Some(name) = self.client.names.get(board) {
            return name;
        }

        let mut name = String::new();
        if self.target.is_resolved() {
            if let Some(text) = self.setting_text().await {
                name = extract_title(&text);
            }
        }
        if name.is_empty() {
            let menu = self.client.menu.cached().await.unwrap_or_default();
            name = find_title(
                &String::from_utf8_lossy(&menu),
                board,
                &self.client.config.upstream.hidden_boards,
            )
            .unwrap_or_default();
        }

        debug!(board, name = %name, "board name resolved");
        self.client.names.record(board, &name).await;
        name
    }

    /// Settings file text, from cache while it is fresh or the origin is
    /// penalized, otherwise downloaded
    async fn setting_text(&self) -> Option<String> {
        let (server, board) = (self.target.server(), self.target.board());
        let key = CacheKey::setting(server, board);
        let cache = &self.client.cache;
        let now = unix_now();

        let penalized = self
            .client
            .penalties
            .is_penalized(&self.client.penalty_key(server));
        let fresh = cache
            .stat(&key)
            .await
            .is_ok_and(|stat| stat.modified > now);

        if !penalized && !fresh {
            let request = HttpRequest::get(self.client.urls.setting(server, board));
            match self.client.transport.get(request).await {
                Ok(response) if response.status == 200 && !response.body.is_empty() => {
                    let expires = now.saturating_add(lifetime_secs(
                        self.client.config.limits.setting_lifetime,
                    ));
                    if let Err(e) = cache.set(&key, &response.body).await {
                        debug!(key = %key, "Failed to cache settings file: {}", e);
                    } else if let Err(e) = cache.set_modified(&key, expires, now).await {
                        debug!(key = %key, "Failed to stamp settings file: {}", e);
                    }
                    return Some(self.client.codec.decode(&response.body).into_owned());
                }
                Ok(response) => {
                    debug!(key = %key, status = response.status, "settings file not served");
                }
                Err(e) => debug!(key = %key, "Settings file request failed: {}", e),
            }
        }

        let data = cache.get(&key).await.ok()?;
        Some(self.client.codec.decode(&data).into_owned())
    }

    /// Menu target: the cached normalized menu, downloaded when absent
    pub(super) async fn fetch_menu(&mut self) -> Bytes {
        let menu = Arc::clone(&self.client.menu);
        let cached = match self.client.cache.stat(&CacheKey::menu()).await {
            Ok(stat) => menu.cached().await.ok().map(|data| (data, stat)),
            Err(_) => None,
        };
        if let Some((data, stat)) = cached {
            self.state.status = 304;
            self.state.size = stat.size;
            self.state.modified = stat.modified;
            return data;
        }

        match menu.download().await {
            Ok(downloaded) => {
                self.state.status = 200;
                self.state.size = downloaded.text.len() as u64;
                self.state.modified = downloaded.modified;
                downloaded.text
            }
            Err(e) => {
                self.state.status = 0;
                self.set_error(FetchError::Transport(format!("{:#}", e)));
                Bytes::new()
            }
        }
    }
}

fn lifetime_secs(lifetime: Duration) -> i64 {
    i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX)
}
