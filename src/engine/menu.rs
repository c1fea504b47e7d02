//! Board menu download and caching
//!
//! The menu is fetched only when the directory is rebuilt or when nothing is
//! cached yet. It is stored in its normalized UTF-8 form under
//! [`CacheKey::menu`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, warn};

use crate::cache::{CacheKey, DatCache, unix_now};
use crate::codec::TextCodec;
use crate::config::UpstreamConfig;
use crate::memo::DirectorySource;
use crate::protocol::menu::build_directory;
use crate::protocol::{MenuFilter, UrlBuilder};
use crate::transport::{HttpRequest, Transport};

/// Downloads and caches the board menu
pub struct MenuFetcher {
    cache: Arc<dyn DatCache>,
    transport: Arc<dyn Transport>,
    codec: Arc<dyn TextCodec>,
    url: String,
    filter: MenuFilter,
}

impl fmt::Debug for MenuFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuFetcher").field("url", &self.url).finish()
    }
}

/// A freshly downloaded menu
#[derive(Debug, Clone)]
pub struct Downloaded {
    pub text: Bytes,
    pub modified: i64,
}

impl MenuFetcher {
    pub fn new(
        upstream: &UpstreamConfig,
        urls: &UrlBuilder,
        cache: Arc<dyn DatCache>,
        transport: Arc<dyn Transport>,
        codec: Arc<dyn TextCodec>,
    ) -> Self {
        Self {
            cache,
            transport,
            codec,
            url: urls.menu(&upstream.menu_host, &upstream.menu_file),
            filter: MenuFilter::default(),
        }
    }

    /// Download, normalize and store the menu
    ///
    /// Sends `If-Modified-Since` when a copy is cached; anything but a 200
    /// is an error and leaves the cache alone.
    pub async fn download(&self) -> Result<Downloaded> {
        let key = CacheKey::menu();
        let since = self.cache.stat(&key).await.ok().map(|st| st.modified);
        let request = HttpRequest::get(&self.url)
            .if_modified_since(since)
            .gzip(true);

        let response = self
            .transport
            .get(request)
            .await
            .with_context(|| format!("menu request to {} failed", self.url))?;
        if response.status != 200 {
            return Err(anyhow!("menu not updated (status {})", response.status));
        }

        let modified = response.last_modified.unwrap_or_else(unix_now);
        let html = self.codec.decode(&response.body);
        let text = Bytes::from(self.filter.normalize(&html));

        self.cache
            .set(&key, &text)
            .await
            .context("failed to store menu")?;
        if let Err(e) = self.cache.set_modified(&key, modified, modified).await {
            warn!("Failed to stamp menu modification time: {}", e);
        }
        debug!(bytes = text.len(), modified, "menu downloaded");
        Ok(Downloaded { text, modified })
    }

    /// The cached normalized menu
    pub async fn cached(&self) -> Result<Bytes> {
        self.cache
            .get(&CacheKey::menu())
            .await
            .context("no cached menu")
    }

    /// Fresh menu when the download succeeds, cached copy otherwise
    pub async fn latest(&self) -> Result<Bytes> {
        match self.download().await {
            Ok(downloaded) => Ok(downloaded.text),
            Err(e) => {
                debug!("Menu download skipped: {:#}", e);
                self.cached().await
            }
        }
    }
}

#[async_trait]
impl DirectorySource for MenuFetcher {
    async fn load(&self) -> Result<HashMap<String, String>> {
        let menu = self.latest().await?;
        Ok(build_directory(&String::from_utf8_lossy(&menu)))
    }
}
