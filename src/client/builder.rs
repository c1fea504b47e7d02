//! Builder for constructing [`Client`] instances
//!
//! Collaborators left unset get production defaults: the reqwest transport,
//! the disk cache under `cache.dir`, and the UTF-8 codec.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::cache::{DatCache, DiskCache};
use crate::codec::{TextCodec, Utf8Codec};
use crate::config::Config;
use crate::engine::MenuFetcher;
use crate::memo::{BoardNameMemo, DirectorySource, PenaltyBox, ServerDirectory};
use crate::transport::{ReqwestTransport, Transport};

use super::Client;

/// Builder for a started [`Client`]
///
/// ```no_run
/// # async fn example() -> anyhow::Result<()> {
/// use bbs_fetch::Client;
/// use bbs_fetch::cache::MemoryCache;
/// use bbs_fetch::config::load_config;
/// use std::sync::Arc;
///
/// let config = load_config("bbs-fetch.toml")?;
/// let client = Client::builder(config)
///     .with_cache(Arc::new(MemoryCache::new()))
///     .start()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ClientBuilder {
    config: Config,
    cache: Option<Arc<dyn DatCache>>,
    transport: Option<Arc<dyn Transport>>,
    codec: Option<Arc<dyn TextCodec>>,
    directory_source: Option<Arc<dyn DirectorySource>>,
}

impl ClientBuilder {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cache: None,
            transport: None,
            codec: None,
            directory_source: None,
        }
    }

    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn DatCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn TextCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Rebuild the server directory from `source` instead of the menu
    #[must_use]
    pub fn with_directory_source(mut self, source: Arc<dyn DirectorySource>) -> Self {
        self.directory_source = Some(source);
        self
    }

    /// Validate the configuration, create the memos and build the directory
    ///
    /// Must run inside a Tokio runtime; the memos spawn their background
    /// tasks here.
    pub async fn start(self) -> Result<Arc<Client>> {
        let config = self.config;
        config.validate().context("invalid configuration")?;

        let urls = config.upstream.urls();
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                ReqwestTransport::new(
                    config.upstream.user_agent.clone(),
                    config.limits.request_timeout,
                    config.limits.max_payload,
                )
                .context("failed to create HTTP transport")?,
            ),
        };
        let cache: Arc<dyn DatCache> = match self.cache {
            Some(cache) => cache,
            None => Arc::new(DiskCache::new(config.cache.dir.clone())),
        };
        let codec: Arc<dyn TextCodec> = match self.codec {
            Some(codec) => codec,
            None => Arc::new(Utf8Codec),
        };

        let menu = Arc::new(MenuFetcher::new(
            &config.upstream,
            &urls,
            cache.clone(),
            transport.clone(),
            codec.clone(),
        ));
        let source: Arc<dyn DirectorySource> = match self.directory_source {
            Some(source) => source,
            None => menu.clone(),
        };
        let directory = ServerDirectory::start(
            source,
            config.upstream.hidden_boards.clone(),
            config.limits.directory_refresh,
        )
        .await;

        let penalties = PenaltyBox::new(config.limits.penalty_window);
        let names = BoardNameMemo::new(config.limits.board_name_reset);

        info!(
            boards = directory.snapshot().len(),
            relay = urls.relay(),
            "client started"
        );

        Ok(Arc::new(Client {
            config,
            urls,
            cache,
            transport,
            codec,
            menu,
            penalties,
            directory,
            names,
        }))
    }
}
