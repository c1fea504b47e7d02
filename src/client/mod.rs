//! Shared client state
//!
//! A [`Client`] owns everything fetches share: configuration, the cache and
//! transport collaborators, and the three process-wide memos. It is built
//! once and handed around as `Arc<Client>`:
//!
//! ```no_run
//! use bbs_fetch::{Client, FetchEngine};
//! use bbs_fetch::config::create_default_config;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = Client::builder(create_default_config()).start().await?;
//! let mut engine = FetchEngine::new(&client, "news", "1234567890")?;
//! let outcome = engine.fetch().await;
//! println!("{} bytes, status {}", outcome.data.len(), outcome.status);
//! # Ok(())
//! # }
//! ```

mod builder;

pub use builder::ClientBuilder;

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::cache::DatCache;
use crate::codec::TextCodec;
use crate::config::Config;
use crate::engine::MenuFetcher;
use crate::memo::{BoardNameMemo, PenaltyBox, ServerDirectory};
use crate::protocol::UrlBuilder;
use crate::transport::Transport;

static GLOBAL: OnceCell<Arc<Client>> = OnceCell::new();

/// Started client shared by every [`FetchEngine`](crate::FetchEngine)
pub struct Client {
    pub(crate) config: Config,
    pub(crate) urls: UrlBuilder,
    pub(crate) cache: Arc<dyn DatCache>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) codec: Arc<dyn TextCodec>,
    pub(crate) menu: Arc<MenuFetcher>,
    pub(crate) penalties: PenaltyBox,
    pub(crate) directory: Arc<ServerDirectory>,
    pub(crate) names: BoardNameMemo,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("relay", &self.urls.relay())
            .field("cache", &self.cache)
            .field("transport", &self.transport)
            .field("directory", &self.directory)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Start building a client
    #[must_use]
    pub fn builder(config: Config) -> ClientBuilder {
        ClientBuilder::new(config)
    }

    /// Make `client` the process-wide instance
    ///
    /// Only the first call wins; later calls hand their client back.
    pub fn install_global(client: Arc<Client>) -> Result<(), Arc<Client>> {
        GLOBAL.set(client)
    }

    /// The process-wide instance, if one was installed
    #[must_use]
    pub fn global() -> Option<Arc<Client>> {
        GLOBAL.get().cloned()
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<dyn DatCache> {
        &self.cache
    }

    #[must_use]
    pub fn penalties(&self) -> &PenaltyBox {
        &self.penalties
    }

    #[must_use]
    pub fn directory(&self) -> &Arc<ServerDirectory> {
        &self.directory
    }

    #[must_use]
    pub fn board_names(&self) -> &BoardNameMemo {
        &self.names
    }

    /// Penalty key for an origin under the configured relay
    #[must_use]
    pub fn penalty_key(&self, server: &str) -> String {
        PenaltyBox::key(self.urls.relay(), server)
    }
}
