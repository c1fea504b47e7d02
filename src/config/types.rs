//! Configuration type definitions

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::protocol::{HiddenBoard, UrlBuilder};
use crate::types::duration_serde;

/// Main client configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub placeholder: PlaceholderConfig,
}

/// Where requests go and how they identify themselves
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UpstreamConfig {
    #[serde(default = "defaults::menu_host")]
    pub menu_host: String,
    #[serde(default = "defaults::menu_file")]
    pub menu_file: String,
    /// Mirror used while an origin is blocking this client
    #[serde(default = "defaults::mirror_host")]
    pub mirror_host: String,
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
    /// Forwarding relay every request is sent through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay: Option<RelayConfig>,
    /// Host suffixes the mirror never serves
    #[serde(default = "defaults::always_blocked")]
    pub always_blocked: Vec<String>,
    /// Boards missing from the public menu
    #[serde(default = "defaults::hidden_boards")]
    pub hidden_boards: BTreeMap<String, HiddenBoard>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            menu_host: defaults::menu_host(),
            menu_file: defaults::menu_file(),
            mirror_host: defaults::mirror_host(),
            user_agent: defaults::user_agent(),
            relay: None,
            always_blocked: defaults::always_blocked(),
            hidden_boards: defaults::hidden_boards(),
        }
    }
}

impl UpstreamConfig {
    /// URL builder honoring the relay setting
    #[must_use]
    pub fn urls(&self) -> UrlBuilder {
        match &self.relay {
            Some(relay) => UrlBuilder::with_relay(&relay.host, relay.port),
            None => UrlBuilder::direct(),
        }
    }
}

/// Forwarding relay address
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
}

/// Timeouts, caps and memo periods
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LimitsConfig {
    /// Connect + overall request timeout
    #[serde(with = "duration_serde", default = "defaults::request_timeout")]
    pub request_timeout: Duration,
    /// Largest decoded payload accepted for one resource
    #[serde(default = "defaults::max_payload")]
    pub max_payload: usize,
    #[serde(with = "duration_serde", default = "defaults::penalty_window")]
    pub penalty_window: Duration,
    #[serde(with = "duration_serde", default = "defaults::directory_refresh")]
    pub directory_refresh: Duration,
    #[serde(with = "duration_serde", default = "defaults::board_name_reset")]
    pub board_name_reset: Duration,
    /// How long a downloaded settings file is trusted
    #[serde(with = "duration_serde", default = "defaults::setting_lifetime")]
    pub setting_lifetime: Duration,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout: defaults::request_timeout(),
            max_payload: defaults::max_payload(),
            penalty_window: defaults::penalty_window(),
            directory_refresh: defaults::directory_refresh(),
            board_name_reset: defaults::board_name_reset(),
            setting_lifetime: defaults::setting_lifetime(),
        }
    }
}

/// Disk cache settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CacheConfig {
    #[serde(default = "defaults::cache_dir")]
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: defaults::cache_dir(),
        }
    }
}

/// Placeholder record settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlaceholderConfig {
    #[serde(default = "defaults::site_name")]
    pub site_name: String,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            site_name: defaults::site_name(),
        }
    }
}
