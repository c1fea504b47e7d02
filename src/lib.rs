//! # bbs-fetch
//!
//! A resilient fetch client for a 2ch-style bulletin board.
//!
//! Board listings and thread logs are fetched with conditional and ranged
//! requests, merged into a local cache, and served from that cache whenever
//! the origin misbehaves. Origins that start refusing the client are
//! penalized for a while and reached through a mirror relay instead.
//!
//! ## Modules
//!
//! - [`engine`]: per-target fetch state machine ([`FetchEngine`])
//! - [`client`]: shared state and its builder ([`Client`])
//! - [`memo`]: penalty box, server directory and board-name memo
//! - [`cache`]: the [`DatCache`](cache::DatCache) contract plus disk and
//!   in-memory stores
//! - [`transport`]: HTTP collaborator (reqwest)
//! - [`protocol`]: URL shapes, menu and settings parsing, placeholders
//! - [`config`]: TOML configuration with environment overrides

pub mod args;
pub mod cache;
pub mod client;
pub mod codec;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod logging;
pub mod memo;
pub mod protocol;
pub mod transport;
pub mod types;

pub use client::{Client, ClientBuilder};
pub use config::{Config, create_default_config, load_config};
pub use engine::FetchEngine;
pub use error::FetchError;
pub use types::{FetchOutcome, Target, TargetKind};
