//! Configuration module
//!
//! This module handles all configuration types and loading
//! for the fetch client.

mod defaults;
mod loading;
mod types;
mod validation;

// Re-export public types
pub use loading::{
    ENV_CACHE_DIR, ENV_RELAY_HOST, ENV_RELAY_PORT, ENV_USER_AGENT, apply_env_overrides,
    create_default_config, load_config, load_config_or_default,
};
pub use types::{
    CacheConfig, Config, LimitsConfig, PlaceholderConfig, RelayConfig, UpstreamConfig,
};
