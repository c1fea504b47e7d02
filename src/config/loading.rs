//! Configuration loading from files and environment variables
//!
//! Environment variables take precedence over the file so container
//! deployments can point at a relay or a cache volume without editing it.

use anyhow::{Context, Result};
use std::path::Path;

use super::types::{Config, RelayConfig};

/// Relay host; the relay is only enabled when the port is set too
pub const ENV_RELAY_HOST: &str = "BBS_FETCH_RELAY_HOST";
pub const ENV_RELAY_PORT: &str = "BBS_FETCH_RELAY_PORT";
pub const ENV_USER_AGENT: &str = "BBS_FETCH_USER_AGENT";
pub const ENV_CACHE_DIR: &str = "BBS_FETCH_CACHE_DIR";

/// Apply `BBS_FETCH_*` overrides from `lookup`
///
/// Takes the variable source as a function so tests do not touch the
/// process environment.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(agent) = lookup(ENV_USER_AGENT) {
        config.upstream.user_agent = agent;
    }
    if let Some(dir) = lookup(ENV_CACHE_DIR) {
        config.cache.dir = dir.into();
    }
    match (lookup(ENV_RELAY_HOST), lookup(ENV_RELAY_PORT)) {
        (Some(host), Some(port)) => {
            let port = port
                .parse::<u16>()
                .with_context(|| format!("{} is not a port: '{}'", ENV_RELAY_PORT, port))?;
            tracing::info!("Using relay {}:{} from environment", host, port);
            config.upstream.relay = Some(RelayConfig { host, port });
        }
        (None, None) => {}
        _ => anyhow::bail!(
            "{} and {} must be set together",
            ENV_RELAY_HOST,
            ENV_RELAY_PORT
        ),
    }
    Ok(())
}

/// Load configuration from a TOML file, with environment variable overrides
pub fn load_config(config_path: impl AsRef<Path>) -> Result<Config> {
    let path = config_path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    config.validate()?;

    Ok(config)
}

/// Load from `config_path` if it exists, otherwise start from defaults
///
/// Environment overrides apply in both cases.
pub fn load_config_or_default(config_path: impl AsRef<Path>) -> Result<Config> {
    let path = config_path.as_ref();
    if path.exists() {
        return load_config(path);
    }
    tracing::info!(
        "Config file '{}' not found; using defaults",
        path.display()
    );
    let mut config = create_default_config();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

/// Create a default configuration for first runs and tests
#[must_use]
pub fn create_default_config() -> Config {
    Config::default()
}
