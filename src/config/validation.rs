//! Configuration validation
//!
//! Checks the semantic constraints serde cannot express before a client
//! starts.

use anyhow::{Result, bail};
use std::time::Duration;

use super::types::Config;

/// Penalty windows shorter than this mostly just hammer the blocking origin
const MIN_RECOMMENDED_PENALTY: Duration = Duration::from_secs(10);

impl Config {
    /// Validate configuration for correctness
    ///
    /// - Hosts and the user agent are non-empty
    /// - Timeout and payload cap are non-zero
    /// - A relay, when present, has a host and a port
    /// - No always-blocked suffix is empty
    pub fn validate(&self) -> Result<()> {
        let upstream = &self.upstream;
        for (field, value) in [
            ("upstream.menu_host", &upstream.menu_host),
            ("upstream.menu_file", &upstream.menu_file),
            ("upstream.mirror_host", &upstream.mirror_host),
            ("upstream.user_agent", &upstream.user_agent),
        ] {
            if value.trim().is_empty() {
                bail!("{} must not be empty", field);
            }
        }

        if let Some(relay) = &upstream.relay {
            if relay.host.trim().is_empty() {
                bail!("upstream.relay.host must not be empty");
            }
            if relay.port == 0 {
                bail!("upstream.relay.port must be non-zero");
            }
        }

        if upstream.always_blocked.iter().any(|s| s.trim().is_empty()) {
            bail!("upstream.always_blocked must not contain empty suffixes");
        }

        for (board, hidden) in &upstream.hidden_boards {
            if hidden.server.trim().is_empty() {
                bail!("hidden board '{}' has no server", board);
            }
        }

        if self.limits.request_timeout.is_zero() {
            bail!("limits.request_timeout must be non-zero");
        }
        if self.limits.max_payload == 0 {
            bail!("limits.max_payload must be non-zero");
        }
        if self.limits.directory_refresh.is_zero() || self.limits.board_name_reset.is_zero() {
            bail!("memo refresh periods must be non-zero");
        }

        if self.limits.penalty_window < MIN_RECOMMENDED_PENALTY {
            tracing::warn!(
                "limits.penalty_window is {:?} (< {:?}); a blocked origin will be retried \
                 almost immediately",
                self.limits.penalty_window,
                MIN_RECOMMENDED_PENALTY
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RelayConfig;

    #[test]
    fn test_default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_empty_host_rejected() {
        let mut config = Config::default();
        config.upstream.mirror_host = " ".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("mirror_host"));
    }

    #[test]
    fn test_empty_blocked_suffix_rejected() {
        let mut config = Config::default();
        config.upstream.always_blocked.push(String::new());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("always_blocked"));
    }

    #[test]
    fn test_relay_requires_port() {
        let mut config = Config::default();
        config.upstream.relay = Some(RelayConfig {
            host: "127.0.0.1".into(),
            port: 0,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_limits_rejected() {
        let mut config = Config::default();
        config.limits.max_payload = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.limits.request_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_short_penalty_is_only_a_warning() {
        let mut config = Config::default();
        config.limits.penalty_window = Duration::from_millis(100);
        assert!(config.validate().is_ok());
    }
}
