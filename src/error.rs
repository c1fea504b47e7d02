//! Error types reported by a fetch
//!
//! A fetch never fails outright: transport and upstream problems are folded
//! into a cached or synthesized payload, and the variant below travels next
//! to that payload so callers can tell a real outage from fresh data.

use thiserror::Error;

/// Reason attached to a [`FetchOutcome`](crate::types::FetchOutcome)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum FetchError {
    /// The engine was used before [`Client`](crate::Client) was installed
    #[error("client not initialized; install one with Client::install_global")]
    NotInitialized,

    /// Malformed thread id or a missing required field
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// DNS, connect, timeout or read failure (no response obtained)
    #[error("transport failure: {0}")]
    Transport(String),

    /// A protocol-meaningful rejection (redirect, missing resource, block)
    #[error("{0}")]
    UpstreamRejected(String),

    /// Cache miss when a fallback was required
    #[error("cache unavailable: {0}")]
    CacheUnavailable(String),

    /// Entry exceeds the payload cap or failed the continuity check
    #[error("{0}")]
    DataCorrupt(String),
}

impl FetchError {
    /// Check if this error was raised without touching the network
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::NotInitialized | Self::InvalidTarget(_))
    }

    /// Check if this is a network-level failure
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Get the appropriate log level for this error
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        match self {
            Self::NotInitialized | Self::InvalidTarget(_) => tracing::Level::ERROR,
            Self::Transport(_) | Self::DataCorrupt(_) => tracing::Level::WARN,
            Self::UpstreamRejected(_) | Self::CacheUnavailable(_) => tracing::Level::DEBUG,
        }
    }
}
