//! Default values for configuration fields
//!
//! This module centralizes all default value functions used in serde deserialization.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{timing, upstream, wire};
use crate::protocol::HiddenBoard;

#[inline]
pub fn menu_host() -> String {
    upstream::MENU_HOST.to_string()
}

#[inline]
pub fn menu_file() -> String {
    upstream::MENU_FILE.to_string()
}

#[inline]
pub fn mirror_host() -> String {
    upstream::MIRROR_HOST.to_string()
}

#[inline]
pub fn user_agent() -> String {
    upstream::USER_AGENT.to_string()
}

/// Origins the mirror never serves
#[inline]
pub fn always_blocked() -> Vec<String> {
    upstream::ALWAYS_BLOCKED_SUFFIXES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[inline]
pub fn hidden_boards() -> BTreeMap<String, HiddenBoard> {
    crate::protocol::menu::default_hidden_boards()
}

/// Default request timeout (12 seconds)
#[inline]
pub fn request_timeout() -> Duration {
    timing::REQUEST_TIMEOUT
}

/// Default payload cap (600 KiB)
#[inline]
pub fn max_payload() -> usize {
    wire::MAX_PAYLOAD
}

/// Default penalty window (1 minute)
#[inline]
pub fn penalty_window() -> Duration {
    timing::PENALTY_WINDOW
}

/// Default server directory rebuild period (1 hour)
#[inline]
pub fn directory_refresh() -> Duration {
    timing::DIRECTORY_REFRESH
}

/// Default board name reset period (24 hours)
#[inline]
pub fn board_name_reset() -> Duration {
    timing::BOARD_NAME_RESET
}

/// Default settings file lifetime (1 week)
#[inline]
pub fn setting_lifetime() -> Duration {
    Duration::from_secs(timing::SETTING_LIFETIME_SECS.unsigned_abs())
}

#[inline]
pub fn cache_dir() -> PathBuf {
    PathBuf::from("./bbs-cache")
}

/// Name printed in the first field of a thread placeholder
#[inline]
pub fn site_name() -> String {
    "bbs-fetch".to_string()
}
