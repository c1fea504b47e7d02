//! Wire format helpers for the bulletin-board protocol
//!
//! Everything here is pure: URL shapes, menu and settings parsing, and the
//! placeholder records. The engine decides when to use which.

pub mod menu;
pub mod placeholder;
pub mod setting;
pub mod urls;

pub use menu::{HiddenBoard, MenuFilter};
pub use placeholder::Reason;
pub use urls::UrlBuilder;

use crate::constants::wire::{REFUSAL_NAGOYA, REFUSAL_SCAN_LEN, REFUSAL_TANPAN};

/// Canned payload the mirror returns when it refuses a request
#[must_use]
pub fn refusal_payload() -> &'static [u8] {
    REFUSAL_TANPAN
}

/// Check if a mirror response is a refusal
///
/// Only the first [`REFUSAL_SCAN_LEN`] bytes are scanned.
#[must_use]
pub fn is_refusal(data: &[u8]) -> bool {
    let head = &data[..data.len().min(REFUSAL_SCAN_LEN)];
    contains(head, REFUSAL_TANPAN) || contains(head, REFUSAL_NAGOYA)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Check a partial thread body for continuity with the cached copy
///
/// A range request starts one byte before the cached end, so an intact
/// thread answers with the cached trailing `\n`. Returns the new bytes with
/// that byte stripped, or `None` when the thread was rewritten upstream.
#[must_use]
pub fn strip_continuity(body: &[u8]) -> Option<&[u8]> {
    match body.split_first() {
        Some((b'\n', rest)) => Some(rest),
        _ => None,
    }
}

/// Check if an origin is in a class the mirror never serves
#[must_use]
pub fn is_always_blocked(server: &str, suffixes: &[String]) -> bool {
    suffixes
        .iter()
        .any(|suffix| !suffix.is_empty() && server.ends_with(suffix.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refusal_detection() {
        let mut data = b"<html>".to_vec();
        data.extend_from_slice(REFUSAL_NAGOYA);
        assert!(is_refusal(&data));
        assert!(is_refusal(refusal_payload()));
        assert!(!is_refusal(b"1<>2<>3\n"));
        assert!(!is_refusal(b""));
    }

    #[test]
    fn test_refusal_beyond_scan_window_ignored() {
        let mut data = vec![b'a'; REFUSAL_SCAN_LEN];
        data.extend_from_slice(REFUSAL_TANPAN);
        assert!(!is_refusal(&data));
    }

    #[test]
    fn test_strip_continuity() {
        assert_eq!(strip_continuity(b"\nnew line\n"), Some(&b"new line\n"[..]));
        assert_eq!(strip_continuity(b"\n"), Some(&b""[..]));
        assert_eq!(strip_continuity(b"x\n"), None);
        assert_eq!(strip_continuity(b""), None);
    }

    #[test]
    fn test_always_blocked() {
        let suffixes = vec![".bbspink.com".to_string()];
        assert!(is_always_blocked("pele.bbspink.com", &suffixes));
        assert!(!is_always_blocked("hayabusa.2ch.net", &suffixes));
        assert!(!is_always_blocked("pele.bbspink.com", &[]));
    }

    #[test]
    fn test_empty_suffix_blocks_nothing() {
        let suffixes = vec![String::new()];
        assert!(!is_always_blocked("hayabusa.2ch.net", &suffixes));
    }
}
