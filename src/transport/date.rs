//! IMF-fixdate formatting (`Sun, 06 Nov 1994 08:49:37 GMT`)

use chrono::{DateTime, NaiveDateTime, Utc};

const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Format unix seconds as an HTTP date
///
/// Out-of-range timestamps clamp to the epoch.
#[must_use]
pub fn format_http_date(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .unwrap_or_default()
        .format(IMF_FIXDATE)
        .to_string()
}

/// Parse an HTTP date into unix seconds
///
/// Accepts IMF-fixdate and falls back to RFC 2822 for servers that send a
/// numeric zone.
#[must_use]
pub fn parse_http_date(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, IMF_FIXDATE) {
        return Some(naive.and_utc().timestamp());
    }
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.timestamp())
}
