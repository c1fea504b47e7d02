//! Synthesized records for resources that cannot be served
//!
//! A placeholder is shaped exactly like one real record so readers that
//! parse the protocol format never see an empty or malformed payload.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

use crate::error::FetchError;

const JST_OFFSET_SECS: i64 = 9 * 3600;

/// Why a placeholder was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// Resource gone or unreachable
    Retired,
    /// Cached copy at or above the payload cap
    Corrupted,
}

impl Reason {
    /// Message for a thread record
    #[must_use]
    pub const fn thread_message(&self) -> &'static str {
        match self {
            Self::Retired => "スレッドを発見できませんでした。dat落ちのようです。",
            Self::Corrupted => "DATが壊れているため表示できません。",
        }
    }

    /// Title field of a thread record
    #[must_use]
    pub const fn thread_title(&self) -> &'static str {
        match self {
            Self::Retired => "アクセス不可(dat落ち)",
            Self::Corrupted => "なんかえらーだって",
        }
    }

    /// Message for a board listing line
    #[must_use]
    pub const fn board_message(&self) -> &'static str {
        match self {
            Self::Retired => "２ちゃんねるにアクセスできませんでした。",
            Self::Corrupted => "板が壊れているため表示できません",
        }
    }

    /// Error reported alongside the placeholder
    #[must_use]
    pub fn error(&self) -> FetchError {
        match self {
            Self::Retired => FetchError::UpstreamRejected("アクセス不可(dat落ち)".to_string()),
            Self::Corrupted => FetchError::DataCorrupt("壊れているため表示できません。".to_string()),
        }
    }
}

/// Thread record: `{site}<><>{date}<>{message}<>{title}\n`
#[must_use]
pub fn thread_record(site: &str, reason: Reason, req_time: i64) -> String {
    format!(
        "{}<><>{}<>{}<>{}\n",
        site,
        post_date(req_time),
        reason.thread_message(),
        reason.thread_title()
    )
}

/// Board listing line: `{req_time}.dat<>{message} (1)\n`
#[must_use]
pub fn board_record(reason: Reason, req_time: i64) -> String {
    format!("{}.dat<>{} (1)\n", req_time, reason.board_message())
}

/// Post date as boards print it, in Japan time
///
/// `2011/03/11(金) 14:46:18`
#[must_use]
pub fn post_date(unix: i64) -> String {
    let at = DateTime::<Utc>::from_timestamp(unix.saturating_add(JST_OFFSET_SECS), 0)
        .unwrap_or_default()
        .naive_utc();
    format!(
        "{:04}/{:02}/{:02}({}) {:02}:{:02}:{:02}",
        at.year(),
        at.month(),
        at.day(),
        weekday_ja(at.weekday()),
        at.hour(),
        at.minute(),
        at.second()
    )
}

const fn weekday_ja(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "日",
        Weekday::Mon => "月",
        Weekday::Tue => "火",
        Weekday::Wed => "水",
        Weekday::Thu => "木",
        Weekday::Fri => "金",
        Weekday::Sat => "土",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_date_in_japan_time() {
        // 2011-03-11 05:46:18 UTC
        assert_eq!(post_date(1_299_822_378), "2011/03/11(金) 14:46:18");
        assert_eq!(post_date(0), "1970/01/01(木) 09:00:00");
    }

    #[test]
    fn test_retired_thread_record() {
        let record = thread_record("bbs-fetch", Reason::Retired, 1_299_822_378);
        assert_eq!(
            record,
            "bbs-fetch<><>2011/03/11(金) 14:46:18<>スレッドを発見できませんでした。dat落ちのようです。<>アクセス不可(dat落ち)\n"
        );
        assert_eq!(record.matches("<>").count(), 4);
    }

    #[test]
    fn test_board_records() {
        assert_eq!(
            board_record(Reason::Retired, 1_300_000_000),
            "1300000000.dat<>２ちゃんねるにアクセスできませんでした。 (1)\n"
        );
        assert_eq!(
            board_record(Reason::Corrupted, 1_300_000_000),
            "1300000000.dat<>板が壊れているため表示できません (1)\n"
        );
    }

    #[test]
    fn test_reason_errors() {
        assert!(matches!(Reason::Retired.error(), FetchError::UpstreamRejected(_)));
        assert!(matches!(Reason::Corrupted.error(), FetchError::DataCorrupt(_)));
        assert_eq!(Reason::Retired.error().to_string(), "アクセス不可(dat落ち)");
    }
}
