//! Property-based tests using proptest
//!
//! Invariants of the pure wire helpers plus the append invariant of the
//! engine against an in-memory cache.

mod test_helpers;

use bbs_fetch::cache::{CacheKey, DatCache, MemoryCache};
use bbs_fetch::protocol::placeholder::{Reason, board_record, thread_record};
use bbs_fetch::protocol::setting::extract_title;
use bbs_fetch::protocol::{is_refusal, refusal_payload, strip_continuity};
use bbs_fetch::transport::{HttpRequest, HttpResponse};
use bbs_fetch::{FetchEngine, FetchError, Target};
use proptest::prelude::*;
use test_helpers::*;

// =============================================================================
// 1. Range continuity
// =============================================================================

proptest! {
    #[test]
    fn prop_continuity_strips_exactly_one_byte(tail in proptest::collection::vec(any::<u8>(), 0..256)) {
        let mut body = vec![b'\n'];
        body.extend_from_slice(&tail);
        prop_assert_eq!(strip_continuity(&body), Some(&tail[..]));
    }

    #[test]
    fn prop_continuity_rejects_other_first_bytes(
        first in any::<u8>().prop_filter("not a newline", |b| *b != b'\n'),
        tail in proptest::collection::vec(any::<u8>(), 0..64)
    ) {
        let mut body = vec![first];
        body.extend_from_slice(&tail);
        prop_assert!(strip_continuity(&body).is_none());
    }
}

// =============================================================================
// 2. Settings title extraction
// =============================================================================

proptest! {
    #[test]
    fn prop_title_has_no_separator_or_padding(
        title in "[^\n＠]{0,20}",
        suffix in "[^\n]{0,20}",
        rest in "[A-Z_]{1,10}=[a-z]{0,10}"
    ) {
        let text = format!("BBS_TITLE={}＠{}\n{}\n", title, suffix, rest);
        let extracted = extract_title(&text);
        prop_assert!(!extracted.contains('＠'));
        prop_assert!(!extracted.contains('\n'));
        prop_assert_eq!(extracted.as_str(), title.trim_matches(|c| c == ' ' || c == '\t'));
    }

    #[test]
    fn prop_title_absent_is_empty(text in "[a-z\n=]{0,80}") {
        prop_assert_eq!(extract_title(&text), "");
    }
}

// =============================================================================
// 3. Placeholder shape
// =============================================================================

proptest! {
    #[test]
    fn prop_thread_placeholder_is_one_record(
        site in "[a-zA-Z0-9-]{1,16}",
        req_time in 0i64..4_000_000_000,
        corrupted in any::<bool>()
    ) {
        let reason = if corrupted { Reason::Corrupted } else { Reason::Retired };
        let record = thread_record(&site, reason, req_time);
        prop_assert!(record.ends_with('\n'));
        prop_assert_eq!(record.matches('\n').count(), 1);
        prop_assert_eq!(record.split("<>").count(), 5);
        prop_assert!(record.starts_with(&site));
    }

    #[test]
    fn prop_board_placeholder_names_a_dat(req_time in 0i64..4_000_000_000) {
        let record = board_record(Reason::Retired, req_time);
        let prefix = format!("{}.dat<>", req_time);
        prop_assert!(record.starts_with(&prefix));
        prop_assert!(record.ends_with(" (1)\n"));
    }
}

// =============================================================================
// 4. Request headers
// =============================================================================

proptest! {
    #[test]
    fn prop_range_header_matches_offset(offset in 1u64..10_000_000) {
        let headers = HttpRequest::get("http://s.2ch.net/b/dat/1.dat")
            .range_from(Some(offset))
            .headers("Monazilla/1.00");
        let range = headers.iter().find(|(name, _)| *name == "Range").map(|(_, v)| v.clone());
        prop_assert_eq!(range, Some(format!("bytes={}-", offset)));
        prop_assert!(!headers.iter().any(|(name, _)| *name == "Accept-Encoding"));
        prop_assert_eq!(headers.last().map(|(name, _)| *name), Some("Connection"));
    }

    #[test]
    fn prop_refusal_detected_anywhere_in_scan_window(pad in 0usize..1000) {
        let mut body = vec![b'a'; pad];
        body.extend_from_slice(refusal_payload());
        prop_assert!(is_refusal(&body));
    }
}

// =============================================================================
// 5. Target parsing
// =============================================================================

proptest! {
    #[test]
    fn prop_positive_thread_ids_accepted(id in 1u64..u64::MAX) {
        let target = Target::new("s.2ch.net", "news", &id.to_string());
        prop_assert!(target.is_ok());
    }

    #[test]
    fn prop_non_numeric_thread_ids_rejected(id in "[0-9]{0,5}[a-z.-][0-9a-z]{0,5}") {
        let err = Target::new("s.2ch.net", "news", &id).unwrap_err();
        prop_assert!(matches!(err, FetchError::InvalidTarget(_)));
    }
}

// =============================================================================
// 6. Append grows the cache by exactly the new bytes
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_partial_fetch_grows_cache_by_appended_length(
        cached in "[a-z<>]{1,60}\n",
        appended in "[a-z<>]{1,60}\n"
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let (before, after) = runtime.block_on(async {
            let transport = MockTransport::new();
            transport.respond(thread_url(), HttpResponse::new(206, format!("\n{}", appended)));
            let cache = MemoryCache::new();
            let key = CacheKey::thread(SERVER, BOARD, THREAD);
            cache.insert_with_times(key.clone(), cached.as_bytes(), 1_600_000_000, 1_600_000_000);
            let client = start_client(test_config(), transport, cache.clone()).await;

            let mut engine = FetchEngine::new(&client, BOARD, THREAD).unwrap();
            let outcome = engine.fetch().await;
            assert!(outcome.error.is_none());
            (cached.len() as u64, cache.stat(&key).await.unwrap().size)
        });
        prop_assert_eq!(after, before + appended.len() as u64);
    }
}
