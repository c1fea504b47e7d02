//! Per-call fetch result

use bytes::Bytes;

use crate::error::FetchError;

/// Result of one [`FetchEngine::fetch`](crate::FetchEngine::fetch) call
///
/// `data` is always protocol-shaped (real, cached or synthesized) unless the
/// call failed a precondition or a board moved; in those cases it is empty
/// and `error` says why. A `status` of 0 means no HTTP response was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub data: Bytes,
    pub status: u16,
    /// Last-modified time, unix seconds (0 if unknown)
    pub modified: i64,
    /// Byte size of the resource as last observed
    pub size: u64,
    pub error: Option<FetchError>,
}

impl FetchOutcome {
    /// Check if the call produced data without any error attached
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.error.is_none()
    }

    /// Count of `\n`-terminated records in the payload
    #[must_use]
    pub fn num_lines(&self) -> usize {
        count_lines(&self.data)
    }
}

/// Count `\n` bytes
#[inline]
#[must_use]
pub fn count_lines(data: &[u8]) -> usize {
    data.iter().filter(|&&b| b == b'\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_lines() {
        let outcome = FetchOutcome {
            data: Bytes::from_static(b"a<>b\nc<>d\n"),
            status: 200,
            modified: 0,
            size: 10,
            error: None,
        };
        assert_eq!(outcome.num_lines(), 2);
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_count_lines_ignores_trailing_fragment() {
        assert_eq!(count_lines(b""), 0);
        assert_eq!(count_lines(b"no newline"), 0);
        assert_eq!(count_lines(b"one\ntwo"), 1);
    }
}
