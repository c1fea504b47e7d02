//! HTTP transport
//!
//! One GET per call. Redirects are surfaced (status + `Location`) rather than
//! followed, bodies are decompressed here and capped, and no connection is
//! kept alive between calls.

mod body;
mod date;
mod http;

pub use body::BodyReader;
pub use date::{format_http_date, parse_http_date};
pub use http::ReqwestTransport;

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Errors for a request that produced no HTTP response
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connect failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to read body: {0}")]
    Body(String),

    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

impl TransportError {
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_body() || err.is_decode() {
            Self::Body(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// A GET request as the engine describes it
///
/// Header policy lives in [`HttpRequest::headers`] so every transport sends
/// the same thing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    /// Sent as `If-Modified-Since` (unix seconds)
    pub if_modified_since: Option<i64>,
    /// Sent as `Range: bytes=N-`
    pub range_from: Option<u64>,
    /// Sent as `Accept-Encoding: gzip`
    pub accept_gzip: bool,
}

impl HttpRequest {
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            if_modified_since: None,
            range_from: None,
            accept_gzip: false,
        }
    }

    #[must_use]
    pub fn if_modified_since(mut self, modified: Option<i64>) -> Self {
        self.if_modified_since = modified;
        self
    }

    #[must_use]
    pub fn range_from(mut self, offset: Option<u64>) -> Self {
        self.range_from = offset;
        self
    }

    #[must_use]
    pub fn gzip(mut self, accept: bool) -> Self {
        self.accept_gzip = accept;
        self
    }

    /// Wire headers for this request
    #[must_use]
    pub fn headers(&self, user_agent: &str) -> Vec<(&'static str, String)> {
        let mut headers = vec![("User-Agent", user_agent.to_string())];
        if let Some(modified) = self.if_modified_since {
            headers.push(("If-Modified-Since", format_http_date(modified)));
        }
        if let Some(offset) = self.range_from {
            headers.push(("Range", format!("bytes={}-", offset)));
        }
        if self.accept_gzip {
            headers.push(("Accept-Encoding", "gzip".to_string()));
        }
        headers.push(("Connection", "close".to_string()));
        headers
    }
}

/// What came back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Decompressed body, at most the configured cap
    pub body: Bytes,
    /// `Last-Modified` (unix seconds) when present and parseable
    pub last_modified: Option<i64>,
    /// `Location` of a redirect
    pub location: Option<String>,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
            last_modified: None,
            location: None,
        }
    }

    #[must_use]
    pub fn with_last_modified(mut self, modified: i64) -> Self {
        self.last_modified = Some(modified);
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Check if this is a redirect
    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        matches!(self.status, 301 | 302 | 303 | 307 | 308)
    }
}

/// Issues a single GET
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_fetch_headers() {
        let request = HttpRequest::get("http://s.2ch.net/news/subject.txt")
            .if_modified_since(Some(784_111_777))
            .gzip(true);
        let headers = request.headers("Monazilla/1.00 (test)");
        assert_eq!(
            headers,
            vec![
                ("User-Agent", "Monazilla/1.00 (test)".to_string()),
                ("If-Modified-Since", "Sun, 06 Nov 1994 08:49:37 GMT".to_string()),
                ("Accept-Encoding", "gzip".to_string()),
                ("Connection", "close".to_string()),
            ]
        );
    }

    #[test]
    fn test_range_headers() {
        let request = HttpRequest::get("http://s.2ch.net/news/dat/1.dat").range_from(Some(39));
        let headers = request.headers("ua");
        assert!(headers.contains(&("Range", "bytes=39-".to_string())));
        assert!(!headers.iter().any(|(name, _)| *name == "Accept-Encoding"));
        assert!(!headers.iter().any(|(name, _)| *name == "If-Modified-Since"));
    }

    #[test]
    fn test_redirect_detection() {
        assert!(HttpResponse::new(302, Bytes::new()).is_redirect());
        assert!(HttpResponse::new(301, Bytes::new()).is_redirect());
        assert!(!HttpResponse::new(206, Bytes::new()).is_redirect());
        assert!(!HttpResponse::new(404, Bytes::new()).is_redirect());
    }
}
