//! `reqwest`-backed transport

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_ENCODING, HeaderName, LAST_MODIFIED, LOCATION};
use reqwest::redirect::Policy;
use tracing::debug;

use super::{BodyReader, HttpRequest, HttpResponse, Transport, TransportError, parse_http_date};

/// Production transport
///
/// Built with no redirect following, no idle pooling and automatic
/// decompression off; gzip is decoded by [`BodyReader`] so the cap applies to
/// decoded bytes.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    user_agent: String,
    max_body: usize,
}

impl ReqwestTransport {
    pub fn new(
        user_agent: impl Into<String>,
        timeout: Duration,
        max_body: usize,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .connect_timeout(timeout)
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;
        Ok(Self {
            client,
            user_agent: user_agent.into(),
            max_body,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.get(&request.url);
        for (name, value) in request.headers(&self.user_agent) {
            builder = builder.header(name, value);
        }

        let mut response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers();
        let header = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let gzip = header(CONTENT_ENCODING).is_some_and(|v| v.eq_ignore_ascii_case("gzip"));
        let last_modified = header(LAST_MODIFIED).and_then(|v| parse_http_date(&v));
        let location = header(LOCATION);

        let mut reader = BodyReader::new(gzip, self.max_body);
        while let Some(chunk) = response.chunk().await? {
            if reader
                .push(&chunk)
                .map_err(|e| TransportError::Body(e.to_string()))?
            {
                break;
            }
        }
        let body = reader
            .finish()
            .map_err(|e| TransportError::Body(e.to_string()))?;

        debug!(
            url = %request.url,
            status,
            bytes = body.len(),
            gzip,
            "upstream response"
        );

        Ok(HttpResponse {
            status,
            body,
            last_modified,
            location,
        })
    }
}
