//! reqwest-backed fetcher

use crate::http::{FetchResponse, HttpFetcher};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

const USER_AGENT: &str = concat!("form-monkey/", env!("CARGO_PKG_VERSION"));

pub struct ReqwestFetcher {
    following: Client,
    direct: Client,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self> {
        let build = |policy: Policy| {
            Client::builder()
                .danger_accept_invalid_certs(true)
                .user_agent(USER_AGENT)
                .redirect(policy)
                .build()
        };

        Ok(Self {
            following: build(Policy::limited(10)).context("failed to build HTTP client")?,
            direct: build(Policy::none()).context("failed to build HTTP client")?,
        })
    }
}

/// Header values may carry opaque bytes; keep what decodes.
fn header_text(value: &HeaderValue) -> String {
    String::from_utf8_lossy(value.as_bytes()).into_owned()
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str, timeout: Duration, follow_redirects: bool) -> Result<FetchResponse> {
        let client = if follow_redirects {
            &self.following
        } else {
            &self.direct
        };

        tracing::debug!("GET {} (follow_redirects={})", url, follow_redirects);
        let response = client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        let mut out = FetchResponse::new(response.status().as_u16(), response.url().as_str());
        for (k, v) in response.headers().iter() {
            out.insert_header(k.as_str(), &header_text(v));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_text_keeps_opaque_values() {
        let plain = HeaderValue::from_static("max-age=31536000; includeSubDomains");
        assert_eq!(header_text(&plain), "max-age=31536000; includeSubDomains");

        let opaque = HeaderValue::from_bytes(b"default-src 'self' caf\xe9").unwrap();
        assert!(opaque.to_str().is_err());
        let text = header_text(&opaque);
        assert!(text.starts_with("default-src 'self' caf"));
        assert!(!text.is_empty());
    }
}
