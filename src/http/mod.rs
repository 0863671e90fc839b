//! Plain HTTP fetching for the header analyzer

pub mod client;
pub mod response;

use async_trait::async_trait;
use std::time::Duration;

pub use client::ReqwestFetcher;
pub use response::FetchResponse;

/// Single unauthenticated GET.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn get(
        &self,
        url: &str,
        timeout: Duration,
        follow_redirects: bool,
    ) -> anyhow::Result<FetchResponse>;
}
