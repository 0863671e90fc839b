use crate::http::HttpFetcher;
use serde::Serialize;
use std::time::Duration;
use url::Url;

const REDIRECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectStatus {
    Passed,
    Failed,
    Skipped,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedirectCheck {
    pub test: &'static str,
    pub status: RedirectStatus,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
}

impl RedirectCheck {
    fn new(status: RedirectStatus, details: String, final_url: Option<String>) -> Self {
        Self {
            test: "https_redirect",
            status,
            details,
            final_url,
        }
    }

    pub fn passed(&self) -> bool {
        self.status == RedirectStatus::Passed
    }
}

/// Same host and path over plain HTTP; query and fragment dropped.
pub fn plain_http_url(target: &Url) -> Option<Url> {
    let mut http = target.clone();
    http.set_scheme("http").ok()?;
    http.set_query(None);
    http.set_fragment(None);
    Some(http)
}

/// Only HTTPS targets are probed.
pub async fn check_https_redirect(fetcher: &dyn HttpFetcher, target: &Url) -> RedirectCheck {
    if target.scheme() != "https" {
        return RedirectCheck::new(RedirectStatus::Skipped, "URL is not using HTTPS".to_string(), None);
    }

    let Some(http_url) = plain_http_url(target) else {
        return RedirectCheck::new(
            RedirectStatus::Error,
            format!("Cannot derive an HTTP URL from {}", target),
            None,
        );
    };

    match fetcher.get(http_url.as_str(), REDIRECT_TIMEOUT, true).await {
        Ok(resp) if resp.final_url.starts_with("https://") => {
            tracing::info!("HTTP to HTTPS redirection is properly configured");
            RedirectCheck::new(
                RedirectStatus::Passed,
                format!("HTTP correctly redirects to HTTPS: {}", resp.final_url),
                Some(resp.final_url),
            )
        }
        Ok(resp) => {
            tracing::warn!("Site does not redirect HTTP to HTTPS");
            RedirectCheck::new(
                RedirectStatus::Failed,
                format!("HTTP does not redirect to HTTPS. Final URL: {}", resp.final_url),
                Some(resp.final_url),
            )
        }
        Err(e) => {
            tracing::error!("Error checking HTTPS redirection: {:#}", e);
            RedirectCheck::new(
                RedirectStatus::Error,
                format!("Error testing HTTP to HTTPS redirection: {:#}", e),
                None,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::canned::CannedFetcher;
    use crate::http::FetchResponse;

    #[test]
    fn test_plain_http_url_keeps_host_port_and_path() {
        let u = Url::parse("https://shop.test:8443/a/b?x=1#frag").unwrap();
        assert_eq!(plain_http_url(&u).unwrap().as_str(), "http://shop.test:8443/a/b");
    }

    #[tokio::test]
    async fn test_http_target_is_skipped() {
        let fetcher = CannedFetcher::new();
        let check = check_https_redirect(&fetcher, &Url::parse("http://a.test/").unwrap()).await;
        assert_eq!(check.status, RedirectStatus::Skipped);
        assert!(fetcher.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_redirect_outcomes() {
        let target = Url::parse("https://a.test/form").unwrap();

        let ok = CannedFetcher::new().with("http://a.test/form", FetchResponse::new(200, "https://a.test/form"));
        assert_eq!(check_https_redirect(&ok, &target).await.status, RedirectStatus::Passed);

        let stay = CannedFetcher::new().with("http://a.test/form", FetchResponse::new(200, "http://a.test/form"));
        assert_eq!(check_https_redirect(&stay, &target).await.status, RedirectStatus::Failed);

        let down = CannedFetcher::new();
        assert_eq!(check_https_redirect(&down, &target).await.status, RedirectStatus::Error);
    }
}
