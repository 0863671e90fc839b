//! Security header analysis over plain HTTP

pub mod catalog;
pub mod evaluate;
pub mod redirect;

use crate::config::target::TargetConfig;
use crate::http::{FetchResponse, HttpFetcher};
use crate::reporting::model::{Finding, Severity, Timestamps};
use crate::reporting::reporter::Reporter;
use anyhow::Context as _;
use evaluate::{HeaderAnalysis, HeaderStatus};
use redirect::RedirectCheck;
use serde::Serialize;
use std::time::Duration;
use url::Url;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl SecurityRating {
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => SecurityRating::Excellent,
            75..=89 => SecurityRating::Good,
            50..=74 => SecurityRating::Fair,
            _ => SecurityRating::Poor,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadersResults {
    pub target_url: String,
    pub test_type: &'static str,
    pub status_code: u16,
    pub headers_tested: usize,
    pub missing_headers: usize,
    pub weak_headers: usize,
    pub header_results: Vec<HeaderAnalysis>,
    pub https_redirect: RedirectCheck,
    pub security_score: u32,
    pub security_rating: SecurityRating,
    pub vulnerabilities: Vec<Finding>,
    pub vulnerable: bool,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Weighted share of credit earned, truncated to an integer percentage.
/// A passing redirect adds two points on both sides.
pub fn security_score(analyses: &[HeaderAnalysis], redirect: &RedirectCheck) -> u32 {
    let mut total: u32 = 0;
    let mut earned: u32 = 0;
    for a in analyses {
        let w = a.severity.weight();
        total += w;
        if a.status.earns_credit() {
            earned += w;
        }
    }
    if redirect.passed() {
        total += 2;
        earned += 2;
    }
    if total == 0 {
        return 0;
    }
    earned * 100 / total
}

/// Turns one response plus the redirect check into the category result.
pub fn analyze_response(
    response: &FetchResponse,
    https_redirect: RedirectCheck,
    url: &str,
    started: chrono::DateTime<chrono::Utc>,
) -> HeadersResults {
    let header_results = evaluate::evaluate_headers(|name| response.header(name));
    let mut reporter = Reporter::new();

    for h in &header_results {
        if h.severity != Severity::High {
            continue;
        }
        match h.status {
            HeaderStatus::Missing => reporter.add(Finding::missing_header(
                &h.name,
                &h.description,
                &h.info,
                &h.recommendation,
                url,
            )),
            s if s.is_deficient() => reporter.add(Finding::weak_header(
                &h.name,
                &h.description,
                h.value.as_deref().unwrap_or_default(),
                &h.recommendation,
                url,
            )),
            _ => {}
        }
    }

    if https_redirect.status == redirect::RedirectStatus::Failed {
        let final_url = https_redirect.final_url.as_deref().unwrap_or_default();
        reporter.add(Finding::http_not_redirected(final_url, url));
    }

    let security_score = security_score(&header_results, &https_redirect);
    let missing_headers = header_results
        .iter()
        .filter(|h| h.status == HeaderStatus::Missing)
        .count();
    let weak_headers = header_results.iter().filter(|h| h.status.is_deficient()).count();
    let vulnerabilities = reporter.into_findings();

    HeadersResults {
        target_url: url.to_string(),
        test_type: "security_headers",
        status_code: response.status,
        headers_tested: header_results.len(),
        missing_headers,
        weak_headers,
        header_results,
        https_redirect,
        security_score,
        security_rating: SecurityRating::from_score(security_score),
        vulnerable: !vulnerabilities.is_empty(),
        vulnerabilities,
        timestamps: Timestamps::since(started),
    }
}

pub async fn run(target: &TargetConfig, fetcher: &dyn HttpFetcher) -> anyhow::Result<HeadersResults> {
    analyze_url(&target.url, fetcher).await
}

/// Fetches `url` once following redirects, then probes the plain-HTTP
/// variant. An unreachable target or an error status fails the category.
pub async fn analyze_url(url: &Url, fetcher: &dyn HttpFetcher) -> anyhow::Result<HeadersResults> {
    let started = chrono::Utc::now();
    tracing::info!("[HEADERS] Analyzing security headers for {}", url);

    let response = fetcher
        .get(url.as_str(), FETCH_TIMEOUT, true)
        .await
        .with_context(|| format!("failed to fetch {}", url))?;
    if response.is_error_status() {
        anyhow::bail!("{} answered with HTTP {}", url, response.status);
    }

    let https_redirect = redirect::check_https_redirect(fetcher, url).await;
    let results = analyze_response(&response, https_redirect, url.as_str(), started);

    tracing::info!(
        "[HEADERS] Completed: score {}/100 ({:?}), {} missing, {} weak",
        results.security_score,
        results.security_rating,
        results.missing_headers,
        results.weak_headers
    );
    Ok(results)
}
