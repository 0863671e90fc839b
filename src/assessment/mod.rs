//! Comprehensive assessment: every selected category against one target

pub mod result;
pub mod score;

use crate::browser::{BrowserLauncher, BrowserSession};
use crate::config::target::TargetConfig;
use crate::core::capability::Category;
use crate::core::interrupt::Interrupt;
use crate::http::HttpFetcher;
use anyhow::Context as _;
use result::{CategoryOutcome, CategoryResult, ComprehensiveResult};
use std::sync::Arc;

pub struct Aggregator {
    target: Arc<TargetConfig>,
    launcher: Arc<dyn BrowserLauncher>,
    fetcher: Arc<dyn HttpFetcher>,
    interrupt: Interrupt,
}

impl Aggregator {
    pub fn new(
        target: Arc<TargetConfig>,
        launcher: Arc<dyn BrowserLauncher>,
        fetcher: Arc<dyn HttpFetcher>,
        interrupt: Interrupt,
    ) -> Self {
        Self {
            target,
            launcher,
            fetcher,
            interrupt,
        }
    }

    /// Runs `categories` one after another. A failing category is
    /// recorded in its slot and the rest still run; after an interrupt
    /// the remaining ones are recorded as interrupted.
    pub async fn run(&self, categories: &[Category]) -> ComprehensiveResult {
        let started = chrono::Utc::now();
        let mut outcomes = Vec::with_capacity(categories.len());

        tracing::info!(
            "Starting comprehensive security testing on URL: {}",
            self.target.url
        );

        for &category in categories {
            if outcomes.iter().any(|(c, _)| *c == category) {
                continue;
            }
            if self.interrupt.is_raised() {
                tracing::warn!("[{}] Skipped: run was interrupted", category);
                outcomes.push((category, CategoryOutcome::errored("interrupted")));
                continue;
            }

            tracing::info!("=== Starting {} Testing ===", category.title());
            let clock = std::time::Instant::now();
            let outcome = match self.run_category(category).await {
                Ok(result) => {
                    tracing::info!(
                        "{} Testing completed in {:.2} seconds ({} findings)",
                        category.title(),
                        clock.elapsed().as_secs_f64(),
                        result.findings().len()
                    );
                    CategoryOutcome::Completed(result)
                }
                Err(e) => {
                    tracing::error!("Error during {} Testing: {:#}", category.title(), e);
                    CategoryOutcome::errored(format!("{:#}", e))
                }
            };
            outcomes.push((category, outcome));
        }

        let result = ComprehensiveResult::assemble(self.target.url.as_str(), outcomes, started);
        tracing::info!(
            "Comprehensive testing finished: {} issues, overall score {}/100",
            result.total_issues,
            result.overall_score
        );
        result
    }

    pub async fn run_category(&self, category: Category) -> anyhow::Result<CategoryResult> {
        if category == Category::Headers {
            return crate::headers::run(&self.target, self.fetcher.as_ref())
                .await
                .map(CategoryResult::Headers);
        }

        let target = self.target.clone();
        let launcher = self.launcher.clone();
        let interrupt = self.interrupt.clone();

        tokio::task::spawn_blocking(move || run_browser_category(category, &target, launcher.as_ref(), interrupt))
            .await
            .with_context(|| format!("{} task did not complete", category))?
    }
}

/// One browser session per category, released when this returns.
fn run_browser_category(
    category: Category,
    target: &TargetConfig,
    launcher: &dyn BrowserLauncher,
    interrupt: Interrupt,
) -> anyhow::Result<CategoryResult> {
    let mut session = BrowserSession::acquire(launcher, interrupt, category.as_str())
        .context("failed to start the browser")?;

    match category {
        Category::SqlInject => crate::sqli::run(target, &mut session).map(CategoryResult::Sql),
        Category::Xss => crate::xss::run(target, &mut session).map(CategoryResult::Xss),
        Category::Csrf => crate::csrf::run(target, &mut session).map(CategoryResult::Csrf),
        Category::Headers => anyhow::bail!("headers category does not use a browser"),
    }
}
