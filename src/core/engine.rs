//! Mode dispatch for one run

use crate::assessment::result::{CategoryResult, ComprehensiveResult};
use crate::assessment::Aggregator;
use crate::browser::chrome::ChromeLauncher;
use crate::browser::BrowserLauncher;
use crate::core::capability::{Category, Mode};
use crate::core::context::Context;
use crate::http::{HttpFetcher, ReqwestFetcher};
use crate::reporting::text;
use crate::reporting::writer::{self, ReportOutcome};
use crate::submit::{SubmitStats, Submitter};
use anyhow::Context as _;
use std::sync::Arc;

/// What a run produced, for the caller's exit status and tests.
#[derive(Debug)]
pub enum RunOutcome {
    Submitted(SubmitStats),
    Category(Box<CategoryResult>),
    Comprehensive {
        result: Box<ComprehensiveResult>,
        report: ReportOutcome,
    },
}

pub struct Engine {
    ctx: Context,
    launcher: Arc<dyn BrowserLauncher>,
    fetcher: Arc<dyn HttpFetcher>,
}

impl Engine {
    pub fn new(ctx: Context) -> anyhow::Result<Self> {
        let fetcher = ReqwestFetcher::new().context("failed to build HTTP client")?;
        Ok(Self::with_collaborators(
            ctx,
            Arc::new(ChromeLauncher::default()),
            Arc::new(fetcher),
        ))
    }

    pub fn with_collaborators(
        ctx: Context,
        launcher: Arc<dyn BrowserLauncher>,
        fetcher: Arc<dyn HttpFetcher>,
    ) -> Self {
        Self {
            ctx,
            launcher,
            fetcher,
        }
    }

    pub async fn run(&self) -> anyhow::Result<RunOutcome> {
        tracing::info!(
            "Starting FORM MONKEY in {:?} mode against {}",
            self.ctx.mode,
            self.ctx.target.url
        );

        match self.ctx.mode {
            Mode::Submit => self.run_submit().await,
            Mode::Comprehensive => self.run_comprehensive().await,
            focused => {
                // every other mode maps to exactly one category
                let category = focused
                    .category()
                    .ok_or_else(|| anyhow::anyhow!("mode {:?} has no security category", focused))?;
                self.run_single(category).await
            }
        }
    }

    // -------------------------------------------------
    // Submit mode
    // -------------------------------------------------
    async fn run_submit(&self) -> anyhow::Result<RunOutcome> {
        let target = self.ctx.target.clone();
        let launcher = self.launcher.clone();
        let interrupt = self.ctx.interrupt.clone();
        let rounds = self.ctx.submissions;

        let stats = tokio::task::spawn_blocking(move || {
            Submitter::new(&target, launcher.as_ref(), interrupt).run(rounds)
        })
        .await
        .context("submission task did not complete")?;

        if !self.ctx.quiet {
            println!(
                "\nSubmissions: {} attempted, {} succeeded, {} failed\n",
                stats.attempted, stats.succeeded, stats.failed
            );
        }
        Ok(RunOutcome::Submitted(stats))
    }

    // -------------------------------------------------
    // Focused security modes
    // -------------------------------------------------
    async fn run_single(&self, category: Category) -> anyhow::Result<RunOutcome> {
        let aggregator = Aggregator::new(
            self.ctx.target.clone(),
            self.launcher.clone(),
            self.fetcher.clone(),
            self.ctx.interrupt.clone(),
        );

        let result = aggregator
            .run_category(category)
            .await
            .with_context(|| format!("{} testing failed", category.title()))?;

        if !self.ctx.quiet {
            let score = match &result {
                CategoryResult::Headers(h) => Some(h.security_score),
                _ => None,
            };
            text::render(
                &format!("{} RESULTS", category.title().to_uppercase()),
                result.findings(),
                score,
            );
        }
        Ok(RunOutcome::Category(Box::new(result)))
    }

    // -------------------------------------------------
    // Comprehensive mode
    // -------------------------------------------------
    async fn run_comprehensive(&self) -> anyhow::Result<RunOutcome> {
        let target = Arc::new(self.ctx.target.for_comprehensive());
        let settings = target.comprehensive.clone();
        let aggregator = Aggregator::new(
            target.clone(),
            self.launcher.clone(),
            self.fetcher.clone(),
            self.ctx.interrupt.clone(),
        );

        let result = aggregator.run(&settings.tests).await;

        tracing::info!("=== Generating Security Report ===");
        let report = writer::write_reports(
            &result,
            target.url.as_str(),
            settings.report_format,
            &settings.report_dir,
        );
        for e in &report.errors {
            tracing::error!("Report error: {}", e);
        }

        if !self.ctx.quiet {
            text::render("COMPREHENSIVE SECURITY ASSESSMENT", &result.findings, Some(result.overall_score));
            for (category, error) in &result.errors {
                println!("⚠ {} not completed: {}", category, error);
            }
            for file in &report.files {
                println!("Report saved: {}", file.display());
            }
        }

        Ok(RunOutcome::Comprehensive {
            result: Box::new(result),
            report,
        })
    }
}
