//! Payload-driven form prober shared by the SQL and XSS categories
//!
//! Both categories walk the same loop: every fillable field, every
//! selected payload, one trial each. Only the payload catalog and the
//! evidence detector differ.

pub mod trial;

use crate::browser::{BrowserActor, BrowserSession};
use crate::config::target::{InjectionSettings, TargetConfig};
use crate::core::error::ActorError;
use crate::payload::{self, Catalog, Payload};
use crate::reporting::model::{Finding, Timestamps};
use crate::reporting::reporter::Reporter;
use anyhow::Context as _;
use serde::Serialize;
use trial::{pause, TrialRunner};

/// Inspects the page after a submission and reports what it proves.
pub trait Detector {
    fn label(&self) -> &'static str;

    fn inspect(
        &self,
        actor: &mut dyn BrowserActor,
        field: &str,
        payload: &Payload,
        url: &str,
    ) -> Result<Vec<Finding>, ActorError>;
}

/// Bookkeeping common to both injection categories.
#[derive(Debug, Clone, Serialize)]
pub struct InjectionStats {
    pub total_tests: usize,
    pub failed_trials: usize,
    pub fields_tested: Vec<String>,
    pub interrupted: bool,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

#[derive(Debug, Clone)]
pub struct InjectionReport {
    pub stats: InjectionStats,
    pub findings: Vec<Finding>,
}

pub struct InjectionProber<'a, D: Detector> {
    target: &'a TargetConfig,
    settings: &'a InjectionSettings,
    catalog: &'a Catalog,
    detector: D,
}

impl<'a, D: Detector> InjectionProber<'a, D> {
    pub fn new(
        target: &'a TargetConfig,
        settings: &'a InjectionSettings,
        catalog: &'a Catalog,
        detector: D,
    ) -> Self {
        Self {
            target,
            settings,
            catalog,
            detector,
        }
    }

    /// Runs every trial on `session`. Locator failures are counted and
    /// skipped; transport failures abort the category.
    pub fn run(&self, session: &mut BrowserSession) -> anyhow::Result<InjectionReport> {
        let label = self.detector.label();
        let started = chrono::Utc::now();
        let runner = TrialRunner::new(self.target);
        let mut rng = rand::rng();
        let mut reporter = Reporter::new();
        let mut total_tests = 0;
        let mut failed_trials = 0;
        let mut fields_tested = Vec::new();
        let mut interrupted = false;

        tracing::info!(
            "[{}] Starting injection tests against {} ({} payloads in catalog)",
            label,
            self.target.url,
            self.catalog.total()
        );

        'fields: for field in self.target.fillable_fields() {
            if field.spec.locators().is_empty() {
                tracing::warn!("[{}] No selector defined for field '{}', skipping", label, field.name);
                continue;
            }

            let payloads = payload::select(self.catalog, self.settings, &mut rng);
            tracing::info!(
                "[{}] Testing field '{}' with {} payloads",
                label,
                field.name,
                payloads.len()
            );
            fields_tested.push(field.name.clone());

            for p in &payloads {
                if session.interrupted() {
                    interrupted = true;
                    tracing::warn!("[{}] Interrupted, stopping before next trial", label);
                    break 'fields;
                }

                total_tests += 1;
                tracing::info!("[{}] Trial #{}: {} [{}]", label, total_tests, p.text, p.category);

                match runner.run(session.actor(), field, p, &self.detector) {
                    Ok(findings) => {
                        if findings.is_empty() {
                            tracing::debug!("[{}] ✗ No evidence for payload on '{}'", label, field.name);
                        }
                        for f in findings {
                            reporter.add(f);
                        }
                    }
                    Err(e) if e.is_recoverable() => {
                        failed_trials += 1;
                        tracing::warn!("[{}] Trial on '{}' skipped: {}", label, field.name, e);
                    }
                    Err(e) => {
                        return Err(e).with_context(|| {
                            format!("{} testing aborted on field '{}'", label, field.name)
                        });
                    }
                }

                pause(self.target.timing.trial_pause());
            }

            if self.settings.stop_on_first_hit() && !reporter.is_empty() {
                tracing::info!(
                    "[{}] Vulnerability found and test_all_fields is false, stopping further tests",
                    label
                );
                break;
            }
        }

        let findings = reporter.into_findings();
        tracing::info!(
            "[{}] Completed: {} tests, {} failed trials, {} findings",
            label,
            total_tests,
            failed_trials,
            findings.len()
        );

        Ok(InjectionReport {
            stats: InjectionStats {
                total_tests,
                failed_trials,
                fields_tested,
                interrupted,
                timestamps: Timestamps::since(started),
            },
            findings,
        })
    }
}
