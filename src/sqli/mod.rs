//! SQL injection category: error-signature evidence over the shared prober

pub mod signatures;

use crate::browser::{BrowserActor, BrowserSession};
use crate::config::target::TargetConfig;
use crate::core::error::ActorError;
use crate::injection::{Detector, InjectionProber, InjectionReport, InjectionStats};
use crate::payload::sql::SQL_PAYLOADS;
use crate::payload::Payload;
use crate::reporting::model::Finding;
use serde::Serialize;

/// Flags a trial when a database error signature shows up in the page.
pub struct ErrorSignatureDetector;

impl Detector for ErrorSignatureDetector {
    fn label(&self) -> &'static str {
        "SQL"
    }

    fn inspect(
        &self,
        actor: &mut dyn BrowserActor,
        field: &str,
        payload: &Payload,
        url: &str,
    ) -> Result<Vec<Finding>, ActorError> {
        let page = actor.page_source()?;
        Ok(match signatures::first_match(&page) {
            Some(pattern) => {
                tracing::error!(
                    "POTENTIAL SQL INJECTION VULNERABILITY DETECTED! Field: {}, Payload: {}",
                    field,
                    payload.text
                );
                vec![Finding::sql_injection(field, payload.text, pattern, url)]
            }
            None => Vec::new(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SqlInjectionResults {
    #[serde(flatten)]
    pub stats: InjectionStats,
    pub sql_vulnerabilities: Vec<Finding>,
}

impl From<InjectionReport> for SqlInjectionResults {
    fn from(report: InjectionReport) -> Self {
        Self {
            stats: report.stats,
            sql_vulnerabilities: report.findings,
        }
    }
}

pub fn run(target: &TargetConfig, session: &mut BrowserSession) -> anyhow::Result<SqlInjectionResults> {
    let prober = InjectionProber::new(
        target,
        &target.sql_injection,
        &SQL_PAYLOADS,
        ErrorSignatureDetector,
    );
    Ok(prober.run(session)?.into())
}
