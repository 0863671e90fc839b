//! Cross-site scripting category: dialog and reflection evidence

pub mod detect;

use crate::browser::{BrowserActor, BrowserSession};
use crate::config::target::TargetConfig;
use crate::core::error::ActorError;
use crate::injection::{Detector, InjectionProber, InjectionReport, InjectionStats};
use crate::payload::xss::XSS_PAYLOADS;
use crate::payload::Payload;
use crate::reporting::model::Finding;
use serde::Serialize;

/// Runs both detectors; each one that fires yields its own finding.
pub struct XssDetector;

impl Detector for XssDetector {
    fn label(&self) -> &'static str {
        "XSS"
    }

    fn inspect(
        &self,
        actor: &mut dyn BrowserActor,
        field: &str,
        payload: &Payload,
        url: &str,
    ) -> Result<Vec<Finding>, ActorError> {
        let mut findings = Vec::new();

        if let Some(text) = detect::alert_text(actor)? {
            tracing::error!(
                "POTENTIAL XSS VULNERABILITY DETECTED! Alert dialog appeared with text: {}",
                text
            );
            findings.push(Finding::xss(
                field,
                payload.text,
                "alert",
                format!("Alert dialog with text: {}", text),
                url,
            ));
        }

        let page = actor.page_source()?;
        if detect::reflected_unescaped(&page, payload.text) {
            tracing::error!(
                "POTENTIAL XSS VULNERABILITY DETECTED! Unescaped payload found in page source: {}",
                payload.text
            );
            findings.push(Finding::xss(
                field,
                payload.text,
                "unescaped",
                "Payload found unescaped in page source".to_string(),
                url,
            ));
        }

        Ok(findings)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct XssResults {
    #[serde(flatten)]
    pub stats: InjectionStats,
    pub xss_vulnerabilities: Vec<Finding>,
}

impl From<InjectionReport> for XssResults {
    fn from(report: InjectionReport) -> Self {
        Self {
            stats: report.stats,
            xss_vulnerabilities: report.findings,
        }
    }
}

pub fn run(target: &TargetConfig, session: &mut BrowserSession) -> anyhow::Result<XssResults> {
    let prober = InjectionProber::new(target, &target.xss, &XSS_PAYLOADS, XssDetector);
    Ok(prober.run(session)?.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::mock::MockActor;
    use crate::config::target::{FieldSpec, InjectionSettings, TimingSettings};
    use crate::core::interrupt::Interrupt;
    use url::Url;

    fn html_escape(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#x27;")
    }

    fn target() -> TargetConfig {
        let mut cfg = TargetConfig::new(Url::parse("http://example.test").unwrap())
            .with_field("q", FieldSpec::css("#q"))
            .with_submit(FieldSpec::css("#go"));
        cfg.timing = TimingSettings::immediate();
        // every payload in these categories contains a quote or angle bracket
        cfg.xss = InjectionSettings {
            payload_categories: Some(vec!["attribute".to_string(), "evasion".to_string()]),
            max_attempts_per_field: 0,
            test_all_fields: true,
        };
        cfg
    }

    fn run_with(actor: MockActor) -> XssResults {
        let cfg = target();
        let mut s = BrowserSession::from_actor(Box::new(actor), Interrupt::new(), "xss");
        run(&cfg, &mut s).unwrap()
    }

    #[test]
    fn test_verbatim_echo_flags_every_trial() {
        let results = run_with(
            MockActor::new("")
                .with_element("#q")
                .with_submit("#go", |v| format!("<p>{}</p>", v.get("#q").cloned().unwrap_or_default())),
        );
        assert_eq!(results.stats.total_tests, 8);
        assert_eq!(results.xss_vulnerabilities.len(), 8);
        assert!(results
            .xss_vulnerabilities
            .iter()
            .all(|f| f.evidence == "type=unescaped"));
    }

    #[test]
    fn test_escaped_echo_flags_nothing() {
        let results = run_with(
            MockActor::new("")
                .with_element("#q")
                .with_submit("#go", |v| {
                    format!("<p>{}</p>", html_escape(v.get("#q").map(String::as_str).unwrap_or("")))
                }),
        );
        assert_eq!(results.stats.total_tests, 8);
        assert!(results.xss_vulnerabilities.is_empty());
    }

    #[test]
    fn test_dialog_is_conclusive() {
        let results = run_with(
            MockActor::new("")
                .with_element("#q")
                .with_submit("#go", |_| "<p>saved</p>".to_string())
                .with_dialog(|_| Some("1".to_string())),
        );
        assert_eq!(results.xss_vulnerabilities.len(), 8);
        assert!(results.xss_vulnerabilities.iter().all(|f| f.evidence == "type=alert"));
        assert_eq!(results.xss_vulnerabilities[0].detail, "Alert dialog with text: 1");
    }
}
