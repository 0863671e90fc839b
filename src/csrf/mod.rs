//! CSRF posture of the forms on one page

pub mod forms;
pub mod protection;

use crate::browser::{BrowserSession, CookieInfo};
use crate::config::target::{CsrfSettings, TargetConfig};
use crate::injection::trial::pause;
use crate::reporting::model::{Finding, Severity, Timestamps};
use crate::reporting::reporter::Reporter;
use anyhow::Context as _;
use forms::FormDetails;
use protection::{FormProtection, ProtectionLevel};
use serde::Serialize;

const REFERRER_POLICY_SCRIPT: &str = "return document.referrerPolicy || '';";

#[derive(Debug, Clone, Serialize)]
pub struct FormResult {
    pub form_id: String,
    pub form_name: String,
    pub method: String,
    pub action: String,
    pub vulnerable: bool,
    pub severity: Option<Severity>,
    pub details: String,
    pub protection: FormProtection,
}

#[derive(Debug, Clone, Serialize)]
pub struct CsrfResults {
    pub forms_found: usize,
    pub forms_tested: usize,
    pub referrer_policy: String,
    pub forms: Vec<FormResult>,
    pub vulnerabilities: Vec<Finding>,
    pub vulnerable: bool,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Scores every non-GET form against the page's cookie jar and referrer
/// policy. GET forms are neither tested nor flagged.
pub fn analyze(
    forms: &[FormDetails],
    cookies: &[CookieInfo],
    referrer_policy: &str,
    url: &str,
    started: chrono::DateTime<chrono::Utc>,
) -> CsrfResults {
    let mut reporter = Reporter::new();
    let mut results = Vec::new();

    for (idx, form) in forms.iter().enumerate() {
        let label = form.label(idx);
        if form.is_get() {
            tracing::info!("[CSRF] Skipping GET form ({})", label);
            continue;
        }

        tracing::info!("[CSRF] Testing form ({}) for CSRF protection", label);
        let protection = FormProtection::assess(form.has_csrf_token(), cookies, referrer_policy);
        let severity = protection.level.severity();
        let details = protection.level.details();

        match severity {
            Some(sev) => {
                reporter.add(Finding::csrf(&label, sev, protection.score, details, url));
            }
            None => tracing::info!("[CSRF] ✓ Form ({}) is protected (score {})", label, protection.score),
        }

        results.push(FormResult {
            form_id: form.id.clone(),
            form_name: form.name.clone(),
            method: form.method.clone(),
            action: form.action.clone(),
            vulnerable: protection.level != ProtectionLevel::Strong,
            severity,
            details: details.to_string(),
            protection,
        });
    }

    let vulnerabilities = reporter.into_findings();
    CsrfResults {
        forms_found: forms.len(),
        forms_tested: results.len(),
        referrer_policy: referrer_policy.to_string(),
        forms: results,
        vulnerable: !vulnerabilities.is_empty(),
        vulnerabilities,
        timestamps: Timestamps::since(started),
    }
}

pub fn run(target: &TargetConfig, session: &mut BrowserSession) -> anyhow::Result<CsrfResults> {
    run_with(target, &target.csrf, session)
}

fn run_with(
    target: &TargetConfig,
    settings: &CsrfSettings,
    session: &mut BrowserSession,
) -> anyhow::Result<CsrfResults> {
    let started = chrono::Utc::now();
    let url = target.url.as_str();

    tracing::info!("[CSRF] Navigating to {}", url);
    session
        .navigate(url)
        .with_context(|| format!("failed to load {}", url))?;
    pause(target.timing.page_settle());

    let html = session.page_source().context("failed to read page source")?;
    let forms = forms::extract_forms(&html, &settings.token_markers);
    if forms.is_empty() {
        tracing::warn!("[CSRF] No forms found on the page");
    }

    let cookies = session.cookies().context("failed to read cookies")?;
    let referrer_policy = match session.execute_script(REFERRER_POLICY_SCRIPT) {
        Ok(serde_json::Value::String(p)) if !p.is_empty() => p,
        Ok(_) => forms::meta_referrer_policy(&html).unwrap_or_default(),
        Err(e) => {
            tracing::debug!("[CSRF] Referrer policy script failed: {}", e);
            forms::meta_referrer_policy(&html).unwrap_or_default()
        }
    };

    let results = analyze(&forms, &cookies, &referrer_policy, url, started);
    if results.vulnerable {
        tracing::warn!(
            "[CSRF] Testing completed. Found {} potential vulnerabilities.",
            results.vulnerabilities.len()
        );
    } else {
        tracing::info!("[CSRF] Testing completed. No vulnerabilities were detected.");
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::mock::MockActor;
    use crate::browser::SameSite;
    use crate::config::target::TimingSettings;
    use crate::core::interrupt::Interrupt;
    use crate::reporting::model::FindingKind;
    use url::Url;

    const PAGE: &str = r#"
        <form id="search" method="get"><input name="q"></form>
        <form id="comment" method="post"><input name="body"></form>
        <form id="login" method="post">
            <input type="hidden" name="csrf_token" value="t">
            <input name="user">
        </form>
    "#;

    fn target() -> TargetConfig {
        let mut cfg = TargetConfig::new(Url::parse("http://example.test").unwrap());
        cfg.timing = TimingSettings::immediate();
        cfg
    }

    fn run_page(actor: MockActor) -> anyhow::Result<CsrfResults> {
        let mut s = BrowserSession::from_actor(Box::new(actor), Interrupt::new(), "csrf");
        run(&target(), &mut s)
    }

    #[test]
    fn test_mixed_forms() {
        let cookies = vec![CookieInfo {
            name: "sid".into(),
            value: "1".into(),
            secure: true,
            http_only: true,
            same_site: Some(SameSite::Strict),
        }];
        let results = run_page(MockActor::new(PAGE).with_cookies(cookies)).unwrap();

        assert_eq!(results.forms_found, 3);
        assert_eq!(results.forms_tested, 2);
        // cookie hardening alone scores 4, strong for both forms
        assert!(!results.vulnerable);
        assert_eq!(results.forms[1].protection.score, 7);
    }

    #[test]
    fn test_unprotected_post_form_is_high() {
        let results = run_page(MockActor::new(PAGE)).unwrap();

        assert_eq!(results.forms_tested, 2);
        assert_eq!(results.vulnerabilities.len(), 2);
        let f = &results.vulnerabilities[0];
        assert_eq!(f.kind, FindingKind::Csrf);
        assert_eq!(f.severity, Severity::High);
        assert_eq!(f.subject, "comment");
        // a token alone scores 3: medium
        assert_eq!(results.forms[1].protection.level, ProtectionLevel::Medium);
        assert_eq!(results.vulnerabilities[1].severity, Severity::Medium);
    }

    #[test]
    fn test_no_forms_is_empty_success() {
        let results = run_page(MockActor::new("<p>hello</p>")).unwrap();
        assert_eq!(results.forms_found, 0);
        assert_eq!(results.forms_tested, 0);
        assert!(results.vulnerabilities.is_empty());
    }

    #[test]
    fn test_referrer_from_script_then_meta() {
        let results = run_page(MockActor::new(PAGE).with_referrer_policy("same-origin")).unwrap();
        assert_eq!(results.referrer_policy, "same-origin");

        let page = format!(r#"<meta name="referrer" content="strict-origin">{}"#, PAGE);
        let results = run_page(MockActor::new(&page)).unwrap();
        assert_eq!(results.referrer_policy, "strict-origin");
    }

    #[test]
    fn test_navigation_failure_is_an_error() {
        assert!(run_page(MockActor::new(PAGE).failing_navigation()).is_err());
    }
}
