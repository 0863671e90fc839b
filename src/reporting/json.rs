use crate::assessment::result::{CategoryOutcome, ComprehensiveResult};
use crate::core::capability::Category;
use crate::reporting::model::{Finding, Severity};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
pub struct Report<'a> {
    meta: Meta<'a>,
    summary: Summary,
    findings: Vec<CategoryFindings<'a>>,
    errors: &'a BTreeMap<String, String>,
    results: RawResults<'a>,
}

#[derive(Serialize)]
struct Meta<'a> {
    tool: &'static str,
    version: &'static str,
    target: &'a str,
    scan_date: String,
    report_type: &'static str,
    tests: &'a [Category],
    duration_secs: f64,
}

#[derive(Serialize)]
struct Summary {
    severity_counts: BTreeMap<Severity, usize>,
    total_issues: usize,
    overall_score: u32,
}

#[derive(Serialize)]
struct CategoryFindings<'a> {
    category: Category,
    title: &'static str,
    findings: &'a [Finding],
}

#[derive(Serialize)]
struct RawResults<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    sql_injection_results: Option<&'a CategoryOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    xss_results: Option<&'a CategoryOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    csrf_results: Option<&'a CategoryOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    headers_results: Option<&'a CategoryOutcome>,
}

pub fn build<'a>(result: &'a ComprehensiveResult, target: &'a str) -> Report<'a> {
    let findings = result
        .tests
        .iter()
        .map(|c| CategoryFindings {
            category: *c,
            title: c.title(),
            findings: result.findings_for(*c),
        })
        .collect();

    Report {
        meta: Meta {
            tool: "form-monkey",
            version: env!("CARGO_PKG_VERSION"),
            target,
            scan_date: result.timestamps.finished_at.to_rfc3339(),
            report_type: "comprehensive",
            tests: &result.tests,
            duration_secs: result.timestamps.duration_secs,
        },
        summary: Summary {
            severity_counts: result.severity_counts.clone(),
            total_issues: result.total_issues,
            overall_score: result.overall_score,
        },
        findings,
        errors: &result.errors,
        results: RawResults {
            sql_injection_results: result.sql_injection_results.as_ref(),
            xss_results: result.xss_results.as_ref(),
            csrf_results: result.csrf_results.as_ref(),
            headers_results: result.headers_results.as_ref(),
        },
    }
}

pub fn render(result: &ComprehensiveResult, target: &str) -> anyhow::Result<String> {
    let json = serde_json::to_string_pretty(&build(result, target))?;
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_layout() {
        let outcomes = vec![
            (Category::Csrf, CategoryOutcome::errored("browser crashed")),
            (Category::Headers, CategoryOutcome::errored("timeout")),
        ];
        let result = ComprehensiveResult::assemble("https://a.test/", outcomes, chrono::Utc::now());

        let value: serde_json::Value = serde_json::from_str(&render(&result, "https://a.test/").unwrap()).unwrap();
        assert_eq!(value["meta"]["target"], "https://a.test/");
        assert_eq!(value["summary"]["overall_score"], 100);
        assert_eq!(value["summary"]["severity_counts"]["high"], 0);
        assert_eq!(value["findings"][0]["category"], "csrf");
        assert_eq!(value["findings"][1]["findings"], serde_json::json!([]));
        assert_eq!(value["errors"]["headers"], "timeout");
        assert_eq!(value["results"]["csrf_results"]["error"], "browser crashed");
        assert!(value["results"].get("xss_results").is_none());
    }
}
