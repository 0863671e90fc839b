//! Self-contained HTML rendering of a comprehensive result

use crate::assessment::result::{CategoryOutcome, CategoryResult, ComprehensiveResult};
use crate::reporting::model::{Finding, Severity};

pub fn render(result: &ComprehensiveResult, target: &str) -> String {
    let mut html = String::with_capacity(16384);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
    html.push_str(&format!(
        "<title>Security Report - {}</title>\n<style>\n{}\n</style>\n</head>\n<body>\n",
        escape_html(target),
        CSS
    ));

    html.push_str("<header>\n<h1>Security Test Report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Target: <strong>{}</strong> | Scan date: {}</p>\n</header>\n",
        escape_html(target),
        escape_html(&result.timestamps.finished_at.to_rfc3339())
    ));

    // Summary
    html.push_str("<section class=\"summary\">\n<h2>Summary</h2>\n");
    html.push_str(&format!(
        "<p class=\"score\">Overall security score: <strong>{}/100</strong> ({} issues)</p>\n",
        result.overall_score, result.total_issues
    ));
    html.push_str("<div class=\"stats\">\n");
    for sev in Severity::ALL {
        html.push_str(&format!(
            "<div class=\"stat {}\"><span class=\"count\">{}</span><span class=\"label\">{}</span></div>\n",
            sev.as_str(),
            result.severity_counts.get(&sev).copied().unwrap_or(0),
            sev.as_str()
        ));
    }
    html.push_str("</div>\n</section>\n");

    if !result.errors.is_empty() {
        html.push_str("<section class=\"errors\">\n<h2>Errors</h2>\n<ul>\n");
        for (category, error) in &result.errors {
            html.push_str(&format!(
                "<li><strong>{}</strong>: {}</li>\n",
                escape_html(category),
                escape_html(error)
            ));
        }
        html.push_str("</ul>\n</section>\n");
    }

    for category in &result.tests {
        html.push_str(&format!("<section class=\"category\">\n<h2>{}</h2>\n", category.title()));
        match result.outcome(*category) {
            Some(CategoryOutcome::Completed(r)) => {
                html.push_str(&format!("<p class=\"meta\">{}</p>\n", escape_html(&category_summary(r))));
                push_findings(&mut html, r.findings());
            }
            Some(CategoryOutcome::Errored { error }) => {
                html.push_str(&format!("<p class=\"error\">Not completed: {}</p>\n", escape_html(error)));
            }
            None => html.push_str("<p>Not run.</p>\n"),
        }
        html.push_str("</section>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn category_summary(result: &CategoryResult) -> String {
    match result {
        CategoryResult::Sql(r) => format!(
            "{} tests on {} fields, {} failed trials",
            r.stats.total_tests,
            r.stats.fields_tested.len(),
            r.stats.failed_trials
        ),
        CategoryResult::Xss(r) => format!(
            "{} tests on {} fields, {} failed trials",
            r.stats.total_tests,
            r.stats.fields_tested.len(),
            r.stats.failed_trials
        ),
        CategoryResult::Csrf(r) => format!(
            "{} forms found, {} tested, referrer policy '{}'",
            r.forms_found, r.forms_tested, r.referrer_policy
        ),
        CategoryResult::Headers(r) => format!(
            "Security score: {}/100 ({:?}), {} missing, {} weak",
            r.security_score, r.security_rating, r.missing_headers, r.weak_headers
        ),
    }
}

fn push_findings(html: &mut String, findings: &[Finding]) {
    if findings.is_empty() {
        html.push_str("<p class=\"clean\">No issues found.</p>\n");
        return;
    }

    html.push_str("<table>\n<thead><tr><th>Severity</th><th>Type</th><th>Subject</th><th>Evidence</th><th>Details</th><th>Recommendation</th></tr></thead>\n<tbody>\n");
    for f in findings {
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td><code>{}</code></td><td>{}</td><td>{}</td></tr>\n",
            f.severity.as_str(),
            f.severity.as_str(),
            f.kind.as_str(),
            escape_html(&f.subject),
            escape_html(f.payload.as_deref().unwrap_or(&f.evidence)),
            escape_html(&f.detail),
            escape_html(f.recommendation.as_deref().unwrap_or("-"))
        ));
    }
    html.push_str("</tbody>\n</table>\n");
}

pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const CSS: &str = r#"
body { font-family: Arial, sans-serif; margin: 0 auto; max-width: 1100px; padding: 20px; color: #222; }
header { border-bottom: 2px solid #444; margin-bottom: 20px; }
.meta { color: #555; }
.stats { display: flex; gap: 12px; }
.stat { border-radius: 6px; padding: 10px 16px; color: #fff; text-align: center; }
.stat .count { display: block; font-size: 1.6em; font-weight: bold; }
.critical { background: #8b0000; }
.high { background: #d9534f; }
.medium { background: #f0ad4e; }
.low { background: #5bc0de; }
tr.critical, tr.high, tr.medium, tr.low { background: none; color: inherit; }
table { border-collapse: collapse; width: 100%; margin-top: 10px; }
th, td { border: 1px solid #ccc; padding: 6px 8px; text-align: left; vertical-align: top; }
code { word-break: break-all; }
.error { color: #d9534f; }
.clean { color: #2e7d32; }
"#;
