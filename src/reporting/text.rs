use crate::reporting::model::{Finding, Severity};
use crate::reporting::reporter::severity_counts;
use unicode_width::UnicodeWidthStr;

// ==============================
// BOX CONFIGURATION
// ==============================

const BOX_WIDTH: usize = 70;
const INNER_WIDTH: usize = BOX_WIDTH - 2;

fn top_border() -> String {
    format!("╔{}╗", "═".repeat(INNER_WIDTH))
}

fn middle_border() -> String {
    format!("╠{}╣", "═".repeat(INNER_WIDTH))
}

fn bottom_border() -> String {
    format!("╚{}╝", "═".repeat(INNER_WIDTH))
}

/// Left-aligned, padded by display width so emoji keep the border straight.
fn box_line(content: &str) -> String {
    let padded = format!(" {} ", content);
    let padding = INNER_WIDTH.saturating_sub(UnicodeWidthStr::width(padded.as_str()));
    format!("║{}{}║", padded, " ".repeat(padding))
}

fn box_line_centered(content: &str) -> String {
    let padded = format!(" {} ", content);
    let width = UnicodeWidthStr::width(padded.as_str());
    if width >= INNER_WIDTH {
        return box_line(content);
    }
    let left = (INNER_WIDTH - width) / 2;
    let right = INNER_WIDTH - width - left;
    format!("║{}{}{}║", " ".repeat(left), padded, " ".repeat(right))
}

/// Summary box plus one block per finding. `score` is shown when the
/// mode computes one.
pub fn summary_lines(title: &str, findings: &[Finding], score: Option<u32>) -> Vec<String> {
    let mut lines = vec![top_border(), box_line_centered(title), middle_border()];

    if let Some(score) = score {
        lines.push(box_line(&format!("Security score: {}/100", score)));
    }

    if findings.is_empty() {
        lines.push(box_line("✅ No vulnerabilities detected"));
        lines.push(bottom_border());
        return lines;
    }

    lines.push(box_line(&format!("Total Findings: {}", findings.len())));
    for (sev, count) in severity_counts(findings).into_iter().rev() {
        if count > 0 {
            lines.push(box_line(&format!("{}: {}", sev.badge(), count)));
        }
    }
    lines.push(bottom_border());

    for (idx, f) in findings.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("FINDING #{}: {} [{}]", idx + 1, f.kind, f.severity));
        lines.push("─".repeat(BOX_WIDTH));
        lines.push(format!("   Subject:    {}", f.subject));
        if let Some(payload) = &f.payload {
            lines.push(format!("   Payload:    {}", payload));
        }
        lines.push(format!("   Evidence:   {}", f.evidence));
        lines.push(format!("   Details:    {}", f.detail));
        if let Some(rec) = &f.recommendation {
            lines.push(format!("   Fix:        {}", rec));
        }
    }

    if findings
        .iter()
        .any(|f| matches!(f.severity, Severity::Critical | Severity::High))
    {
        lines.push(String::new());
        lines.push("Address CRITICAL and HIGH severity findings first, then re-test.".to_string());
    }
    lines
}

pub fn render(title: &str, findings: &[Finding], score: Option<u32>) {
    println!();
    for line in summary_lines(title, findings, score) {
        println!("{}", line);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_lines_have_constant_width() {
        for line in [box_line("🔴 CRITICAL: 2"), box_line_centered("TITLE"), top_border()] {
            assert_eq!(UnicodeWidthStr::width(line.as_str()), BOX_WIDTH);
        }
    }

    #[test]
    fn test_clean_summary() {
        let lines = summary_lines("HEADERS", &[], Some(100));
        assert!(lines.iter().any(|l| l.contains("No vulnerabilities")));
        assert!(lines.iter().any(|l| l.contains("100/100")));
    }

    #[test]
    fn test_findings_listed_with_tallies() {
        let findings = vec![
            Finding::sql_injection("q", "' OR 1=1--", "mysql", "http://a.test/"),
            Finding::csrf("login", Severity::Medium, 3, "weak", "http://a.test/"),
        ];
        let lines = summary_lines("SCAN", &findings, None);
        assert!(lines.iter().any(|l| l.contains("CRITICAL: 1")));
        assert!(lines.iter().any(|l| l.contains("MEDIUM: 1")));
        assert!(lines.iter().any(|l| l.starts_with("FINDING #2: csrf [medium]")));
        assert!(lines.iter().any(|l| l.contains("' OR 1=1--")));
    }
}
