use crate::assessment::result::ComprehensiveResult;
use crate::config::target::ReportFormat;
use crate::reporting::{html, json};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const JSON_FILE: &str = "security_report.json";
pub const HTML_FILE: &str = "security_report.html";

/// What the writer produced. Failures are collected, never raised.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportOutcome {
    pub directory: Option<PathBuf>,
    pub files: Vec<PathBuf>,
    pub errors: Vec<String>,
}

impl ReportOutcome {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Writes the requested formats into `<report_dir>/report_<timestamp>/`.
pub fn write_reports(
    result: &ComprehensiveResult,
    target: &str,
    format: ReportFormat,
    report_dir: &Path,
) -> ReportOutcome {
    let mut outcome = ReportOutcome::default();
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let dir = report_dir.join(format!("report_{}", stamp));

    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::error!("Error creating report directory {}: {}", dir.display(), e);
        outcome.errors.push(format!("cannot create {}: {}", dir.display(), e));
        return outcome;
    }
    outcome.directory = Some(dir.clone());

    if format.wants_json() {
        let written = json::render(result, target).and_then(|body| write_file(&dir.join(JSON_FILE), &body));
        record(&mut outcome, written, "JSON");
    }
    if format.wants_html() {
        let body = html::render(result, target);
        record(&mut outcome, write_file(&dir.join(HTML_FILE), &body), "HTML");
    }
    outcome
}

fn write_file(path: &Path, body: &str) -> anyhow::Result<PathBuf> {
    std::fs::write(path, body)?;
    Ok(path.to_path_buf())
}

fn record(outcome: &mut ReportOutcome, written: anyhow::Result<PathBuf>, kind: &str) {
    match written {
        Ok(path) => {
            tracing::info!("{} report saved to {}", kind, path.display());
            outcome.files.push(path);
        }
        Err(e) => {
            tracing::error!("Error generating {} report: {}", kind, e);
            outcome.errors.push(format!("{} report: {}", kind, e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::result::CategoryOutcome;
    use crate::core::capability::Category;

    fn result() -> ComprehensiveResult {
        let outcomes = vec![(Category::Headers, CategoryOutcome::errored("refused"))];
        ComprehensiveResult::assemble("https://a.test/", outcomes, chrono::Utc::now())
    }

    #[test]
    fn test_writes_both_formats() {
        let tmp = tempfile::tempdir().unwrap();
        let outcome = write_reports(&result(), "https://a.test/", ReportFormat::Both, tmp.path());

        assert!(outcome.is_ok());
        assert_eq!(outcome.files.len(), 2);
        let dir = outcome.directory.unwrap();
        assert!(dir
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("report_")));
        let body = std::fs::read_to_string(dir.join(JSON_FILE)).unwrap();
        assert!(body.contains("\"overall_score\": 100"));
        assert!(dir.join(HTML_FILE).exists());
    }

    #[test]
    fn test_json_only() {
        let tmp = tempfile::tempdir().unwrap();
        let outcome = write_reports(&result(), "https://a.test/", ReportFormat::Json, tmp.path());
        assert_eq!(outcome.files.len(), 1);
        assert!(outcome.files[0].ends_with(JSON_FILE));
    }

    #[test]
    fn test_unwritable_directory_is_reported_not_raised() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let outcome = write_reports(&result(), "https://a.test/", ReportFormat::Html, &blocker);
        assert!(!outcome.is_ok());
        assert!(outcome.files.is_empty());
        assert!(outcome.directory.is_none());
    }
}
