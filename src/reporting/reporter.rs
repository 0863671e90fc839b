use crate::reporting::model::{Finding, Severity};
use std::collections::BTreeMap;

/// Append-only collector the probers push findings into.
#[derive(Debug, Default)]
pub struct Reporter {
    findings: Vec<Finding>,
}

impl Reporter {
    pub fn new() -> Self {
        Self {
            findings: Vec::new(),
        }
    }

    pub fn add(&mut self, finding: Finding) {
        tracing::warn!(
            "[{}] {} finding on '{}': {}",
            finding.kind,
            finding.severity,
            finding.subject,
            finding.evidence
        );
        self.findings.push(finding);
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}

/// Tally findings per severity bucket; every bucket is present.
pub fn severity_counts(findings: &[Finding]) -> BTreeMap<Severity, usize> {
    let mut counts: BTreeMap<Severity, usize> = Severity::ALL.iter().map(|s| (*s, 0)).collect();
    for f in findings {
        *counts.entry(f.severity).or_insert(0) += 1;
    }
    counts
}
