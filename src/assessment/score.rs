use crate::reporting::model::{Finding, Severity};
use std::collections::BTreeMap;

/// Severity a finding is scored under. Injection findings always count
/// as critical.
pub fn bucket(finding: &Finding) -> Severity {
    if finding.kind.is_injection() {
        Severity::Critical
    } else {
        finding.severity
    }
}

pub fn deduction(severity: Severity) -> i64 {
    match severity {
        Severity::Critical => 15,
        Severity::High => 10,
        Severity::Medium => 5,
        Severity::Low => 1,
    }
}

/// 100 minus the per-bucket deductions, clamped to 0..=100. No findings
/// scores 100.
pub fn overall_score(findings: &[Finding]) -> u32 {
    let lost: i64 = findings.iter().map(|f| deduction(bucket(f))).sum();
    (100 - lost).clamp(0, 100) as u32
}

/// Bucket tallies; every bucket is present.
pub fn bucket_counts(findings: &[Finding]) -> BTreeMap<Severity, usize> {
    let mut counts: BTreeMap<Severity, usize> = Severity::ALL.iter().map(|s| (*s, 0)).collect();
    for f in findings {
        *counts.entry(bucket(f)).or_insert(0) += 1;
    }
    counts
}
