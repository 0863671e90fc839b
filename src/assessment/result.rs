use crate::assessment::score;
use crate::core::capability::Category;
use crate::csrf::CsrfResults;
use crate::headers::HeadersResults;
use crate::reporting::model::{Finding, Severity, Timestamps};
use crate::sqli::SqlInjectionResults;
use crate::xss::XssResults;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CategoryResult {
    Sql(SqlInjectionResults),
    Xss(XssResults),
    Csrf(CsrfResults),
    Headers(HeadersResults),
}

impl CategoryResult {
    pub fn category(&self) -> Category {
        match self {
            CategoryResult::Sql(_) => Category::SqlInject,
            CategoryResult::Xss(_) => Category::Xss,
            CategoryResult::Csrf(_) => Category::Csrf,
            CategoryResult::Headers(_) => Category::Headers,
        }
    }

    pub fn findings(&self) -> &[Finding] {
        match self {
            CategoryResult::Sql(r) => &r.sql_vulnerabilities,
            CategoryResult::Xss(r) => &r.xss_vulnerabilities,
            CategoryResult::Csrf(r) => &r.vulnerabilities,
            CategoryResult::Headers(r) => &r.vulnerabilities,
        }
    }
}

/// One category slot: the finished result, or `{"error": ...}`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CategoryOutcome {
    Completed(CategoryResult),
    Errored { error: String },
}

impl CategoryOutcome {
    pub fn errored(message: impl Into<String>) -> Self {
        CategoryOutcome::Errored {
            error: message.into(),
        }
    }

    /// Empty for an errored slot.
    pub fn findings(&self) -> &[Finding] {
        match self {
            CategoryOutcome::Completed(r) => r.findings(),
            CategoryOutcome::Errored { .. } => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            CategoryOutcome::Completed(_) => None,
            CategoryOutcome::Errored { error } => Some(error),
        }
    }

    pub fn result(&self) -> Option<&CategoryResult> {
        match self {
            CategoryOutcome::Completed(r) => Some(r),
            CategoryOutcome::Errored { .. } => None,
        }
    }
}

/// Aggregate over one comprehensive run.
#[derive(Debug, Clone, Serialize)]
pub struct ComprehensiveResult {
    pub target_url: String,
    pub tests: Vec<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_injection_results: Option<CategoryOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xss_results: Option<CategoryOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csrf_results: Option<CategoryOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers_results: Option<CategoryOutcome>,
    /// Every finding of every completed category, in run order.
    pub findings: Vec<Finding>,
    pub severity_counts: BTreeMap<Severity, usize>,
    pub total_issues: usize,
    pub overall_score: u32,
    /// Category name to error message.
    pub errors: BTreeMap<String, String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl ComprehensiveResult {
    /// Builds the aggregate from the category slots. Errored slots
    /// contribute no findings; absent categories contribute nothing.
    pub fn assemble(
        target_url: &str,
        outcomes: Vec<(Category, CategoryOutcome)>,
        started: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        let mut result = Self {
            target_url: target_url.to_string(),
            tests: outcomes.iter().map(|(c, _)| *c).collect(),
            sql_injection_results: None,
            xss_results: None,
            csrf_results: None,
            headers_results: None,
            findings: Vec::new(),
            severity_counts: BTreeMap::new(),
            total_issues: 0,
            overall_score: 100,
            errors: BTreeMap::new(),
            timestamps: Timestamps::since(started),
        };

        for (category, outcome) in outcomes {
            result.findings.extend(outcome.findings().iter().cloned());
            if let Some(e) = outcome.error() {
                result.errors.insert(category.as_str().to_string(), e.to_string());
            }
            *result.slot_mut(category) = Some(outcome);
        }

        result.severity_counts = score::bucket_counts(&result.findings);
        result.total_issues = result.findings.len();
        result.overall_score = score::overall_score(&result.findings);
        result
    }

    fn slot_mut(&mut self, category: Category) -> &mut Option<CategoryOutcome> {
        match category {
            Category::SqlInject => &mut self.sql_injection_results,
            Category::Xss => &mut self.xss_results,
            Category::Csrf => &mut self.csrf_results,
            Category::Headers => &mut self.headers_results,
        }
    }

    pub fn outcome(&self, category: Category) -> Option<&CategoryOutcome> {
        match category {
            Category::SqlInject => self.sql_injection_results.as_ref(),
            Category::Xss => self.xss_results.as_ref(),
            Category::Csrf => self.csrf_results.as_ref(),
            Category::Headers => self.headers_results.as_ref(),
        }
    }

    /// Empty when the category was not run or errored.
    pub fn findings_for(&self, category: Category) -> &[Finding] {
        self.outcome(category).map(CategoryOutcome::findings).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_errored_is_vacuous_full_score() {
        let outcomes = Category::ALL
            .iter()
            .map(|c| (*c, CategoryOutcome::errored("connection refused")))
            .collect();
        let result = ComprehensiveResult::assemble("http://a.test/", outcomes, chrono::Utc::now());

        assert_eq!(result.overall_score, 100);
        assert_eq!(result.total_issues, 0);
        assert_eq!(result.errors.len(), 4);
        assert!(result.findings_for(Category::Xss).is_empty());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["csrf_results"]["error"], "connection refused");
        assert_eq!(json["severity_counts"]["critical"], 0);
    }

    #[test]
    fn test_unselected_categories_are_absent() {
        let outcomes = vec![(Category::Headers, CategoryOutcome::errored("boom"))];
        let result = ComprehensiveResult::assemble("http://a.test/", outcomes, chrono::Utc::now());

        assert!(result.outcome(Category::SqlInject).is_none());
        assert!(result.findings_for(Category::SqlInject).is_empty());
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("sql_injection_results").is_none());
        assert_eq!(json["tests"], serde_json::json!(["headers"]));
    }
}
