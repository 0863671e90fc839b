use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of weakness a finding describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    SqlInjection,
    Xss,
    Csrf,
    MissingHeader,
    WeakHeader,
    HttpNotRedirected,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::SqlInjection => "sql_injection",
            FindingKind::Xss => "xss",
            FindingKind::Csrf => "csrf",
            FindingKind::MissingHeader => "missing_header",
            FindingKind::WeakHeader => "weak_header",
            FindingKind::HttpNotRedirected => "http_not_redirected",
        }
    }

    /// Injection findings always land in the critical bucket, whatever
    /// severity the detector attached.
    pub fn is_injection(&self) -> bool {
        matches!(self, FindingKind::SqlInjection | FindingKind::Xss)
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Catalog weight used by the header score (high=3, medium=2, low=1).
    pub fn weight(&self) -> u32 {
        match self {
            Severity::Critical | Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            Severity::Low => "🟢 LOW",
            Severity::Medium => "🟡 MEDIUM",
            Severity::High => "🟠 HIGH",
            Severity::Critical => "🔴 CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected issue. Created once per detection event and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub kind: FindingKind,
    pub severity: Severity,
    /// Field name, header name, or form identifier.
    pub subject: String,
    /// Matched payload/pattern or the measured attribute.
    pub evidence: String,
    pub detail: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl Finding {
    /// Error signature matched after submitting `payload` into `field`.
    pub fn sql_injection(field: &str, payload: &str, pattern: &str, url: &str) -> Self {
        Self {
            kind: FindingKind::SqlInjection,
            severity: Severity::Critical,
            subject: field.to_string(),
            evidence: format!("pattern '{}' matched after payload {}", pattern, payload),
            detail: format!(
                "Database error signature '{}' appeared in the response after submitting \
                 the payload into field '{}'",
                pattern, field
            ),
            url: url.to_string(),
            payload: Some(payload.to_string()),
            recommendation: Some(
                "Use parameterized queries and never concatenate form input into SQL".to_string(),
            ),
        }
    }

    /// `xss_type` is `alert` or `unescaped`.
    pub fn xss(field: &str, payload: &str, xss_type: &str, detail: String, url: &str) -> Self {
        Self {
            kind: FindingKind::Xss,
            severity: Severity::Critical,
            subject: field.to_string(),
            evidence: format!("type={}", xss_type),
            detail,
            url: url.to_string(),
            payload: Some(payload.to_string()),
            recommendation: Some(
                "Encode output for its HTML context and deploy a restrictive Content-Security-Policy"
                    .to_string(),
            ),
        }
    }

    pub fn csrf(form: &str, severity: Severity, score: u32, detail: &str, url: &str) -> Self {
        Self {
            kind: FindingKind::Csrf,
            severity,
            subject: form.to_string(),
            evidence: format!("protection score {}", score),
            detail: detail.to_string(),
            url: url.to_string(),
            payload: None,
            recommendation: Some(
                "Add a per-session anti-CSRF token and mark session cookies SameSite=Strict or Lax"
                    .to_string(),
            ),
        }
    }

    pub fn missing_header(header: &str, description: &str, info: &str, recommended: &str, url: &str) -> Self {
        Self {
            kind: FindingKind::MissingHeader,
            severity: Severity::High,
            subject: header.to_string(),
            evidence: "header absent".to_string(),
            detail: format!("Missing {} header: {}", description, info),
            url: url.to_string(),
            payload: None,
            recommendation: Some(format!("Add the header with value: {}", recommended)),
        }
    }

    pub fn weak_header(header: &str, description: &str, value: &str, recommended: &str, url: &str) -> Self {
        Self {
            kind: FindingKind::WeakHeader,
            severity: Severity::Medium,
            subject: header.to_string(),
            evidence: value.to_string(),
            detail: format!("Weak implementation of {} header: {}", description, value),
            url: url.to_string(),
            payload: None,
            recommendation: Some(format!("Improve the header value to: {}", recommended)),
        }
    }

    pub fn http_not_redirected(final_url: &str, url: &str) -> Self {
        Self {
            kind: FindingKind::HttpNotRedirected,
            severity: Severity::High,
            subject: "https_redirect".to_string(),
            evidence: format!("final URL {}", final_url),
            detail: "HTTP requests are not redirected to HTTPS".to_string(),
            url: url.to_string(),
            payload: None,
            recommendation: Some(
                "Configure the server to redirect all HTTP requests to HTTPS".to_string(),
            ),
        }
    }
}

/// Wall-clock bounds of one category run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timestamps {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_secs: f64,
}

impl Timestamps {
    pub fn since(started_at: DateTime<Utc>) -> Self {
        let finished_at = Utc::now();
        let duration_secs = (finished_at - started_at)
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        Self {
            started_at,
            finished_at,
            duration_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_type() {
        let f = Finding::http_not_redirected("http://a.test/", "https://a.test/");
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["type"], "http_not_redirected");
        assert_eq!(json["severity"], "high");
        assert!(json.get("payload").is_none());
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Critical > Severity::Low);
    }
}
