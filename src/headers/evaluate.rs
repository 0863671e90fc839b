use crate::headers::catalog::{HeaderSpec, SECURITY_HEADERS};
use crate::reporting::model::Severity;
use serde::Serialize;

/// One year, the HSTS floor.
pub const HSTS_MIN_MAX_AGE: u64 = 31_536_000;

const STRONG_REFERRER_POLICIES: &[&str] = &[
    "no-referrer",
    "same-origin",
    "strict-origin",
    "strict-origin-when-cross-origin",
];
const MODERATE_REFERRER_POLICIES: &[&str] =
    &["origin", "origin-when-cross-origin", "no-referrer-when-downgrade"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderStatus {
    Present,
    Strong,
    Moderate,
    Weak,
    Invalid,
    Missing,
}

impl HeaderStatus {
    pub fn earns_credit(&self) -> bool {
        matches!(
            self,
            HeaderStatus::Present | HeaderStatus::Strong | HeaderStatus::Moderate
        )
    }

    pub fn is_deficient(&self) -> bool {
        matches!(self, HeaderStatus::Weak | HeaderStatus::Invalid)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderAnalysis {
    pub name: String,
    /// `None` when the header is absent.
    pub value: Option<String>,
    pub description: String,
    pub status: HeaderStatus,
    pub severity: Severity,
    pub recommendation: String,
    pub info: String,
}

impl HeaderAnalysis {
    fn from_spec(spec: &HeaderSpec, value: Option<&str>, status: HeaderStatus, note: Option<&str>) -> Self {
        let mut info = spec.info.to_string();
        if let Some(note) = note {
            info.push_str(". ");
            info.push_str(note);
        }
        Self {
            name: spec.name.to_string(),
            value: value.map(str::to_string),
            description: spec.description.to_string(),
            status,
            severity: spec.severity,
            recommendation: spec.recommendation.to_string(),
            info,
        }
    }
}

/// Evaluates one present header. Headers with no specific rule are
/// `present`.
pub fn analyze_header(spec: &HeaderSpec, value: &str) -> HeaderAnalysis {
    let mut note = None;
    let status = match spec.name {
        "Strict-Transport-Security" => match hsts_max_age(value) {
            None => HeaderStatus::Weak,
            Some(Err(())) => HeaderStatus::Invalid,
            Some(Ok(age)) if age < HSTS_MIN_MAX_AGE => {
                note = Some("The max-age is less than recommended (1 year)");
                HeaderStatus::Weak
            }
            Some(Ok(_)) => HeaderStatus::Present,
        },
        "Content-Security-Policy" => {
            if value.contains("default-src 'none'") || value.contains("default-src 'self'") {
                HeaderStatus::Strong
            } else if value.contains("default-src") {
                HeaderStatus::Moderate
            } else {
                HeaderStatus::Weak
            }
        }
        "X-Content-Type-Options" => pass_or_weak(value.trim().eq_ignore_ascii_case("nosniff")),
        "X-Frame-Options" => {
            let v = value.trim().to_ascii_uppercase();
            pass_or_weak(v == "DENY" || v == "SAMEORIGIN")
        }
        "X-XSS-Protection" => pass_or_weak(value.trim() == "1; mode=block"),
        "Referrer-Policy" => referrer_status(value),
        _ => HeaderStatus::Present,
    };
    HeaderAnalysis::from_spec(spec, Some(value), status, note)
}

fn pass_or_weak(ok: bool) -> HeaderStatus {
    if ok {
        HeaderStatus::Present
    } else {
        HeaderStatus::Weak
    }
}

/// `None` without a max-age directive, `Some(Err)` when it does not parse.
fn hsts_max_age(value: &str) -> Option<Result<u64, ()>> {
    let (_, rest) = value.split_once("max-age=")?;
    let raw = rest.split(';').next().unwrap_or("").trim().trim_matches('"');
    Some(raw.parse::<u64>().map_err(|_| ()))
}

/// The policy header may list fallbacks; the strongest token decides.
fn referrer_status(value: &str) -> HeaderStatus {
    let tokens: Vec<String> = value
        .split(',')
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.iter().any(|t| STRONG_REFERRER_POLICIES.contains(&t.as_str())) {
        HeaderStatus::Strong
    } else if tokens.iter().any(|t| MODERATE_REFERRER_POLICIES.contains(&t.as_str())) {
        HeaderStatus::Moderate
    } else {
        HeaderStatus::Weak
    }
}

/// Evaluates the whole catalog, in catalog order, against a header
/// lookup that is already case-insensitive.
pub fn evaluate_headers<'a, F>(lookup: F) -> Vec<HeaderAnalysis>
where
    F: Fn(&str) -> Option<&'a str>,
{
    SECURITY_HEADERS
        .iter()
        .map(|spec| match lookup(spec.name) {
            Some(value) => {
                let analysis = analyze_header(spec, value);
                if analysis.status.is_deficient() {
                    tracing::warn!(
                        "Security header '{}' has a weak implementation: {}",
                        spec.name,
                        value
                    );
                }
                analysis
            }
            None => {
                if spec.severity == Severity::High {
                    tracing::warn!("Important security header '{}' is missing", spec.name);
                } else {
                    tracing::info!("Security header '{}' is missing", spec.name);
                }
                HeaderAnalysis::from_spec(spec, None, HeaderStatus::Missing, None)
            }
        })
        .collect()
}
