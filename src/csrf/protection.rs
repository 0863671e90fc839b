use crate::browser::{CookieInfo, SameSite};
use crate::reporting::model::Severity;
use serde::Serialize;

/// Referrer policies that withhold the path from cross-site requests.
const PROTECTIVE_REFERRER_POLICIES: &[&str] =
    &["same-origin", "strict-origin", "strict-origin-when-cross-origin"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtectionLevel {
    Weak,
    Medium,
    Strong,
}

impl ProtectionLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 4 => ProtectionLevel::Strong,
            s if s >= 2 => ProtectionLevel::Medium,
            _ => ProtectionLevel::Weak,
        }
    }

    /// Severity of the finding a form at this level produces, if any.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            ProtectionLevel::Weak => Some(Severity::High),
            ProtectionLevel::Medium => Some(Severity::Medium),
            ProtectionLevel::Strong => None,
        }
    }

    pub fn details(&self) -> &'static str {
        match self {
            ProtectionLevel::Weak => "Form has weak or no CSRF protection.",
            ProtectionLevel::Medium => "Form has some CSRF protection, but it could be improved.",
            ProtectionLevel::Strong => "Form has strong CSRF protection.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormProtection {
    pub has_csrf_token: bool,
    pub has_samesite_cookie: bool,
    pub has_secure_cookie: bool,
    pub has_httponly_cookie: bool,
    pub has_referer_protection: bool,
    pub score: u32,
    pub level: ProtectionLevel,
}

impl FormProtection {
    /// SameSite Strict/Lax on any cookie +2, Secure +1, HttpOnly +1,
    /// protective referrer policy +1, token field +3.
    pub fn assess(has_token: bool, cookies: &[CookieInfo], referrer_policy: &str) -> Self {
        let has_samesite_cookie = cookies
            .iter()
            .any(|c| matches!(c.same_site, Some(SameSite::Strict) | Some(SameSite::Lax)));
        let has_secure_cookie = cookies.iter().any(|c| c.secure);
        let has_httponly_cookie = cookies.iter().any(|c| c.http_only);
        let policy = referrer_policy.trim().to_lowercase();
        let has_referer_protection = PROTECTIVE_REFERRER_POLICIES.contains(&policy.as_str());

        let score: u32 = [
            (has_samesite_cookie, 2u32),
            (has_secure_cookie, 1),
            (has_httponly_cookie, 1),
            (has_referer_protection, 1),
            (has_token, 3),
        ]
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, points)| *points)
        .sum();

        Self {
            has_csrf_token: has_token,
            has_samesite_cookie,
            has_secure_cookie,
            has_httponly_cookie,
            has_referer_protection,
            score,
            level: ProtectionLevel::from_score(score),
        }
    }
}
