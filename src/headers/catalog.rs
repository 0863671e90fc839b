use crate::reporting::model::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub recommendation: &'static str,
    pub severity: Severity,
    pub info: &'static str,
}

pub const SECURITY_HEADERS: &[HeaderSpec] = &[
    HeaderSpec {
        name: "Strict-Transport-Security",
        description: "HTTP Strict Transport Security (HSTS)",
        recommendation: "max-age=31536000; includeSubDomains; preload",
        severity: Severity::High,
        info: "Ensures the browser always uses HTTPS for your domain",
    },
    HeaderSpec {
        name: "Content-Security-Policy",
        description: "Content Security Policy (CSP)",
        recommendation: "default-src 'self'; script-src 'self'; object-src 'none'",
        severity: Severity::High,
        info: "Prevents XSS attacks by specifying which content sources are approved",
    },
    HeaderSpec {
        name: "X-Content-Type-Options",
        description: "X-Content-Type-Options",
        recommendation: "nosniff",
        severity: Severity::Medium,
        info: "Prevents MIME type sniffing which can lead to security vulnerabilities",
    },
    HeaderSpec {
        name: "X-Frame-Options",
        description: "X-Frame-Options",
        recommendation: "DENY or SAMEORIGIN",
        severity: Severity::Medium,
        info: "Prevents clickjacking by controlling whether the page may be rendered in a frame",
    },
    HeaderSpec {
        name: "X-XSS-Protection",
        description: "X-XSS-Protection",
        recommendation: "1; mode=block",
        severity: Severity::Medium,
        info: "Enables cross-site scripting (XSS) filtering in browsers",
    },
    HeaderSpec {
        name: "Referrer-Policy",
        description: "Referrer Policy",
        recommendation: "no-referrer or same-origin",
        severity: Severity::Medium,
        info: "Controls what information is sent in the Referer header",
    },
    HeaderSpec {
        name: "Permissions-Policy",
        description: "Permissions Policy",
        recommendation: "camera=(), microphone=(), geolocation=()",
        severity: Severity::Low,
        info: "Controls which browser features can be used on the page",
    },
    HeaderSpec {
        name: "Cache-Control",
        description: "Cache-Control",
        recommendation: "no-store, max-age=0",
        severity: Severity::Low,
        info: "Controls how pages are cached by browsers and proxies",
    },
    HeaderSpec {
        name: "Clear-Site-Data",
        description: "Clear-Site-Data",
        recommendation: "\"cache\", \"cookies\", \"storage\"",
        severity: Severity::Low,
        info: "Clears browsing data (cookies, storage, cache) associated with the requesting website",
    },
];
