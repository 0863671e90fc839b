use once_cell::sync::Lazy;
use regex::Regex;

/// Database error fragments, matched against the case-folded page.
const ERROR_PATTERNS: &[&str] = &[
    "sql syntax",
    "unclosed quotation",
    "unterminated string",
    "sql error",
    "syntax error",
    "mysql error",
    "postgresql error",
    "database error",
    "odbc driver",
    "ora-",
    r"line \d+",
    "unexpected end",
    "warning:",
    "invalid query",
    "sql state",
    "microsoft sql",
    "postgres error",
    "mysqli",
    "mysql_query",
];

static SIGNATURES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    ERROR_PATTERNS
        .iter()
        .filter_map(|p| match Regex::new(p) {
            Ok(re) => Some((*p, re)),
            Err(e) => {
                tracing::error!("Invalid SQL error signature '{}': {}", p, e);
                None
            }
        })
        .collect()
});

/// First signature (in declaration order) found in `page`.
pub fn first_match(page: &str) -> Option<&'static str> {
    let folded = page.to_lowercase();
    SIGNATURES
        .iter()
        .find(|(_, re)| re.is_match(&folded))
        .map(|(pattern, _)| *pattern)
}
