//! Test categories and operation modes

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
pub enum Category {
    #[serde(rename = "sql", alias = "sql_inject")]
    #[value(name = "sql", alias = "sql_inject")]
    SqlInject,
    #[serde(rename = "xss")]
    #[value(name = "xss")]
    Xss,
    #[serde(rename = "csrf")]
    #[value(name = "csrf")]
    Csrf,
    #[serde(rename = "headers")]
    #[value(name = "headers")]
    Headers,
}

impl Category {
    /// Run order used by the aggregator.
    pub const ALL: [Category; 4] = [
        Category::SqlInject,
        Category::Xss,
        Category::Csrf,
        Category::Headers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::SqlInject => "sql",
            Category::Xss => "xss",
            Category::Csrf => "csrf",
            Category::Headers => "headers",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::SqlInject => "SQL Injection",
            Category::Xss => "Cross-Site Scripting",
            Category::Csrf => "CSRF",
            Category::Headers => "Security Headers",
        }
    }

    pub fn is_injection(&self) -> bool {
        matches!(self, Category::SqlInject | Category::Xss)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Submit,
    #[value(name = "sql_inject")]
    SqlInject,
    Xss,
    Csrf,
    Headers,
    Comprehensive,
}

impl Mode {
    /// The single category a focused security mode runs.
    pub fn category(&self) -> Option<Category> {
        match self {
            Mode::SqlInject => Some(Category::SqlInject),
            Mode::Xss => Some(Category::Xss),
            Mode::Csrf => Some(Category::Csrf),
            Mode::Headers => Some(Category::Headers),
            Mode::Submit | Mode::Comprehensive => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serde_alias() {
        let c: Category = serde_json::from_str("\"sql_inject\"").unwrap();
        assert_eq!(c, Category::SqlInject);
        assert_eq!(serde_json::to_string(&Category::Headers).unwrap(), "\"headers\"");
    }

    #[test]
    fn test_mode_category() {
        assert_eq!(Mode::Headers.category(), Some(Category::Headers));
        assert_eq!(Mode::Comprehensive.category(), None);
    }
}
