//! Named JSON configurations with CLI/environment overrides

use crate::config::target::{
    ComprehensiveSettings, CsrfSettings, FieldSpec, InjectionSettings, NamedField, ReportFormat,
    TargetConfig, TimingSettings, Verbosity, SUBMIT_FIELD,
};
use crate::core::capability::{Category, Mode};
use crate::core::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Default, Deserialize)]
struct RawTarget {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
    /// Kept as a map so declaration order survives.
    #[serde(default)]
    fields: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    sql_injection_settings: InjectionSettings,
    #[serde(default)]
    xss_settings: InjectionSettings,
    #[serde(default)]
    csrf_settings: CsrfSettings,
    #[serde(default)]
    timing: TimingSettings,
    #[serde(default)]
    comprehensive_settings: RawComprehensive,
    #[serde(default)]
    mode: Option<Mode>,
    #[serde(default)]
    verbosity: Option<Verbosity>,
}

#[derive(Debug, Default, Deserialize)]
struct RawComprehensive {
    #[serde(default)]
    tests: Option<Vec<Category>>,
    #[serde(default)]
    report_format: Option<ReportFormat>,
    #[serde(default)]
    report_dir: Option<PathBuf>,
    #[serde(default)]
    sql_injection_settings: Option<InjectionSettings>,
    #[serde(default)]
    xss_settings: Option<InjectionSettings>,
    #[serde(default)]
    csrf_settings: Option<CsrfSettings>,
}

/// Values that outrank the config file. The CLI layer fills these from
/// flags or their environment variables.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub mode: Option<Mode>,
    pub verbosity: Option<Verbosity>,
    pub report_format: Option<ReportFormat>,
    pub report_dir: Option<PathBuf>,
    pub tests: Vec<Category>,
    pub min_interval: Option<u64>,
    pub max_interval: Option<u64>,
}

pub fn load_file(path: &Path, name: &str, overrides: &Overrides) -> Result<TargetConfig, ConfigError> {
    let source_name = path.display().to_string();
    tracing::info!("Loading configuration '{}' from file: {}", name, source_name);

    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound(source_name.clone()))?;
    parse(&text, &source_name, name, overrides)
}

/// Picks `name` out of the document, applies overrides and defaults.
/// Validation is separate since it depends on the final mode.
pub fn parse(text: &str, source: &str, name: &str, overrides: &Overrides) -> Result<TargetConfig, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidJson {
        path: source.to_string(),
        reason,
    };

    let mut all: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(text).map_err(|e| invalid(e.to_string()))?;
    let entry = all.remove(name).ok_or_else(|| ConfigError::UnknownConfig {
        name: name.to_string(),
        available: all.keys().cloned().collect::<Vec<_>>().join(", "),
    })?;
    let raw: RawTarget = serde_json::from_value(entry).map_err(|e| invalid(format!("'{}': {}", name, e)))?;

    build(raw, name, overrides)
}

fn build(raw: RawTarget, name: &str, overrides: &Overrides) -> Result<TargetConfig, ConfigError> {
    let url_text = overrides
        .url
        .clone()
        .or(raw.url)
        .filter(|u| !u.trim().is_empty())
        .ok_or(ConfigError::MissingUrl)?;
    let url = Url::parse(url_text.trim()).map_err(|e| ConfigError::InvalidUrl {
        url: url_text.clone(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            url: url_text,
            reason: "only http and https targets are supported".to_string(),
        });
    }

    let mut fields = Vec::new();
    let mut submit = None;
    for (field_name, value) in raw.fields {
        let spec: FieldSpec = serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            key: format!("fields.{}", field_name),
            reason: e.to_string(),
        })?;
        if field_name == SUBMIT_FIELD {
            submit = Some(spec);
        } else {
            fields.push(NamedField { name: field_name, spec });
        }
    }

    let mut timing = raw.timing;
    if let Some(v) = overrides.min_interval {
        timing.min_interval = v;
    }
    if let Some(v) = overrides.max_interval {
        timing.max_interval = v;
    }

    let defaults = ComprehensiveSettings::default();
    let rc = raw.comprehensive_settings;
    let comprehensive = ComprehensiveSettings {
        tests: if !overrides.tests.is_empty() {
            overrides.tests.clone()
        } else {
            rc.tests.unwrap_or(defaults.tests)
        },
        report_format: overrides
            .report_format
            .or(rc.report_format)
            .unwrap_or(defaults.report_format),
        report_dir: overrides
            .report_dir
            .clone()
            .or(rc.report_dir)
            .unwrap_or(defaults.report_dir),
        sql_injection: rc.sql_injection_settings,
        xss: rc.xss_settings,
        csrf: rc.csrf_settings,
    };

    Ok(TargetConfig {
        name: raw.name.unwrap_or_else(|| name.to_string()),
        url,
        fields,
        submit,
        sql_injection: raw.sql_injection_settings,
        xss: raw.xss_settings,
        csrf: raw.csrf_settings,
        timing,
        comprehensive,
        mode: overrides.mode.or(raw.mode),
        verbosity: overrides.verbosity.or(raw.verbosity),
    })
}

/// Checks what `mode` needs from the target before anything runs.
pub fn validate(cfg: &TargetConfig, mode: Mode) -> Result<(), ConfigError> {
    for field in &cfg.fields {
        if field.spec.locators().is_empty() {
            return Err(ConfigError::EmptySelector(field.name.clone()));
        }
    }
    if let Some(submit) = &cfg.submit {
        if submit.locators().is_empty() {
            return Err(ConfigError::EmptySelector(SUBMIT_FIELD.to_string()));
        }
    }

    let needs_fields = match mode {
        Mode::Submit | Mode::SqlInject | Mode::Xss => true,
        Mode::Comprehensive => cfg.comprehensive.tests.iter().any(|c| c.is_injection()),
        Mode::Csrf | Mode::Headers => false,
    };
    if needs_fields && cfg.fillable_fields().next().is_none() {
        return Err(ConfigError::NoFields);
    }

    if mode == Mode::Submit && cfg.submit.is_none() {
        return Err(ConfigError::InvalidValue {
            key: format!("fields.{}", SUBMIT_FIELD),
            reason: "submit mode needs a submit control".to_string(),
        });
    }

    if mode == Mode::Comprehensive && cfg.comprehensive.tests.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "comprehensive_settings.tests".to_string(),
            reason: "no security tests selected".to_string(),
        });
    }

    if cfg.timing.min_interval > cfg.timing.max_interval {
        return Err(ConfigError::InvalidValue {
            key: "timing.min_interval".to_string(),
            reason: format!(
                "{} is greater than max_interval {}",
                cfg.timing.min_interval, cfg.timing.max_interval
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::target::SelectorKind;
    use std::io::Write;

    const DOC: &str = r##"{
        "default": {
            "url": "https://shop.test/contact",
            "fields": {
                "last_name": {"selector": "#last", "required": true},
                "first_name": {"selector": "//input[@id='first']", "type": "xpath"},
                "agree": {"selector": "#agree", "input_type": "checkbox"},
                "submit_button": {"selector": "button[type=submit]"}
            },
            "sql_injection_settings": {"payload_categories": ["basic"], "max_attempts_per_field": 2},
            "timing": {"min_interval": 5, "max_interval": 10},
            "comprehensive_settings": {"tests": ["sql", "headers"], "report_format": "json"}
        },
        "headers_only": {"url": "https://shop.test/"}
    }"##;

    #[test]
    fn test_parse_keeps_field_order_and_extracts_submit() {
        let cfg = parse(DOC, "inline", "default", &Overrides::default()).unwrap();

        let names: Vec<_> = cfg.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["last_name", "first_name", "agree"]);
        assert_eq!(cfg.fields[1].spec.selector_type, SelectorKind::Xpath);
        assert!(cfg.fields[0].spec.required);
        assert_eq!(cfg.submit.as_ref().unwrap().selector, "button[type=submit]");
        assert_eq!(cfg.sql_injection.max_attempts_per_field, 2);
        assert!(cfg.xss.payload_categories.is_none());
        assert_eq!(cfg.comprehensive.tests, vec![Category::SqlInject, Category::Headers]);
        assert_eq!(cfg.comprehensive.report_format, ReportFormat::Json);
        assert_eq!(cfg.comprehensive.report_dir, PathBuf::from("reports"));
        assert_eq!(cfg.timing.element_wait_time, 10);
        assert!(validate(&cfg, Mode::Comprehensive).is_ok());
    }

    #[test]
    fn test_checkbox_type_and_mixed_case_xpath() {
        let doc = r##"{
            "default": {
                "url": "http://shop.test/",
                "fields": {
                    "comment": {"selector": "//textarea", "type": "XPath"},
                    "agree": {"selector": "#agree", "type": "checkbox"},
                    "submit_button": {"selector": "#go"}
                }
            }
        }"##;
        let cfg = parse(doc, "inline", "default", &Overrides::default()).unwrap();

        assert_eq!(cfg.fields[0].spec.selector_type, SelectorKind::Xpath);
        assert!(cfg.fields[1].spec.is_checkbox());
        let fillable: Vec<_> = cfg.fillable_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(fillable, vec!["comment"]);
        assert!(validate(&cfg, Mode::SqlInject).is_ok());
    }

    #[test]
    fn test_overrides_win() {
        let overrides = Overrides {
            url: Some("http://staging.test/form".to_string()),
            mode: Some(Mode::Headers),
            report_dir: Some(PathBuf::from("/tmp/out")),
            tests: vec![Category::Csrf],
            max_interval: Some(60),
            ..Overrides::default()
        };
        let cfg = parse(DOC, "inline", "default", &overrides).unwrap();

        assert_eq!(cfg.url.as_str(), "http://staging.test/form");
        assert_eq!(cfg.mode, Some(Mode::Headers));
        assert_eq!(cfg.comprehensive.tests, vec![Category::Csrf]);
        assert_eq!(cfg.comprehensive.report_format, ReportFormat::Json);
        assert_eq!(cfg.comprehensive.report_dir, PathBuf::from("/tmp/out"));
        assert_eq!(cfg.timing.min_interval, 5);
        assert_eq!(cfg.timing.max_interval, 60);
    }

    #[test]
    fn test_headers_only_config_needs_no_fields() {
        let cfg = parse(DOC, "inline", "headers_only", &Overrides::default()).unwrap();
        assert!(validate(&cfg, Mode::Headers).is_ok());
        assert!(matches!(validate(&cfg, Mode::SqlInject), Err(ConfigError::NoFields)));
        // default tests include sql and xss
        assert!(matches!(validate(&cfg, Mode::Comprehensive), Err(ConfigError::NoFields)));
    }

    #[test]
    fn test_config_errors() {
        let none = Overrides::default();
        assert!(matches!(
            parse(DOC, "inline", "missing", &none),
            Err(ConfigError::UnknownConfig { .. })
        ));
        assert!(matches!(
            parse("{not json", "inline", "default", &none),
            Err(ConfigError::InvalidJson { .. })
        ));
        assert!(matches!(
            parse(r#"{"default": {"fields": {}}}"#, "inline", "default", &none),
            Err(ConfigError::MissingUrl)
        ));
        assert!(matches!(
            parse(r#"{"default": {"url": "ftp://x.test/"}}"#, "inline", "default", &none),
            Err(ConfigError::InvalidUrl { .. })
        ));

        let cfg = parse(
            r#"{"default": {"url": "http://x.test/", "fields": {"q": {"selector": " "}}}}"#,
            "inline",
            "default",
            &none,
        )
        .unwrap();
        assert!(matches!(validate(&cfg, Mode::Xss), Err(ConfigError::EmptySelector(_))));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DOC.as_bytes()).unwrap();

        let cfg = load_file(file.path(), "default", &Overrides::default()).unwrap();
        assert_eq!(cfg.name, "default");

        let missing = load_file(Path::new("/nonexistent/config.json"), "default", &Overrides::default());
        assert!(matches!(missing, Err(ConfigError::FileNotFound(_))));
    }
}
