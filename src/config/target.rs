//! Immutable per-run target description

use crate::browser::Locator;
use crate::core::capability::{Category, Mode};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Name of the `fields` entry that designates the submit control.
pub const SUBMIT_FIELD: &str = "submit_button";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorKind {
    #[default]
    Css,
    Xpath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    FirstName,
    LastName,
    Email,
    Phone,
    #[default]
    Generic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldSpec")]
pub struct FieldSpec {
    pub selector: String,
    pub selector_type: SelectorKind,
    /// HTML input type when it matters (`checkbox` fields are never injected).
    pub input_type: Option<String>,
    pub required: bool,
    pub role: FieldRole,
    /// Fallback `id` attribute for the locator search.
    pub id: Option<String>,
    /// Fallback `name` attribute for the locator search.
    pub name: Option<String>,
    /// Allowed values for select-like fields.
    pub options: Vec<String>,
}

/// On-disk field shape. `type` is overloaded: `css`/`xpath` name the
/// selector kind, anything else is the HTML input type.
#[derive(Deserialize)]
struct RawFieldSpec {
    #[serde(default)]
    selector: String,
    #[serde(default)]
    selector_type: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    input_type: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    role: FieldRole,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "values")]
    options: Vec<String>,
}

fn selector_kind(raw: &str) -> Option<SelectorKind> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "css" => Some(SelectorKind::Css),
        "xpath" => Some(SelectorKind::Xpath),
        _ => None,
    }
}

impl TryFrom<RawFieldSpec> for FieldSpec {
    type Error = String;

    fn try_from(raw: RawFieldSpec) -> Result<Self, Self::Error> {
        let mut selector_type = match raw.selector_type.as_deref() {
            Some(s) => selector_kind(s).ok_or_else(|| format!("unknown selector_type '{}', expected css or xpath", s))?,
            None => SelectorKind::Css,
        };
        let mut input_type = raw.input_type;

        if let Some(kind) = raw.kind.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            match selector_kind(kind) {
                Some(k) if raw.selector_type.is_none() => selector_type = k,
                Some(_) => {}
                None => {
                    if input_type.is_none() {
                        input_type = Some(kind.to_ascii_lowercase());
                    }
                }
            }
        }

        Ok(FieldSpec {
            selector: raw.selector,
            selector_type,
            input_type,
            required: raw.required,
            role: raw.role,
            id: raw.id,
            name: raw.name,
            options: raw.options,
        })
    }
}

impl FieldSpec {
    pub fn css(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            selector_type: SelectorKind::Css,
            input_type: None,
            required: false,
            role: FieldRole::Generic,
            id: None,
            name: None,
            options: Vec::new(),
        }
    }

    pub fn is_checkbox(&self) -> bool {
        self.input_type
            .as_deref()
            .map(|t| t.eq_ignore_ascii_case("checkbox"))
            .unwrap_or(false)
    }

    /// Locator strategies in search order: configured selector, then
    /// `name` attribute, then `id` attribute.
    pub fn locators(&self) -> Vec<Locator> {
        let mut out = Vec::with_capacity(3);
        if !self.selector.trim().is_empty() {
            out.push(match self.selector_type {
                SelectorKind::Css => Locator::Css(self.selector.clone()),
                SelectorKind::Xpath => Locator::XPath(self.selector.clone()),
            });
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            out.push(Locator::Name(name.to_string()));
        }
        if let Some(id) = self.id.as_deref().filter(|i| !i.is_empty()) {
            out.push(Locator::Id(id.to_string()));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedField {
    pub name: String,
    pub spec: FieldSpec,
}

/// Settings bag shared by the SQL and XSS probers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjectionSettings {
    /// `None` selects every category of the catalog.
    #[serde(default)]
    pub payload_categories: Option<Vec<String>>,
    /// 0 tests every selected payload.
    #[serde(default)]
    pub max_attempts_per_field: usize,
    /// When false, testing stops after the first field that produced a finding.
    #[serde(default = "default_true")]
    pub test_all_fields: bool,
}

impl Default for InjectionSettings {
    fn default() -> Self {
        Self {
            payload_categories: None,
            max_attempts_per_field: 0,
            test_all_fields: true,
        }
    }
}

impl InjectionSettings {
    pub fn stop_on_first_hit(&self) -> bool {
        !self.test_all_fields
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrfSettings {
    /// Substrings that mark a hidden input as an anti-CSRF token.
    #[serde(default = "default_token_markers")]
    pub token_markers: Vec<String>,
}

impl Default for CsrfSettings {
    fn default() -> Self {
        Self {
            token_markers: default_token_markers(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingSettings {
    /// Seconds to poll for an element before the trial step fails.
    #[serde(default = "default_element_wait")]
    pub element_wait_time: u64,
    #[serde(default = "default_page_settle")]
    pub page_settle_ms: u64,
    #[serde(default = "default_trial_pause")]
    pub trial_pause_ms: u64,
    /// Submit-mode interval bounds in seconds.
    #[serde(default = "default_min_interval")]
    pub min_interval: u64,
    #[serde(default = "default_max_interval")]
    pub max_interval: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            element_wait_time: default_element_wait(),
            page_settle_ms: default_page_settle(),
            trial_pause_ms: default_trial_pause(),
            min_interval: default_min_interval(),
            max_interval: default_max_interval(),
        }
    }
}

impl TimingSettings {
    #[cfg(test)]
    /// No waiting at all; used by tests driving scripted actors.
    pub fn immediate() -> Self {
        Self {
            element_wait_time: 0,
            page_settle_ms: 0,
            trial_pause_ms: 0,
            min_interval: 0,
            max_interval: 0,
        }
    }

    pub fn element_wait(&self) -> Duration {
        Duration::from_secs(self.element_wait_time)
    }

    pub fn page_settle(&self) -> Duration {
        Duration::from_millis(self.page_settle_ms)
    }

    pub fn trial_pause(&self) -> Duration {
        Duration::from_millis(self.trial_pause_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Html,
    Json,
    Both,
}

impl ReportFormat {
    pub fn wants_html(&self) -> bool {
        matches!(self, ReportFormat::Html | ReportFormat::Both)
    }

    pub fn wants_json(&self) -> bool {
        matches!(self, ReportFormat::Json | ReportFormat::Both)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComprehensiveSettings {
    pub tests: Vec<Category>,
    pub report_format: ReportFormat,
    pub report_dir: PathBuf,
    /// Per-category settings that replace the top-level ones during a
    /// comprehensive run.
    pub sql_injection: Option<InjectionSettings>,
    pub xss: Option<InjectionSettings>,
    pub csrf: Option<CsrfSettings>,
}

impl Default for ComprehensiveSettings {
    fn default() -> Self {
        Self {
            tests: Category::ALL.to_vec(),
            report_format: ReportFormat::Html,
            report_dir: PathBuf::from("reports"),
            sql_injection: None,
            xss: None,
            csrf: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Minimal,
    #[default]
    Balanced,
    Verbose,
}

impl Verbosity {
    pub fn filter_directive(&self) -> &'static str {
        match self {
            Verbosity::Minimal => "warn",
            Verbosity::Balanced => "info",
            Verbosity::Verbose => "debug",
        }
    }
}

/// Validated, read-only input for one run.
#[derive(Debug, Clone)]
pub struct TargetConfig {
    pub name: String,
    pub url: Url,
    /// Ordered as declared; never contains the submit control.
    pub fields: Vec<NamedField>,
    pub submit: Option<FieldSpec>,
    pub sql_injection: InjectionSettings,
    pub xss: InjectionSettings,
    pub csrf: CsrfSettings,
    pub timing: TimingSettings,
    pub comprehensive: ComprehensiveSettings,
    pub mode: Option<Mode>,
    pub verbosity: Option<Verbosity>,
}

impl TargetConfig {
    pub fn new(url: Url) -> Self {
        Self {
            name: "default".to_string(),
            url,
            fields: Vec::new(),
            submit: None,
            sql_injection: InjectionSettings::default(),
            xss: InjectionSettings::default(),
            csrf: CsrfSettings::default(),
            timing: TimingSettings::default(),
            comprehensive: ComprehensiveSettings::default(),
            mode: None,
            verbosity: None,
        }
    }

    #[cfg(test)]
    pub fn with_field(mut self, name: &str, spec: FieldSpec) -> Self {
        self.fields.push(NamedField {
            name: name.to_string(),
            spec,
        });
        self
    }

    #[cfg(test)]
    pub fn with_submit(mut self, spec: FieldSpec) -> Self {
        self.submit = Some(spec);
        self
    }

    /// Fields eligible for payload injection.
    pub fn fillable_fields(&self) -> impl Iterator<Item = &NamedField> {
        self.fields.iter().filter(|f| !f.spec.is_checkbox())
    }

    /// Copy with the comprehensive overrides applied.
    pub fn for_comprehensive(&self) -> TargetConfig {
        let mut cfg = self.clone();
        if let Some(s) = &self.comprehensive.sql_injection {
            cfg.sql_injection = s.clone();
        }
        if let Some(s) = &self.comprehensive.xss {
            cfg.xss = s.clone();
        }
        if let Some(s) = &self.comprehensive.csrf {
            cfg.csrf = s.clone();
        }
        cfg
    }
}

fn default_true() -> bool {
    true
}

fn default_token_markers() -> Vec<String> {
    vec!["csrf".to_string(), "token".to_string(), "nonce".to_string()]
}

fn default_element_wait() -> u64 {
    10
}

fn default_page_settle() -> u64 {
    2000
}

fn default_trial_pause() -> u64 {
    1000
}

fn default_min_interval() -> u64 {
    300
}

fn default_max_interval() -> u64 {
    2700
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_order() {
        let mut spec = FieldSpec::css("#email");
        spec.name = Some("email".to_string());
        spec.id = Some("email-id".to_string());
        assert_eq!(
            spec.locators(),
            vec![
                Locator::Css("#email".to_string()),
                Locator::Name("email".to_string()),
                Locator::Id("email-id".to_string()),
            ]
        );
    }

    #[test]
    fn test_checkbox_not_fillable() {
        let mut agree = FieldSpec::css("#agree");
        agree.input_type = Some("Checkbox".to_string());
        let cfg = TargetConfig::new(Url::parse("http://example.test").unwrap())
            .with_field("comment", FieldSpec::css("#comment"))
            .with_field("agree", agree);
        let names: Vec<_> = cfg.fillable_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["comment"]);
    }

    #[test]
    fn test_field_type_is_selector_kind_or_input_type() {
        let spec: FieldSpec = serde_json::from_str(r#"{"selector": "//input", "type": "XPath"}"#).unwrap();
        assert_eq!(spec.selector_type, SelectorKind::Xpath);
        assert_eq!(spec.input_type, None);

        let spec: FieldSpec = serde_json::from_str(r##"{"selector": "#agree", "type": "checkbox"}"##).unwrap();
        assert_eq!(spec.selector_type, SelectorKind::Css);
        assert!(spec.is_checkbox());

        let spec: FieldSpec = serde_json::from_str(r##"{"selector": "#x", "selector_type": "css", "type": "email"}"##).unwrap();
        assert_eq!(spec.input_type.as_deref(), Some("email"));

        assert!(serde_json::from_str::<FieldSpec>(r##"{"selector": "#x", "selector_type": "regex"}"##).is_err());
    }

    #[test]
    fn test_injection_settings_defaults() {
        let s: InjectionSettings = serde_json::from_str("{}").unwrap();
        assert!(s.test_all_fields);
        assert!(!s.stop_on_first_hit());
        assert_eq!(s.max_attempts_per_field, 0);
        assert!(s.payload_categories.is_none());
    }
}
