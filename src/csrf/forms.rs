use scraper::{Html, Selector};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormInput {
    pub input_type: String,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormDetails {
    pub id: String,
    pub name: String,
    pub action: String,
    /// Lowercased; `get` when undeclared.
    pub method: String,
    pub inputs: Vec<FormInput>,
    /// Name of the first hidden input that looks like an anti-CSRF token.
    pub csrf_field: Option<String>,
}

impl FormDetails {
    pub fn has_csrf_token(&self) -> bool {
        self.csrf_field.is_some()
    }

    pub fn is_get(&self) -> bool {
        self.method == "get"
    }

    /// Human label: id, then name, then position on the page.
    pub fn label(&self, index: usize) -> String {
        if !self.id.is_empty() {
            self.id.clone()
        } else if !self.name.is_empty() {
            self.name.clone()
        } else {
            format!("form #{}", index + 1)
        }
    }
}

/// Every `<form>` in `html` with its inputs. `token_markers` are matched
/// case-insensitively against hidden input names.
pub fn extract_forms(html: &str, token_markers: &[String]) -> Vec<FormDetails> {
    let document = Html::parse_document(html);
    let (Ok(form_sel), Ok(input_sel)) = (Selector::parse("form"), Selector::parse("input")) else {
        return Vec::new();
    };

    let mut forms = Vec::new();
    for form in document.select(&form_sel) {
        let attr = |name: &str| form.value().attr(name).unwrap_or("").to_string();
        let method = form
            .value()
            .attr("method")
            .map(|m| m.trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "get".to_string());

        let mut inputs = Vec::new();
        let mut csrf_field = None;
        for input in form.select(&input_sel) {
            let input_type = input.value().attr("type").unwrap_or("text").to_string();
            let name = input.value().attr("name").unwrap_or("").to_string();
            let value = input.value().attr("value").unwrap_or("").to_string();

            if csrf_field.is_none() && input_type.eq_ignore_ascii_case("hidden") && !name.is_empty() {
                let lower = name.to_lowercase();
                if token_markers.iter().any(|m| lower.contains(&m.to_lowercase())) {
                    csrf_field = Some(name.clone());
                }
            }

            inputs.push(FormInput {
                input_type,
                name,
                value,
            });
        }

        forms.push(FormDetails {
            id: attr("id"),
            name: attr("name"),
            action: attr("action"),
            method,
            inputs,
            csrf_field,
        });
    }
    forms
}

/// `<meta name="referrer" content="...">`, used when the document does
/// not expose a policy through script.
pub fn meta_referrer_policy(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let sel = Selector::parse("meta[name]").ok()?;
    document
        .select(&sel)
        .find(|m| {
            m.value()
                .attr("name")
                .map(|n| n.eq_ignore_ascii_case("referrer"))
                .unwrap_or(false)
        })
        .and_then(|m| m.value().attr("content"))
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
}
