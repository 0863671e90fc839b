use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub status: u16,
    /// Keys are lowercased; repeated headers are joined with ", ".
    pub headers: BTreeMap<String, String>,
    pub final_url: String,
}

impl FetchResponse {
    pub fn new(status: u16, final_url: &str) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            final_url: final_url.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.insert_header(name, value);
        self
    }

    pub fn insert_header(&mut self, name: &str, value: &str) {
        self.headers
            .entry(name.to_ascii_lowercase())
            .and_modify(|v| {
                v.push_str(", ");
                v.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    /// Case-insensitive lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn is_error_status(&self) -> bool {
        self.status >= 400
    }
}
