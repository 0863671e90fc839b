//! Scripted in-memory browser actor for tests

use crate::browser::{BrowserActor, BrowserLauncher, CookieInfo, ElementRef, Locator};
use crate::core::error::ActorError;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

pub type Values = BTreeMap<String, String>;
type Responder = Box<dyn Fn(&Values) -> String + Send>;
type DialogScript = Box<dyn Fn(&Values) -> Option<String> + Send>;

#[derive(Debug, Default)]
pub struct MockLog {
    pub navigations: usize,
    /// Field values at the moment each submit control was clicked.
    pub submissions: Vec<Values>,
    pub clicks: Vec<String>,
    pub closed: bool,
}

pub struct MockActor {
    initial_page: String,
    elements: HashSet<String>,
    submit: Option<String>,
    responder: Option<Responder>,
    dialog: Option<DialogScript>,
    cookies: Vec<CookieInfo>,
    referrer_policy: String,
    fail_navigation: bool,
    page: String,
    values: Values,
    pending_dialog: Option<String>,
    pub log: Arc<Mutex<MockLog>>,
}

fn key(locator: &Locator) -> String {
    match locator {
        Locator::XPath(x) => x.clone(),
        other => other.as_css().unwrap_or_default(),
    }
}

impl MockActor {
    pub fn new(initial_page: &str) -> Self {
        Self {
            initial_page: initial_page.to_string(),
            elements: HashSet::new(),
            submit: None,
            responder: None,
            dialog: None,
            cookies: Vec::new(),
            referrer_policy: String::new(),
            fail_navigation: false,
            page: String::new(),
            values: Values::new(),
            pending_dialog: None,
            log: Arc::new(Mutex::new(MockLog::default())),
        }
    }

    /// Registers an element by its CSS (or XPath) key.
    pub fn with_element(mut self, key: &str) -> Self {
        self.elements.insert(key.to_string());
        self
    }

    /// Registers the submit control; clicking it renders `responder`.
    pub fn with_submit<F>(mut self, key: &str, responder: F) -> Self
    where
        F: Fn(&Values) -> String + Send + 'static,
    {
        self.elements.insert(key.to_string());
        self.submit = Some(key.to_string());
        self.responder = Some(Box::new(responder));
        self
    }

    pub fn with_dialog<F>(mut self, script: F) -> Self
    where
        F: Fn(&Values) -> Option<String> + Send + 'static,
    {
        self.dialog = Some(Box::new(script));
        self
    }

    pub fn with_cookies(mut self, cookies: Vec<CookieInfo>) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn with_referrer_policy(mut self, policy: &str) -> Self {
        self.referrer_policy = policy.to_string();
        self
    }

    pub fn failing_navigation(mut self) -> Self {
        self.fail_navigation = true;
        self
    }

    pub fn shared_log(&self) -> Arc<Mutex<MockLog>> {
        self.log.clone()
    }

    fn require(&self, element: &ElementRef) -> Result<String, ActorError> {
        let k = key(&element.locator);
        if self.elements.contains(&k) {
            Ok(k)
        } else {
            Err(ActorError::Stale(k))
        }
    }
}

impl BrowserActor for MockActor {
    fn navigate(&mut self, _url: &str) -> Result<(), ActorError> {
        if self.fail_navigation {
            return Err(ActorError::Navigation("connection refused".into()));
        }
        if let Ok(mut log) = self.log.lock() {
            log.navigations += 1;
        }
        self.page = self.initial_page.clone();
        self.values.clear();
        self.pending_dialog = None;
        Ok(())
    }

    fn find_element(&mut self, locator: &Locator) -> Result<Option<ElementRef>, ActorError> {
        if self.elements.contains(&key(locator)) {
            Ok(Some(ElementRef {
                locator: locator.clone(),
            }))
        } else {
            Ok(None)
        }
    }

    fn clear(&mut self, element: &ElementRef) -> Result<(), ActorError> {
        let k = self.require(element)?;
        self.values.remove(&k);
        Ok(())
    }

    fn send_keys(&mut self, element: &ElementRef, text: &str) -> Result<(), ActorError> {
        let k = self.require(element)?;
        self.values.entry(k).or_default().push_str(text);
        Ok(())
    }

    fn click(&mut self, element: &ElementRef) -> Result<(), ActorError> {
        let k = self.require(element)?;
        if let Ok(mut log) = self.log.lock() {
            log.clicks.push(k.clone());
        }
        if self.submit.as_deref() == Some(k.as_str()) {
            if let Ok(mut log) = self.log.lock() {
                log.submissions.push(self.values.clone());
            }
            if let Some(responder) = &self.responder {
                self.page = responder(&self.values);
            }
            if let Some(dialog) = &self.dialog {
                self.pending_dialog = dialog(&self.values);
            }
        }
        Ok(())
    }

    fn page_source(&mut self) -> Result<String, ActorError> {
        Ok(self.page.clone())
    }

    fn cookies(&mut self) -> Result<Vec<CookieInfo>, ActorError> {
        Ok(self.cookies.clone())
    }

    fn execute_script(&mut self, script: &str) -> Result<serde_json::Value, ActorError> {
        if script.contains("referrerPolicy") {
            Ok(serde_json::Value::String(self.referrer_policy.clone()))
        } else {
            Ok(serde_json::Value::Null)
        }
    }

    fn take_dialog(&mut self) -> Result<Option<String>, ActorError> {
        Ok(self.pending_dialog.take())
    }

    fn close(&mut self) -> Result<(), ActorError> {
        if let Ok(mut log) = self.log.lock() {
            log.closed = true;
        }
        Ok(())
    }
}

/// Launcher producing a fresh scripted actor per session.
pub struct MockLauncher {
    factory: Box<dyn Fn() -> MockActor + Send + Sync>,
    pub launches: Arc<Mutex<usize>>,
}

impl MockLauncher {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> MockActor + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            launches: Arc::new(Mutex::new(0)),
        }
    }
}

impl BrowserLauncher for MockLauncher {
    fn launch(&self) -> anyhow::Result<Box<dyn BrowserActor>> {
        if let Ok(mut n) = self.launches.lock() {
            *n += 1;
        }
        Ok(Box::new((self.factory)()))
    }
}
