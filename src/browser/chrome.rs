use crate::browser::{BrowserActor, BrowserLauncher, CookieInfo, ElementRef, Locator, SameSite};
use crate::core::error::ActorError;
use headless_chrome::protocol::cdp::types::Event;
use headless_chrome::protocol::cdp::Network::CookieSameSite;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Launches a local Chrome/Chromium per session.
#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    pub headless: bool,
    pub idle_timeout: Duration,
}

impl Default for ChromeLauncher {
    fn default() -> Self {
        Self {
            headless: true,
            idle_timeout: Duration::from_secs(120),
        }
    }
}

impl BrowserLauncher for ChromeLauncher {
    fn launch(&self) -> anyhow::Result<Box<dyn BrowserActor>> {
        let browser = Browser::new(
            LaunchOptions::default_builder()
                .headless(self.headless)
                .idle_browser_timeout(self.idle_timeout)
                .build()
                .map_err(|e| anyhow::anyhow!("Browser launch options error: {}", e))?,
        )
        .map_err(|e| anyhow::anyhow!("Failed to launch Chrome/Chromium: {}", e))?;

        let tab = browser
            .new_tab()
            .map_err(|e| anyhow::anyhow!("Failed to create new tab: {}", e))?;

        let dialog = Arc::new(Mutex::new(None));
        let sink = dialog.clone();
        tab.add_event_listener(Arc::new(move |event: &Event| {
            if let Event::PageJavascriptDialogOpening(opening) = event {
                if let Ok(mut slot) = sink.lock() {
                    *slot = Some(opening.params.message.clone());
                }
            }
        }))
        .map_err(|e| anyhow::anyhow!("Failed to attach dialog listener: {}", e))?;

        tracing::debug!("Chrome launched (headless={})", self.headless);
        Ok(Box::new(ChromeActor {
            _browser: browser,
            tab,
            dialog,
        }))
    }
}

pub struct ChromeActor {
    _browser: Browser,
    tab: Arc<Tab>,
    dialog: Arc<Mutex<Option<String>>>,
}

fn classify(context: &str, err: anyhow::Error) -> ActorError {
    let msg = format!("{}: {}", context, err);
    let lower = msg.to_lowercase();
    if lower.contains("no element") || lower.contains("could not find node") {
        ActorError::NotFound(msg)
    } else if lower.contains("not interactable") || lower.contains("not visible") {
        ActorError::NotInteractable(msg)
    } else if lower.contains("detached") || lower.contains("no node with given id") {
        ActorError::Stale(msg)
    } else if lower.contains("timeout") || lower.contains("timed out") {
        ActorError::Timeout(Duration::ZERO)
    } else if lower.contains("closed") || lower.contains("connection") {
        ActorError::Session(msg)
    } else {
        ActorError::Navigation(msg)
    }
}

impl ChromeActor {
    fn resolve(&self, locator: &Locator) -> Result<Element<'_>, ActorError> {
        let found = match locator {
            Locator::XPath(x) => self.tab.find_element_by_xpath(x),
            other => match other.as_css() {
                Some(css) => self.tab.find_element(&css),
                None => return Err(ActorError::NotFound(other.to_string())),
            },
        };
        found.map_err(|e| classify(&locator.to_string(), e))
    }
}

impl BrowserActor for ChromeActor {
    fn navigate(&mut self, url: &str) -> Result<(), ActorError> {
        if let Ok(mut slot) = self.dialog.lock() {
            *slot = None;
        }
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map(|_| ())
            .map_err(|e| ActorError::Navigation(format!("{}: {}", url, e)))
    }

    fn find_element(&mut self, locator: &Locator) -> Result<Option<ElementRef>, ActorError> {
        match self.resolve(locator) {
            Ok(_) => Ok(Some(ElementRef {
                locator: locator.clone(),
            })),
            Err(e) if e.is_locator_failure() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn clear(&mut self, element: &ElementRef) -> Result<(), ActorError> {
        let el = self.resolve(&element.locator)?;
        el.call_js_fn("function() { this.value = ''; }", vec![], false)
            .map(|_| ())
            .map_err(|e| classify("clear", e))
    }

    fn send_keys(&mut self, element: &ElementRef, text: &str) -> Result<(), ActorError> {
        let el = self.resolve(&element.locator)?;
        el.click().map_err(|e| classify("focus", e))?;
        el.type_into(text)
            .map(|_| ())
            .map_err(|e| classify("type", e))
    }

    fn click(&mut self, element: &ElementRef) -> Result<(), ActorError> {
        let el = self.resolve(&element.locator)?;
        el.click().map(|_| ()).map_err(|e| classify("click", e))
    }

    fn page_source(&mut self) -> Result<String, ActorError> {
        self.tab
            .get_content()
            .map_err(|e| ActorError::Session(format!("page source: {}", e)))
    }

    fn cookies(&mut self) -> Result<Vec<CookieInfo>, ActorError> {
        let cookies = self
            .tab
            .get_cookies()
            .map_err(|e| ActorError::Session(format!("cookies: {}", e)))?;

        Ok(cookies
            .into_iter()
            .map(|c| CookieInfo {
                name: c.name,
                value: c.value,
                secure: c.secure,
                http_only: c.http_only,
                same_site: c.same_site.map(|s| match s {
                    CookieSameSite::Strict => SameSite::Strict,
                    CookieSameSite::Lax => SameSite::Lax,
                    CookieSameSite::None => SameSite::None,
                }),
            })
            .collect())
    }

    fn execute_script(&mut self, script: &str) -> Result<serde_json::Value, ActorError> {
        let wrapped = format!("(function() {{ {} }})()", script);
        let result = self
            .tab
            .evaluate(&wrapped, false)
            .map_err(|e| ActorError::Session(format!("script: {}", e)))?;
        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    fn take_dialog(&mut self) -> Result<Option<String>, ActorError> {
        let message = self.dialog.lock().ok().and_then(|mut slot| slot.take());
        if message.is_some() {
            if let Err(e) = self.tab.get_dialog().accept(None) {
                tracing::debug!("Dialog dismiss failed: {}", e);
            }
        }
        Ok(message)
    }

    fn close(&mut self) -> Result<(), ActorError> {
        self.tab
            .close(false)
            .map(|_| ())
            .map_err(|e| ActorError::Session(format!("close: {}", e)))
    }
}
