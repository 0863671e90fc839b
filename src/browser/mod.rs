//! Browser actor capability set consumed by the probers
//!
//! The probers never talk to an automation product directly; anything
//! implementing [`BrowserActor`] can drive them.

pub mod chrome;
pub mod locate;
pub mod session;

#[cfg(test)]
pub mod mock;

use crate::core::error::ActorError;
use serde::Serialize;

pub use locate::{find_first, Lookup};
pub use session::{BrowserLauncher, BrowserSession};

/// One way of identifying a page element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Locator {
    Css(String),
    XPath(String),
    Name(String),
    Id(String),
}

impl Locator {
    /// CSS form of the locator where one exists.
    pub fn as_css(&self) -> Option<String> {
        match self {
            Locator::Css(s) => Some(s.clone()),
            Locator::Name(n) => Some(format!("[name=\"{}\"]", n.replace('"', "\\\""))),
            Locator::Id(i) => Some(format!("[id=\"{}\"]", i.replace('"', "\\\""))),
            Locator::XPath(_) => None,
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css={}", s),
            Locator::XPath(s) => write!(f, "xpath={}", s),
            Locator::Name(s) => write!(f, "name={}", s),
            Locator::Id(s) => write!(f, "id={}", s),
        }
    }
}

/// Handle to the first element matching `locator`, re-resolved by the
/// actor on every interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef {
    pub locator: Locator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CookieInfo {
    pub name: String,
    pub value: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: Option<SameSite>,
}

pub trait BrowserActor: Send {
    fn navigate(&mut self, url: &str) -> Result<(), ActorError>;

    /// `Ok(None)` when nothing currently matches.
    fn find_element(&mut self, locator: &Locator) -> Result<Option<ElementRef>, ActorError>;

    fn clear(&mut self, element: &ElementRef) -> Result<(), ActorError>;

    fn send_keys(&mut self, element: &ElementRef, text: &str) -> Result<(), ActorError>;

    fn click(&mut self, element: &ElementRef) -> Result<(), ActorError>;

    fn page_source(&mut self) -> Result<String, ActorError>;

    fn cookies(&mut self) -> Result<Vec<CookieInfo>, ActorError>;

    /// Runs a function body (may `return`) in the page.
    fn execute_script(&mut self, script: &str) -> Result<serde_json::Value, ActorError>;

    /// Captures and dismisses a pending native dialog, returning its text.
    fn take_dialog(&mut self) -> Result<Option<String>, ActorError>;

    fn close(&mut self) -> Result<(), ActorError>;
}
