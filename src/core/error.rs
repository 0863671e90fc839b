//! Typed error taxonomy
//!
//! Configuration errors abort the run. Actor errors are scoped to the
//! trial or category that raised them.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid JSON in configuration file {path}: {reason}")]
    InvalidJson { path: String, reason: String },

    #[error("Configuration '{name}' not found (available: {available})")]
    UnknownConfig { name: String, available: String },

    #[error("No URL specified in configuration")]
    MissingUrl,

    #[error("Invalid target URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("No fillable fields defined in configuration")]
    NoFields,

    #[error("Field '{0}' has an empty selector")]
    EmptySelector(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Failures raised by a browser actor.
#[derive(Error, Debug)]
pub enum ActorError {
    #[error("Element not found: {0}")]
    NotFound(String),

    #[error("Element not interactable: {0}")]
    NotInteractable(String),

    #[error("Stale element reference: {0}")]
    Stale(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Browser session error: {0}")]
    Session(String),
}

impl ActorError {
    /// Locator-class failures only end the current trial.
    pub fn is_locator_failure(&self) -> bool {
        matches!(
            self,
            ActorError::NotFound(_)
                | ActorError::NotInteractable(_)
                | ActorError::Stale(_)
                | ActorError::Timeout(_)
        )
    }
}
