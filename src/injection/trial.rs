//! One (field, payload) submission cycle

use crate::browser::{find_first, BrowserActor, Lookup};
use crate::config::target::{FieldSpec, NamedField, TargetConfig};
use crate::core::error::ActorError;
use crate::injection::Detector;
use crate::payload::Payload;
use crate::reporting::model::Finding;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Value typed into the other required fields during a trial.
pub const BENIGN_VALUE: &str = "test data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialState {
    Pending,
    Loaded,
    FieldFilled,
    Submitted,
    Evaluated,
}

impl fmt::Display for TrialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrialState::Pending => "pending",
            TrialState::Loaded => "loaded",
            TrialState::FieldFilled => "field_filled",
            TrialState::Submitted => "submitted",
            TrialState::Evaluated => "evaluated",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
#[error("trial stopped in state {state}: {source}")]
pub struct TrialError {
    pub state: TrialState,
    #[source]
    pub source: ActorError,
}

impl TrialError {
    /// Locator-class failures only cost the current trial.
    pub fn is_recoverable(&self) -> bool {
        self.source.is_locator_failure()
    }
}

pub(crate) fn pause(d: Duration) {
    if !d.is_zero() {
        std::thread::sleep(d);
    }
}

pub struct TrialRunner<'a> {
    target: &'a TargetConfig,
}

impl<'a> TrialRunner<'a> {
    pub fn new(target: &'a TargetConfig) -> Self {
        Self { target }
    }

    /// Drives `Loaded -> FieldFilled -> Submitted -> Evaluated`. A failed
    /// transition ends the trial with the state it was leaving.
    pub fn run<D: Detector + ?Sized>(
        &self,
        actor: &mut dyn BrowserActor,
        field: &NamedField,
        payload: &Payload,
        detector: &D,
    ) -> Result<Vec<Finding>, TrialError> {
        let mut state = TrialState::Pending;
        let mut findings = Vec::new();

        while state != TrialState::Evaluated {
            let step = match state {
                TrialState::Pending => self.load(actor).map(|_| TrialState::Loaded),
                TrialState::Loaded => self
                    .fill(actor, field, payload.text)
                    .map(|_| TrialState::FieldFilled),
                TrialState::FieldFilled => self.submit(actor).map(|_| TrialState::Submitted),
                TrialState::Submitted => detector
                    .inspect(actor, &field.name, payload, self.target.url.as_str())
                    .map(|found| {
                        findings = found;
                        TrialState::Evaluated
                    }),
                TrialState::Evaluated => Ok(TrialState::Evaluated),
            };

            state = step.map_err(|source| TrialError { state, source })?;
            tracing::trace!("Trial on '{}' -> {}", field.name, state);
        }

        Ok(findings)
    }

    fn load(&self, actor: &mut dyn BrowserActor) -> Result<(), ActorError> {
        actor.navigate(self.target.url.as_str())?;
        pause(self.target.timing.page_settle());
        Ok(())
    }

    fn locate(
        &self,
        actor: &mut dyn BrowserActor,
        name: &str,
        spec: &FieldSpec,
    ) -> Result<crate::browser::ElementRef, ActorError> {
        match find_first(actor, &spec.locators(), self.target.timing.element_wait())? {
            Lookup::Found(el) => Ok(el),
            Lookup::NotFound => Err(ActorError::NotFound(format!("field '{}'", name))),
        }
    }

    fn fill(
        &self,
        actor: &mut dyn BrowserActor,
        field: &NamedField,
        text: &str,
    ) -> Result<(), ActorError> {
        let el = self.locate(actor, &field.name, &field.spec)?;
        actor.clear(&el)?;
        actor.send_keys(&el, text)?;

        for other in &self.target.fields {
            if other.name == field.name || !other.spec.required {
                continue;
            }
            if let Err(e) = self.fill_benign(actor, other) {
                tracing::warn!("Could not fill required field '{}': {}", other.name, e);
            }
        }
        Ok(())
    }

    fn fill_benign(&self, actor: &mut dyn BrowserActor, field: &NamedField) -> Result<(), ActorError> {
        let el = self.locate(actor, &field.name, &field.spec)?;
        if field.spec.is_checkbox() {
            return actor.click(&el);
        }
        actor.clear(&el)?;
        actor.send_keys(&el, BENIGN_VALUE)
    }

    fn submit(&self, actor: &mut dyn BrowserActor) -> Result<(), ActorError> {
        let Some(spec) = &self.target.submit else {
            return Ok(());
        };
        let el = self.locate(actor, "submit_button", spec)?;
        actor.click(&el)?;
        pause(self.target.timing.page_settle());
        Ok(())
    }
}
