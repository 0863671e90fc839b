//! Repeated form submission with synthetic data

pub mod data;

use crate::browser::{find_first, BrowserLauncher, BrowserSession, Lookup};
use crate::config::target::TargetConfig;
use crate::core::error::ActorError;
use crate::core::interrupt::Interrupt;
use crate::injection::trial::pause;
use data::{FieldAction, Identity};
use rand::Rng;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmitStats {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

pub struct Submitter<'a> {
    target: &'a TargetConfig,
    launcher: &'a dyn BrowserLauncher,
    interrupt: Interrupt,
}

impl<'a> Submitter<'a> {
    pub fn new(target: &'a TargetConfig, launcher: &'a dyn BrowserLauncher, interrupt: Interrupt) -> Self {
        Self {
            target,
            launcher,
            interrupt,
        }
    }

    /// `rounds == 0` keeps submitting until interrupted. Individual
    /// failures are counted, never returned.
    pub fn run(&self, rounds: usize) -> SubmitStats {
        let mut stats = SubmitStats::default();
        let mut rng = rand::rng();

        tracing::info!("Starting form submission mode for '{}'", self.target.name);
        tracing::info!(
            "Interval: {}-{} seconds, target: {}",
            self.target.timing.min_interval,
            self.target.timing.max_interval,
            self.target.url
        );

        loop {
            if self.interrupt.is_raised() {
                tracing::info!("Interrupt detected, stopping submissions");
                break;
            }

            stats.attempted += 1;
            tracing::info!("Starting submission #{}", stats.attempted);
            match self.submit_once(&mut rng) {
                Ok(filled) => {
                    stats.succeeded += 1;
                    tracing::info!("✓ Form submitted successfully ({} fields filled)", filled);
                }
                Err(e) => {
                    stats.failed += 1;
                    tracing::error!("✗ Submission #{} failed: {:#}", stats.attempted, e);
                }
            }
            tracing::info!(
                "Submission stats - Total: {}, Success: {}, Failures: {}",
                stats.attempted,
                stats.succeeded,
                stats.failed
            );

            if rounds != 0 && stats.attempted >= rounds {
                break;
            }

            let wait = self.next_interval(&mut rng);
            tracing::info!("Sleeping for {} seconds before next submission", wait.as_secs());
            self.sleep(wait);
        }

        tracing::info!(
            "Form submission completed. Total submissions: {}, Successful: {}, Failed: {}",
            stats.attempted,
            stats.succeeded,
            stats.failed
        );
        stats
    }

    /// One fresh browser per submission. Returns how many fields were filled.
    fn submit_once<R: Rng + ?Sized>(&self, rng: &mut R) -> anyhow::Result<usize> {
        let mut session = BrowserSession::acquire(self.launcher, self.interrupt.clone(), "submit")?;
        let timing = &self.target.timing;

        tracing::info!("Navigating to {}", self.target.url);
        session.navigate(self.target.url.as_str())?;
        pause(timing.page_settle());

        let identity = Identity::generate(rng);
        let mut filled = 0;
        for field in &self.target.fields {
            let action = data::action_for(field, &identity, rng);
            match fill(session.actor(), field, &action, timing.element_wait()) {
                Ok(()) => {
                    filled += 1;
                    tracing::info!("Filled {}: {}", field.name, describe(&action));
                }
                Err(e) if field.spec.required => {
                    tracing::warn!("Failed to fill required field '{}': {}", field.name, e)
                }
                Err(e) => tracing::info!("Skipped optional field '{}': {}", field.name, e),
            }
        }
        if filled == 0 && !self.target.fields.is_empty() {
            anyhow::bail!("failed to fill any fields, possible configuration issue");
        }

        let Some(submit) = &self.target.submit else {
            anyhow::bail!("no submit button defined in configuration");
        };
        let element = match find_first(session.actor(), &submit.locators(), timing.element_wait())? {
            Lookup::Found(el) => el,
            Lookup::NotFound => anyhow::bail!("submit button not found"),
        };
        session.click(&element)?;
        pause(timing.page_settle());
        Ok(filled)
    }

    fn next_interval<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let t = &self.target.timing;
        let (lo, hi) = if t.min_interval <= t.max_interval {
            (t.min_interval, t.max_interval)
        } else {
            (t.max_interval, t.min_interval)
        };
        Duration::from_secs(rng.random_range(lo..=hi))
    }

    /// Sleeps in short slices so an interrupt cuts the wait short.
    fn sleep(&self, total: Duration) {
        let slice = Duration::from_millis(250);
        let mut left = total;
        while !left.is_zero() && !self.interrupt.is_raised() {
            let step = left.min(slice);
            std::thread::sleep(step);
            left -= step;
        }
    }
}

fn fill(
    actor: &mut dyn crate::browser::BrowserActor,
    field: &crate::config::target::NamedField,
    action: &FieldAction,
    wait: Duration,
) -> Result<(), ActorError> {
    let el = match find_first(actor, &field.spec.locators(), wait)? {
        Lookup::Found(el) => el,
        Lookup::NotFound => return Err(ActorError::NotFound(format!("field '{}'", field.name))),
    };
    match action {
        FieldAction::Click => actor.click(&el),
        FieldAction::Type(value) => {
            actor.clear(&el)?;
            actor.send_keys(&el, value)
        }
    }
}

fn describe(action: &FieldAction) -> &str {
    match action {
        FieldAction::Click => "<clicked>",
        FieldAction::Type(v) => v,
    }
}
