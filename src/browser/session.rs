use crate::browser::BrowserActor;
use crate::core::interrupt::Interrupt;
use std::ops::{Deref, DerefMut};

/// Source of fresh browser actors, one per category.
pub trait BrowserLauncher: Send + Sync {
    fn launch(&self) -> anyhow::Result<Box<dyn BrowserActor>>;
}

/// Scoped browser acquisition: the actor is closed when the session is
/// dropped, on every exit path.
pub struct BrowserSession {
    actor: Box<dyn BrowserActor>,
    interrupt: Interrupt,
    label: &'static str,
}

impl BrowserSession {
    pub fn acquire(
        launcher: &dyn BrowserLauncher,
        interrupt: Interrupt,
        label: &'static str,
    ) -> anyhow::Result<Self> {
        let actor = launcher.launch()?;
        tracing::debug!("[{}] Browser session acquired", label);
        Ok(Self {
            actor,
            interrupt,
            label,
        })
    }

    #[cfg(test)]
    pub fn from_actor(actor: Box<dyn BrowserActor>, interrupt: Interrupt, label: &'static str) -> Self {
        Self {
            actor,
            interrupt,
            label,
        }
    }

    pub fn interrupted(&self) -> bool {
        self.interrupt.is_raised()
    }

    pub fn actor(&mut self) -> &mut dyn BrowserActor {
        self.actor.as_mut()
    }
}

impl Deref for BrowserSession {
    type Target = dyn BrowserActor;

    fn deref(&self) -> &Self::Target {
        self.actor.as_ref()
    }
}

impl DerefMut for BrowserSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.actor.as_mut()
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        match self.actor.close() {
            Ok(()) => tracing::info!("[{}] Browser closed", self.label),
            Err(e) => tracing::warn!("[{}] Error closing browser: {}", self.label, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::mock::{MockActor, MockLauncher};

    #[test]
    fn test_session_closes_on_drop() {
        let actor = MockActor::new("");
        let log = actor.shared_log();
        {
            let _session = BrowserSession::from_actor(Box::new(actor), Interrupt::new(), "test");
        }
        assert!(log.lock().unwrap().closed);
    }

    #[test]
    fn test_session_closes_on_early_error_return() {
        let actor = MockActor::new("").failing_navigation();
        let log = actor.shared_log();

        fn run(mut session: BrowserSession) -> anyhow::Result<()> {
            session.navigate("http://example.test")?;
            Ok(())
        }

        let session = BrowserSession::from_actor(Box::new(actor), Interrupt::new(), "test");
        assert!(run(session).is_err());
        assert!(log.lock().unwrap().closed);
    }

    #[test]
    fn test_acquire_uses_launcher() {
        let launcher = MockLauncher::new(|| MockActor::new(""));
        let interrupt = Interrupt::new();
        let session = BrowserSession::acquire(&launcher, interrupt.clone(), "test").unwrap();
        assert!(!session.interrupted());
        interrupt.raise();
        assert!(session.interrupted());
        assert_eq!(*launcher.launches.lock().unwrap(), 1);
    }
}
