use crate::browser::{BrowserActor, ElementRef, Locator};
use crate::core::error::ActorError;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const ID_LOOKUP_WAIT: Duration = Duration::from_secs(1);

/// Outcome of a locator search. Not finding anything is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(ElementRef),
    NotFound,
}

impl Lookup {
    pub fn element(self) -> Option<ElementRef> {
        match self {
            Lookup::Found(el) => Some(el),
            Lookup::NotFound => None,
        }
    }
}

/// Polls `probe` until it yields a value or `timeout` elapses. The probe
/// always runs at least once. Locator-class errors count as "not yet";
/// anything else is returned immediately.
pub fn wait_until<T, F>(timeout: Duration, mut probe: F) -> Result<Option<T>, ActorError>
where
    F: FnMut() -> Result<Option<T>, ActorError>,
{
    let start = Instant::now();
    loop {
        match probe() {
            Ok(Some(v)) => return Ok(Some(v)),
            Ok(None) => {}
            Err(e) if e.is_locator_failure() => {
                tracing::trace!("wait_until probe: {}", e);
            }
            Err(e) => return Err(e),
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Ok(None);
        }
        std::thread::sleep(POLL_INTERVAL.min(timeout - elapsed));
    }
}

/// Tries each strategy in order; the first match wins.
pub fn find_first(
    actor: &mut dyn BrowserActor,
    locators: &[Locator],
    timeout: Duration,
) -> Result<Lookup, ActorError> {
    for locator in locators {
        let wait = match locator {
            Locator::Id(_) => timeout.min(ID_LOOKUP_WAIT),
            _ => timeout,
        };

        tracing::debug!("Looking up element by {}", locator);
        if let Some(el) = wait_until(wait, || actor.find_element(locator))? {
            return Ok(Lookup::Found(el));
        }
        tracing::debug!("Element not found by {}", locator);
    }

    Ok(Lookup::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::mock::MockActor;

    #[test]
    fn test_wait_until_runs_once_with_zero_timeout() {
        let mut calls = 0;
        let out: Option<()> = wait_until(Duration::ZERO, || {
            calls += 1;
            Ok(None)
        })
        .unwrap();
        assert!(out.is_none());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_wait_until_swallows_locator_errors() {
        let mut calls = 0;
        let out = wait_until(Duration::from_millis(600), || {
            calls += 1;
            if calls < 2 {
                Err(ActorError::NotFound("x".into()))
            } else {
                Ok(Some(calls))
            }
        })
        .unwrap();
        assert_eq!(out, Some(2));
    }

    #[test]
    fn test_wait_until_propagates_session_errors() {
        let out: Result<Option<()>, _> =
            wait_until(Duration::from_secs(5), || Err(ActorError::Session("gone".into())));
        assert!(matches!(out, Err(ActorError::Session(_))));
    }

    #[test]
    fn test_find_first_falls_back_to_name() {
        let mut actor = MockActor::new("<form></form>").with_element("[name=\"email\"]");
        let locators = vec![
            Locator::Css("#missing".to_string()),
            Locator::Name("email".to_string()),
        ];
        let found = find_first(&mut actor, &locators, Duration::ZERO).unwrap();
        assert_eq!(
            found,
            Lookup::Found(ElementRef {
                locator: Locator::Name("email".to_string())
            })
        );
    }

    #[test]
    fn test_find_first_not_found_is_not_an_error() {
        let mut actor = MockActor::new("");
        let found = find_first(&mut actor, &[Locator::Css("#nope".into())], Duration::ZERO).unwrap();
        assert_eq!(found, Lookup::NotFound);
    }
}
