use crate::browser::BrowserActor;
use crate::core::error::ActorError;

/// Text of a native dialog raised by the submission, dismissing it.
pub fn alert_text(actor: &mut dyn BrowserActor) -> Result<Option<String>, ActorError> {
    actor.take_dialog()
}

/// True when the raw payload appears verbatim in the markup. Entity
/// escaping of any character in the payload defeats the match.
pub fn reflected_unescaped(page: &str, payload: &str) -> bool {
    !payload.is_empty() && page.contains(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbatim_reflection_is_flagged() {
        let payload = "\"><script>alert(1)</script>";
        let page = format!("<input value=\"{}\">", payload);
        assert!(reflected_unescaped(&page, payload));
    }

    #[test]
    fn test_entity_escaped_reflection_is_not_flagged() {
        let payload = "\"><script>alert(1)</script>";
        let page = "<input value=\"&quot;&gt;&lt;script&gt;alert(1)&lt;/script&gt;\">";
        assert!(!reflected_unescaped(page, payload));
    }

    #[test]
    fn test_empty_payload_never_matches() {
        assert!(!reflected_unescaped("anything", ""));
    }
}
