//! The `matches` claim predicate

use sidecar_protocol::{MatchesParams, MatchesResult};

use crate::registry;

/// Decide whether this plugin claims the message.
///
/// The text is trimmed and then checked against the registry's command
/// prefixes. This is deliberately prefix matching, not token matching:
/// `/echoXYZ` claims `/echo`'s prefix too, preserving the behavior hosts
/// already rely on. Pure function, no side effects.
pub fn matches(params: &MatchesParams) -> MatchesResult {
    let text = params.text.trim();
    let matches = registry::command_prefixes()
        .iter()
        .any(|prefix| text.starts_with(prefix.as_str()));
    MatchesResult { matches }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(text: &str) -> MatchesParams {
        MatchesParams {
            text: text.to_string(),
            message_type: "private".to_string(),
            user_id: None,
            group_id: None,
        }
    }

    #[test]
    fn test_exact_commands_match() {
        for text in ["/ping", "/echo hi", "/time", "/now", "/help", "/?"] {
            assert!(matches(&params(text)).matches, "{text} should match");
        }
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert!(matches(&params("  /ping  ")).matches);
    }

    #[test]
    fn test_prefix_only_still_matches() {
        // Loose prefix policy: trailing characters do not break the claim.
        assert!(matches(&params("/pingx")).matches);
        assert!(matches(&params("/echoXYZ")).matches);
    }

    #[test]
    fn test_non_commands_do_not_match() {
        assert!(!matches(&params("ping")).matches);
        assert!(!matches(&params("/unknown")).matches);
        assert!(!matches(&params("hello /ping")).matches);
        assert!(!matches(&params("")).matches);
    }
}
