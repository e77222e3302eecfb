//! Plain-message triggers: `!ai <text>` and @mentions
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Prefix and mention detection

use log::error;
use regex::Regex;
use std::sync::OnceLock;

/// Notice sent when a trigger carries no question
pub const EMPTY_MESSAGE_NOTICE: &str = "Please add your question after `!ai` or the mention!";

fn mention_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| match Regex::new(r"<@!?\d+>") {
            Ok(re) => Some(re),
            Err(e) => {
                error!("Invalid mention pattern: {e}");
                None
            }
        })
        .as_ref()
}

/// How a plain message asked for the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageTrigger {
    Mention(String),
    Prefix(String),
}

impl MessageTrigger {
    /// The user's text with the trigger removed (may be empty)
    pub fn text(&self) -> &str {
        match self {
            MessageTrigger::Mention(text) | MessageTrigger::Prefix(text) => text,
        }
    }
}

/// Detect a trigger in `content`. Mentions win over the prefix; the prefix
/// match ignores ASCII case.
pub fn parse_trigger(content: &str, mentions_bot: bool, prefix: &str) -> Option<MessageTrigger> {
    if mentions_bot {
        let text = match mention_pattern() {
            Some(re) => re.replace_all(content, "").into_owned(),
            None => content.to_string(),
        };
        return Some(MessageTrigger::Mention(text.trim().to_string()));
    }

    if prefix.is_empty() {
        return None;
    }

    let head = content.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(MessageTrigger::Prefix(content[prefix.len()..].trim().to_string()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_trigger() {
        assert_eq!(
            parse_trigger("!ai hello there", false, "!ai "),
            Some(MessageTrigger::Prefix("hello there".to_string()))
        );
    }

    #[test]
    fn test_prefix_is_case_insensitive() {
        let trigger = parse_trigger("!AI What time is it?", false, "!ai ").unwrap();
        assert_eq!(trigger.text(), "What time is it?");
    }

    #[test]
    fn test_prefix_requires_separator() {
        assert_eq!(parse_trigger("!aihello", false, "!ai "), None);
        assert_eq!(parse_trigger("hello !ai there", false, "!ai "), None);
        assert_eq!(parse_trigger("!a", false, "!ai "), None);
    }

    #[test]
    fn test_prefix_with_only_whitespace_is_empty() {
        let trigger = parse_trigger("!ai    ", false, "!ai ").unwrap();
        assert_eq!(trigger.text(), "");
    }

    #[test]
    fn test_mention_strips_every_mention() {
        let trigger = parse_trigger("<@123> hi <@!456> friend", true, "!ai ").unwrap();
        assert_eq!(trigger, MessageTrigger::Mention("hi  friend".to_string()));
    }

    #[test]
    fn test_mention_wins_over_prefix() {
        let trigger = parse_trigger("!ai <@123> hey", true, "!ai ").unwrap();
        assert!(matches!(trigger, MessageTrigger::Mention(_)));
        assert_eq!(trigger.text(), "!ai  hey");
    }

    #[test]
    fn test_mention_pattern_compiles() {
        assert!(mention_pattern().is_some());
    }

    #[test]
    fn test_bare_mention_is_empty() {
        let trigger = parse_trigger("<@123>", true, "!ai ").unwrap();
        assert_eq!(trigger.text(), "");
    }

    #[test]
    fn test_multibyte_content_does_not_panic() {
        assert_eq!(parse_trigger("你好", false, "!ai "), None);
        assert_eq!(
            parse_trigger("!ai 你好", false, "!ai "),
            Some(MessageTrigger::Prefix("你好".to_string()))
        );
    }
}
