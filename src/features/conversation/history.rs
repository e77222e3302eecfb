//! Per-channel conversation state with a bounded turn history

use serde::{Deserialize, Serialize};

/// Acknowledgement recorded as the model's answer to the system instruction
pub const SYSTEM_ACKNOWLEDGEMENT: &str = "Understood. I will stay in this role.";

/// Number of turns occupied by the system instruction and its acknowledgement
pub const SYSTEM_TURNS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Turn {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Turn {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Total turn bound for `max_exchanges` user/model pairs plus the system pair
pub fn turn_limit(max_exchanges: usize) -> usize {
    SYSTEM_TURNS + max_exchanges * 2
}

/// Conversation history for one channel, tied to the persona that started it.
///
/// The first two turns are always the persona's instruction and
/// [`SYSTEM_ACKNOWLEDGEMENT`]; [`Conversation::trim`] never touches them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    persona_id: String,
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new(persona_id: impl Into<String>, system_instruction: impl Into<String>) -> Self {
        Conversation {
            persona_id: persona_id.into(),
            turns: vec![
                Turn::user(system_instruction),
                Turn::model(SYSTEM_ACKNOWLEDGEMENT),
            ],
        }
    }

    pub fn persona_id(&self) -> &str {
        &self.persona_id
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Turns after the system pair
    pub fn exchanges(&self) -> &[Turn] {
        &self.turns[SYSTEM_TURNS..]
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::user(text));
    }

    pub fn push_model(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::model(text));
    }

    /// Evict the oldest exchange turns until at most `max_turns` remain.
    ///
    /// Turns leave in user/model pairs so the history keeps alternating roles;
    /// with an odd overflow one extra turn goes. Returns how many turns were dropped.
    pub fn trim(&mut self, max_turns: usize) -> usize {
        let max_turns = max_turns.max(SYSTEM_TURNS);
        if self.turns.len() <= max_turns {
            return 0;
        }

        let overflow = self.turns.len() - max_turns;
        let evict = (overflow + overflow % 2).min(self.turns.len() - SYSTEM_TURNS);
        self.turns.drain(SYSTEM_TURNS..SYSTEM_TURNS + evict);
        evict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(exchanges: usize) -> Conversation {
        let mut conversation = Conversation::new("nexus", "be helpful");
        for i in 0..exchanges {
            conversation.push_user(format!("q{i}"));
            conversation.push_model(format!("a{i}"));
        }
        conversation
    }

    #[test]
    fn test_new_starts_with_system_pair() {
        let conversation = Conversation::new("nexus", "be helpful");
        assert_eq!(conversation.persona_id(), "nexus");
        assert_eq!(
            conversation.turns(),
            &[Turn::user("be helpful"), Turn::model(SYSTEM_ACKNOWLEDGEMENT)]
        );
        assert!(conversation.exchanges().is_empty());
    }

    #[test]
    fn test_turn_limit() {
        assert_eq!(turn_limit(10), 22);
        assert_eq!(turn_limit(0), 2);
    }

    #[test]
    fn test_trim_under_limit_is_noop() {
        let mut conversation = filled(3);
        assert_eq!(conversation.trim(turn_limit(10)), 0);
        assert_eq!(conversation.len(), 8);
    }

    #[test]
    fn test_trim_drops_oldest_pairs() {
        let mut conversation = filled(5);
        let dropped = conversation.trim(turn_limit(3));

        assert_eq!(dropped, 4);
        assert_eq!(conversation.len(), turn_limit(3));
        assert_eq!(conversation.turns()[0], Turn::user("be helpful"));
        assert_eq!(conversation.exchanges()[0], Turn::user("q2"));
        assert_eq!(conversation.exchanges().last(), Some(&Turn::model("a4")));
    }

    #[test]
    fn test_trim_with_pending_user_turn_keeps_alternation() {
        let mut conversation = filled(2);
        conversation.push_user("q2");
        // 7 turns against a bound of 6: the whole oldest pair goes
        assert_eq!(conversation.trim(turn_limit(2)), 2);
        assert_eq!(conversation.len(), 5);
        assert_eq!(conversation.exchanges()[0].role, Role::User);
        assert_eq!(conversation.exchanges().last(), Some(&Turn::user("q2")));

        conversation.push_model("a2");
        assert_eq!(conversation.len(), turn_limit(2));
    }

    #[test]
    fn test_trim_never_evicts_system_pair() {
        let mut conversation = filled(4);
        conversation.trim(0);
        assert_eq!(conversation.len(), SYSTEM_TURNS);
        assert_eq!(conversation.turns()[1], Turn::model(SYSTEM_ACKNOWLEDGEMENT));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Turn::model("hi")).unwrap();
        assert_eq!(json, r#"{"role":"model","text":"hi"}"#);
    }
}
