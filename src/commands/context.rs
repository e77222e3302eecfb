//! Shared context for command handlers
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with persona registry and chat service

use std::sync::Arc;

use crate::features::chat::ChatService;
use crate::features::personas::PersonaRegistry;

/// Shared context for all command handlers
///
/// Holds the services every handler reaches for:
/// - PersonaRegistry for persona lookup and channel assignments
/// - ChatService for relaying turns to the AI gateway
/// - The plain-text trigger prefix
#[derive(Clone)]
pub struct CommandContext {
    pub registry: Arc<PersonaRegistry>,
    pub chat: ChatService,
    pub trigger_prefix: String,
}

impl CommandContext {
    pub fn new(chat: ChatService, trigger_prefix: impl Into<String>) -> Self {
        Self {
            registry: chat.registry().clone(),
            chat,
            trigger_prefix: trigger_prefix.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_context_clone() {
        fn assert_clone<T: Clone + Send + Sync>() {}
        assert_clone::<CommandContext>();
    }
}
