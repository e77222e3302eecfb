//! Command name -> handler dispatch table
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation for handler dispatch

use anyhow::Result;
use log::warn;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::context::CommandContext;
use super::handler::SlashCommandHandler;
use super::handlers::create_all_handlers;

#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: HashMap<&'static str, Arc<dyn SlashCommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-filled with every handler the bot ships
    pub fn with_default_handlers() -> Self {
        let mut registry = Self::new();
        for handler in create_all_handlers() {
            registry.register(handler);
        }
        registry
    }

    /// Register `handler` under each of its command names, replacing earlier registrations
    pub fn register(&mut self, handler: Arc<dyn SlashCommandHandler>) {
        for &name in handler.command_names() {
            if self.handlers.insert(name, Arc::clone(&handler)).is_some() {
                warn!("Command /{name} registered twice, keeping the latest handler");
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SlashCommandHandler>> {
        self.handlers.get(name).cloned()
    }

    /// Number of registered command names
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Run the handler for the interaction's command.
    ///
    /// Returns `Ok(false)` when no handler is registered for that name.
    pub async fn dispatch(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        request_id: Uuid,
    ) -> Result<bool> {
        match self.get(&command.data.name) {
            Some(handler) => {
                handler.handle(ctx, serenity_ctx, command, request_id).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NamedHandler(&'static [&'static str]);

    #[async_trait]
    impl SlashCommandHandler for NamedHandler {
        fn command_names(&self) -> &'static [&'static str] {
            self.0
        }

        async fn handle(
            &self,
            _ctx: Arc<CommandContext>,
            _serenity_ctx: &Context,
            _command: &ApplicationCommandInteraction,
            _request_id: Uuid,
        ) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.handler_count(), 0);
        assert!(registry.get("ai").is_none());
    }

    #[test]
    fn test_handler_registered_under_each_name() {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(NamedHandler(&["one", "two"])));

        assert_eq!(registry.handler_count(), 2);
        assert!(registry.get("one").is_some());
        assert!(registry.get("two").is_some());
        assert!(registry.get("three").is_none());
    }

    #[test]
    fn test_later_registration_wins() {
        let mut registry = CommandRegistry::new();
        let first: Arc<dyn SlashCommandHandler> = Arc::new(NamedHandler(&["ai"]));
        let second: Arc<dyn SlashCommandHandler> = Arc::new(NamedHandler(&["ai"]));
        registry.register(first.clone());
        registry.register(second.clone());

        assert_eq!(registry.handler_count(), 1);
        assert!(Arc::ptr_eq(&registry.get("ai").unwrap(), &second));
    }

    #[test]
    fn test_default_handlers_cover_bot_commands() {
        let registry = CommandRegistry::with_default_handlers();
        assert!(registry.get("ai").is_some());
        assert!(registry.get("persona").is_some());
        assert_eq!(registry.handler_count(), 2);
    }
}
