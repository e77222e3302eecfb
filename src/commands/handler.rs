//! Slash command handler trait
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation for modular command handling

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

use super::context::CommandContext;

/// A handler for one or more top-level slash commands.
///
/// Handlers are registered with a [`CommandRegistry`](super::CommandRegistry)
/// under every name from [`command_names`](SlashCommandHandler::command_names).
#[async_trait]
pub trait SlashCommandHandler: Send + Sync {
    fn command_names(&self) -> &'static [&'static str];

    /// Handle the interaction. The handler owns the interaction response:
    /// returning `Err` means nothing useful was sent yet.
    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        request_id: Uuid,
    ) -> Result<()>;
}
