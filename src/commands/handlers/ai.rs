//! AI chat command handler
//!
//! Handles: ai
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Initial release

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, error, info};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::get_string_option;
use crate::core::chunk_for_message;

/// Notice for an `/ai` call whose message is blank
pub const EMPTY_AI_MESSAGE_NOTICE: &str = "Please tell me what you'd like to ask!";

/// Handler for `/ai message:<text>`
pub struct AiHandler;

#[async_trait]
impl SlashCommandHandler for AiHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["ai"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        request_id: Uuid,
    ) -> Result<()> {
        let message = get_string_option(&command.data.options, "message").unwrap_or_default();
        let message = message.trim();
        let channel_id = command.channel_id.to_string();

        if message.is_empty() {
            debug!("[{request_id}] Empty /ai message, sending notice");
            command
                .create_interaction_response(&serenity_ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|data| {
                            data.content(EMPTY_AI_MESSAGE_NOTICE).ephemeral(true)
                        })
                })
                .await?;
            return Ok(());
        }

        // Defer first: the AI call routinely outlives Discord's 3 second window
        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response.kind(InteractionResponseType::DeferredChannelMessageWithSource)
            })
            .await
            .map_err(|e| {
                error!("[{request_id}] Failed to defer interaction response: {e}");
                anyhow::anyhow!("Failed to defer interaction: {}", e)
            })?;
        debug!("[{request_id}] Interaction deferred");

        let reply = ctx.chat.reply(&channel_id, message, request_id).await;
        let chunks = chunk_for_message(&reply);

        let mut pieces = chunks.iter();
        if let Some(first) = pieces.next() {
            command
                .edit_original_interaction_response(&serenity_ctx.http, |response| {
                    response.content(first)
                })
                .await?;
        }
        for piece in pieces {
            command
                .create_followup_message(&serenity_ctx.http, |message| message.content(piece))
                .await?;
        }

        info!(
            "[{request_id}] ✅ /ai answered in channel {channel_id} ({} message(s))",
            chunks.len()
        );
        Ok(())
    }
}
