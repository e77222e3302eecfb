use crate::commands::autocomplete::handle_autocomplete;
use crate::commands::context::CommandContext;
use crate::commands::registry::CommandRegistry;
use crate::commands::triggers::{parse_trigger, MessageTrigger, EMPTY_MESSAGE_NOTICE};
use crate::core::chunk_for_message;
use anyhow::Result;
use log::{debug, info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::autocomplete::AutocompleteInteraction;
use serenity::model::channel::Message;
use serenity::model::id::UserId;
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct CommandHandler {
    ctx: Arc<CommandContext>,
    registry: CommandRegistry,
}

/// Whether a plain message should be looked at for triggers at all
pub fn is_candidate(author_is_bot: bool, mentions_everyone: bool) -> bool {
    !author_is_bot && !mentions_everyone
}

/// Whether the bot is among the message's user mentions
pub fn mentions_user(mentions: &[UserId], bot_id: UserId) -> bool {
    mentions.contains(&bot_id)
}

impl CommandHandler {
    pub fn new(ctx: CommandContext) -> Self {
        Self::with_registry(ctx, CommandRegistry::with_default_handlers())
    }

    pub fn with_registry(ctx: CommandContext, registry: CommandRegistry) -> Self {
        info!("🧩 {} slash command handlers registered", registry.handler_count());
        CommandHandler {
            ctx: Arc::new(ctx),
            registry,
        }
    }

    pub fn context(&self) -> &Arc<CommandContext> {
        &self.ctx
    }

    pub async fn handle_message(&self, ctx: &Context, msg: &Message) -> Result<()> {
        if !is_candidate(msg.author.bot, msg.mention_everyone) {
            return Ok(());
        }

        let bot_id = ctx.cache.current_user_id();
        let mention_ids: Vec<UserId> = msg.mentions.iter().map(|user| user.id).collect();
        let mentions_bot = mentions_user(&mention_ids, bot_id);

        let Some(trigger) = parse_trigger(&msg.content, mentions_bot, &self.ctx.trigger_prefix)
        else {
            return Ok(());
        };

        let request_id = Uuid::new_v4();
        let channel_id = msg.channel_id.to_string();
        let source = match trigger {
            MessageTrigger::Mention(_) => "mention",
            MessageTrigger::Prefix(_) => "prefix",
        };
        info!(
            "[{}] 📥 Message trigger ({source}) | User: {} | Channel: {} | Content: '{}'",
            request_id,
            msg.author.id,
            channel_id,
            trigger.text().chars().take(100).collect::<String>()
        );

        if trigger.text().is_empty() {
            debug!("[{request_id}] ℹ️ Trigger without a question, sending notice");
            msg.reply(&ctx.http, EMPTY_MESSAGE_NOTICE).await?;
            return Ok(());
        }

        debug!("[{request_id}] ⌨️ Starting typing indicator");
        let typing = msg.channel_id.start_typing(&ctx.http)?;

        let reply = self
            .ctx
            .chat
            .reply(&channel_id, trigger.text(), request_id)
            .await;
        let chunks = chunk_for_message(&reply);

        typing.stop();
        debug!("[{request_id}] ⌨️ Stopped typing indicator");

        let mut pieces = chunks.iter();
        if let Some(first) = pieces.next() {
            msg.reply(&ctx.http, first).await?;
        }
        for piece in pieces {
            msg.channel_id.say(&ctx.http, piece).await?;
        }

        info!(
            "[{request_id}] ✅ Message processing completed ({} message(s))",
            chunks.len()
        );
        Ok(())
    }

    pub async fn handle_slash_command(
        &self,
        ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let request_id = Uuid::new_v4();
        let guild_id = command
            .guild_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "DM".to_string());

        info!(
            "[{}] 📥 Slash command received | Command: {} | User: {} | Channel: {} | Guild: {}",
            request_id, command.data.name, command.user.id, command.channel_id, guild_id
        );

        let handled = self
            .registry
            .dispatch(Arc::clone(&self.ctx), ctx, command, request_id)
            .await?;

        if !handled {
            warn!(
                "[{request_id}] ⚠️ Unknown slash command: {}",
                command.data.name
            );
        }
        Ok(())
    }

    pub async fn handle_autocomplete(
        &self,
        ctx: &Context,
        interaction: &AutocompleteInteraction,
    ) -> Result<()> {
        let request_id = Uuid::new_v4();
        handle_autocomplete(&self.ctx, ctx, interaction, request_id).await
    }
}
