use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::async_trait;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;

use cogito::commands::{
    register_global_commands, register_guild_commands, CommandContext, CommandHandler,
};
use cogito::core::{AiProvider, Config};
use cogito::features::ai::gateway_from_config;
use cogito::features::chat::{ChatService, FALLBACK_REPLY};
use cogito::features::conversation::ConversationCache;
use cogito::features::personas::PersonaRegistry;

struct Handler {
    command_handler: Arc<CommandHandler>,
    guild_id: Option<GuildId>,
}

impl Handler {
    fn new(command_handler: CommandHandler, guild_id: Option<GuildId>) -> Self {
        Handler {
            command_handler: Arc::new(command_handler),
            guild_id,
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        if let Err(e) = self.command_handler.handle_message(&ctx, &msg).await {
            error!("Error handling message: {e:#}");
            if let Err(why) = msg.channel_id.say(&ctx.http, FALLBACK_REPLY).await {
                error!("Failed to send error message: {why}");
            }
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);

        let registration = match self.guild_id {
            Some(guild_id) => register_guild_commands(&ctx, guild_id).await,
            None => register_global_commands(&ctx).await,
        };
        if let Err(e) = registration {
            error!("❌ Failed to register slash commands: {e:#}");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::ApplicationCommand(command) => {
                if let Err(e) = self
                    .command_handler
                    .handle_slash_command(&ctx, &command)
                    .await
                {
                    error!(
                        "Error handling slash command '{}': {:#}",
                        command.data.name, e
                    );

                    let error_message =
                        "❌ Sorry, I encountered an error processing your command. Please try again.";

                    // Deferred commands need an edit; fall back to a fresh response otherwise
                    if command
                        .edit_original_interaction_response(&ctx.http, |response| {
                            response.content(error_message)
                        })
                        .await
                        .is_err()
                    {
                        let _ = command
                            .create_interaction_response(&ctx.http, |response| {
                                response
                                    .kind(InteractionResponseType::ChannelMessageWithSource)
                                    .interaction_response_data(|message| {
                                        message.content(error_message).ephemeral(true)
                                    })
                            })
                            .await;
                    }
                }
            }
            Interaction::Autocomplete(autocomplete) => {
                if let Err(e) = self
                    .command_handler
                    .handle_autocomplete(&ctx, &autocomplete)
                    .await
                {
                    error!(
                        "Error handling autocomplete for '{}': {:#}",
                        autocomplete.data.name, e
                    );
                }
            }
            Interaction::Ping(_) => {
                info!("Ping interaction received - Discord health check");
            }
            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    // The openai crate reads its key from the environment, not from our config
    if config.ai_provider == AiProvider::OpenAi {
        if let Some(key) = &config.openai_api_key {
            std::env::set_var("OPENAI_API_KEY", key);
            std::env::set_var("OPENAI_KEY", key);
        }
    }

    info!("Starting Cogito Discord Bot...");

    let gateway = gateway_from_config(&config)?;
    info!("🧠 AI provider: {} ({:?})", gateway.name(), config.ai_provider);

    let registry = Arc::new(
        PersonaRegistry::load(&config.personas_path, &config.default_persona).await,
    );
    info!(
        "🎭 Loaded {} personas from {}",
        registry.list().await.len(),
        config.personas_path.display()
    );

    let cache = Arc::new(ConversationCache::new(config.conversation_cache_size));
    let chat = ChatService::new(
        registry,
        cache,
        gateway,
        config.max_history_turns,
        config.ai_timeout,
    );
    let command_handler = CommandHandler::new(CommandContext::new(chat, &config.trigger_prefix));

    // Parse guild ID if provided for development mode
    let guild_id = config
        .discord_guild_id
        .as_ref()
        .and_then(|id| id.parse::<u64>().ok())
        .map(GuildId);

    let handler = Handler::new(command_handler, guild_id);

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    info!("Bot configured successfully. Connecting to Discord gateway...");
    info!("Gateway intents: {intents:?}");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
