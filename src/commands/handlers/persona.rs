//! Persona command handlers
//!
//! Handles: persona (set, use, list, current, reset, delete)
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Add delete subcommand with author/admin check
//! - 1.0.0: Initial release

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use log::{debug, info};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::{get_string_option, get_subcommand};
use crate::features::personas::{Persona, PersonaError, PersonaRegistry};

/// Accent color of the persona list embed (Discord blurple)
pub const LIST_EMBED_COLOR: u32 = 0x5865F2;

/// A parsed `/persona` subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonaCommand {
    Set { name: String, prompt: String },
    Use { id: String },
    List,
    Current,
    Reset,
    Delete { id: String },
}

/// What to show the user after a subcommand ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonaReply {
    Notice(String),
    List(Vec<(String, Persona)>),
}

/// Who issued the command and where
#[derive(Debug, Clone)]
pub struct Invoker<'a> {
    pub channel_id: &'a str,
    pub user_id: &'a str,
    /// Holds the Manage Guild permission
    pub is_admin: bool,
}

impl PersonaCommand {
    /// Build a command from the subcommand name and an option lookup
    pub fn parse<F>(subcommand: &str, option: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            option(name).ok_or_else(|| anyhow!("/persona {subcommand} is missing option '{name}'"))
        };

        Ok(match subcommand {
            "set" => PersonaCommand::Set {
                name: required("name")?,
                prompt: required("prompt")?,
            },
            "use" => PersonaCommand::Use {
                id: required("name")?,
            },
            "list" => PersonaCommand::List,
            "current" => PersonaCommand::Current,
            "reset" => PersonaCommand::Reset,
            "delete" => PersonaCommand::Delete {
                id: required("name")?,
            },
            other => bail!("Unknown /persona subcommand '{other}'"),
        })
    }

    /// Apply the command to the registry. Refusals come back as notices;
    /// only unexpected failures (such as a failed save) are errors.
    pub async fn execute(&self, registry: &PersonaRegistry, invoker: &Invoker<'_>) -> Result<PersonaReply> {
        let notice = |text: String| -> Result<PersonaReply> { Ok(PersonaReply::Notice(text)) };

        match self {
            PersonaCommand::Set { name, prompt } => {
                let (name, prompt) = (name.trim(), prompt.trim());
                if name.is_empty() || prompt.is_empty() {
                    return notice("❌ A persona needs both a name and a prompt.".to_string());
                }
                let id = registry.create(name, prompt, invoker.user_id).await?;
                registry.assign(invoker.channel_id, &id);
                notice(format!(
                    "✅ Persona **{name}** has been created and enabled in this channel!"
                ))
            }
            PersonaCommand::Use { id } => match registry.get(id).await {
                Some(persona) => {
                    registry.assign(invoker.channel_id, id);
                    notice(format!("✅ This channel now uses **{}**.", persona.name))
                }
                None => notice(format!("❌ Could not find a persona with ID \"{id}\".")),
            },
            PersonaCommand::List => Ok(PersonaReply::List(registry.list().await)),
            PersonaCommand::Current => {
                let active = registry.active_persona(invoker.channel_id).await;
                if active.is_fallback {
                    notice(format!(
                        "ℹ️ This channel is using the default persona '{}'.",
                        active.name
                    ))
                } else {
                    notice(format!("ℹ️ This channel is currently using **{}**.", active.name))
                }
            }
            PersonaCommand::Reset => {
                registry.unassign(invoker.channel_id);
                let default = registry.active_persona(invoker.channel_id).await;
                notice(format!(
                    "🔄 This channel's persona has been reset to the default ('{}').",
                    default.name
                ))
            }
            PersonaCommand::Delete { id } => {
                match registry.delete(id, invoker.user_id, invoker.is_admin).await {
                    Ok(persona) => notice(format!(
                        "🗑️ Custom persona **{}** has been deleted.",
                        persona.name
                    )),
                    Err(PersonaError::NotFound(_)) | Err(PersonaError::Protected(_)) => notice(
                        "❌ Cannot delete. This persona is a default persona or does not exist."
                            .to_string(),
                    ),
                    Err(PersonaError::Forbidden(_)) => notice(
                        "🚫 You don't have permission to delete this persona. Only its creator or a server manager can delete it."
                            .to_string(),
                    ),
                    Err(e @ PersonaError::Persist(_)) => Err(e.into()),
                }
            }
        }
    }
}

/// Embed description for `/persona list`
pub fn format_persona_list(personas: &[(String, Persona)]) -> String {
    if personas.is_empty() {
        return "No personas are available yet.".to_string();
    }

    personas
        .iter()
        .map(|(id, persona)| format!("**{}**\n(ID: `{id}`)", persona.name))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Handler for the `/persona` command group
pub struct PersonaHandler;

#[async_trait]
impl SlashCommandHandler for PersonaHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["persona"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        request_id: Uuid,
    ) -> Result<()> {
        let subcommand = get_subcommand(&command.data.options)
            .ok_or_else(|| anyhow!("/persona invoked without a subcommand"))?;
        let parsed = PersonaCommand::parse(&subcommand.name, |name| {
            get_string_option(&subcommand.options, name)
        })?;
        debug!("[{request_id}] 🎭 Parsed persona command: {parsed:?}");

        let channel_id = command.channel_id.to_string();
        let user_id = command.user.id.to_string();
        let is_admin = command
            .member
            .as_ref()
            .and_then(|member| member.permissions)
            .map_or(false, |permissions| permissions.manage_guild());
        let invoker = Invoker {
            channel_id: &channel_id,
            user_id: &user_id,
            is_admin,
        };

        let reply = parsed.execute(&ctx.registry, &invoker).await?;

        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message.ephemeral(true);
                        match &reply {
                            PersonaReply::Notice(text) => message.content(text),
                            PersonaReply::List(personas) => message.embed(|embed| {
                                embed
                                    .title("Available Personas")
                                    .color(LIST_EMBED_COLOR)
                                    .description(format_persona_list(personas))
                            }),
                        }
                    })
            })
            .await?;

        info!(
            "[{request_id}] ✅ /persona {} completed for user {user_id} in channel {channel_id}",
            subcommand.name
        );
        Ok(())
    }
}
