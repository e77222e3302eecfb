//! # Slash Commands (/)
//!
//! Discord native slash command definitions, registration and option helpers.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: /ai and /persona

mod ai;
mod persona;

use anyhow::Result;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::{Command, CommandOptionType};
use serenity::model::application::interaction::application_command::CommandDataOption;
use serenity::model::id::GuildId;
use serenity::prelude::Context;

/// Creates all slash command definitions
pub fn create_slash_commands() -> Vec<CreateApplicationCommand> {
    let mut commands = Vec::new();
    commands.extend(ai::create_commands());
    commands.extend(persona::create_commands());
    commands
}

/// Registers all slash commands globally
pub async fn register_global_commands(ctx: &Context) -> Result<()> {
    let slash_commands = create_slash_commands();
    let count = slash_commands.len();

    Command::set_global_application_commands(&ctx.http, |commands| {
        for command in slash_commands {
            commands.add_application_command(command);
        }
        commands
    })
    .await?;

    info!("Global slash commands registered successfully ({count} commands)");
    Ok(())
}

/// Registers all slash commands for a specific guild (faster for testing)
pub async fn register_guild_commands(ctx: &Context, guild_id: GuildId) -> Result<()> {
    let slash_commands = create_slash_commands();
    let count = slash_commands.len();

    guild_id
        .set_application_commands(&ctx.http, |commands| {
            for command in slash_commands {
                commands.add_application_command(command);
            }
            commands
        })
        .await?;

    info!("Guild slash commands registered for guild {guild_id} ({count} commands)");
    Ok(())
}

/// Utility function to get string option from slash command
pub fn get_string_option(options: &[CommandDataOption], name: &str) -> Option<String> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

/// First subcommand among the options, if the command was invoked through one
pub fn get_subcommand(options: &[CommandDataOption]) -> Option<&CommandDataOption> {
    options
        .iter()
        .find(|opt| opt.kind == CommandOptionType::SubCommand)
}

/// The option the user is currently typing into, for autocomplete
pub fn get_focused_option(options: &[CommandDataOption]) -> Option<&CommandDataOption> {
    options.iter().find(|opt| opt.focused)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command_names() -> Vec<String> {
        create_slash_commands()
            .iter()
            .map(|cmd| cmd.0.get("name").unwrap().as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_create_slash_commands() {
        assert_eq!(command_names(), vec!["ai", "persona"]);
    }

    #[test]
    fn test_ai_command_requires_message() {
        let commands = create_slash_commands();
        let ai = &commands[0];
        let options = ai.0.get("options").unwrap().as_array().unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].get("name").unwrap().as_str().unwrap(), "message");
        assert_eq!(options[0].get("required").unwrap().as_bool(), Some(true));
    }
}
