//! # Persona Command
//!
//! Single `/persona` command whose subcommands manage the channel's AI persona.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: set, use, list, current, reset and delete subcommands

use serenity::builder::{CreateApplicationCommand, CreateApplicationCommandOption};
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_persona_command()]
}

fn create_persona_command() -> CreateApplicationCommand {
    let mut cmd = CreateApplicationCommand::default();

    cmd.name("persona")
        .description("Manage the AI's role and personality")
        .create_option(|sub| {
            subcommand(sub, "set", "Create a new custom persona and use it in this channel")
                .create_sub_option(|o| {
                    o.name("name")
                        .description("A name for your new persona")
                        .kind(CommandOptionType::String)
                        .required(true)
                        .max_length(100)
                })
                .create_sub_option(|o| {
                    o.name("prompt")
                        .description("Detailed role description and prompt")
                        .kind(CommandOptionType::String)
                        .required(true)
                })
        })
        .create_option(|sub| {
            subcommand(sub, "use", "Pick an existing persona for this channel")
                .create_sub_option(|o| persona_name_option(o, "The persona to use"))
        })
        .create_option(|sub| subcommand(sub, "list", "Show every available persona"))
        .create_option(|sub| {
            subcommand(sub, "current", "Show which persona this channel is using")
        })
        .create_option(|sub| {
            subcommand(sub, "reset", "Return this channel to the default persona")
        })
        .create_option(|sub| {
            subcommand(sub, "delete", "Delete a custom persona")
                .create_sub_option(|o| persona_name_option(o, "The custom persona to delete"))
        });

    cmd
}

fn subcommand<'a>(
    option: &'a mut CreateApplicationCommandOption,
    name: &str,
    description: &str,
) -> &'a mut CreateApplicationCommandOption {
    option
        .name(name)
        .description(description)
        .kind(CommandOptionType::SubCommand)
}

fn persona_name_option<'a>(
    option: &'a mut CreateApplicationCommandOption,
    description: &str,
) -> &'a mut CreateApplicationCommandOption {
    option
        .name("name")
        .description(description)
        .kind(CommandOptionType::String)
        .required(true)
        .set_autocomplete(true)
}
