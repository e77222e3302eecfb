//! AI slash command: /ai

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_ai_command()]
}

fn create_ai_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("ai")
        .description("Chat with the AI in this channel")
        .create_option(|option| {
            option
                .name("message")
                .description("What you want to say to the AI")
                .kind(CommandOptionType::String)
                .required(true)
                .min_length(1)
                .max_length(2000)
        })
        .to_owned()
}
