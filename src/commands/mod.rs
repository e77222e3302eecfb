//! # Command System
//!
//! Slash command (/) handling, autocomplete and plain-message triggers.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Autocomplete for persona names
//! - 1.0.0: Handler trait, context, registry and triggers

pub mod autocomplete;
pub mod context;
pub mod handler;
pub mod handlers;
pub mod registry;
pub mod slash;
pub mod triggers;

// Re-export the CommandHandler from the handler module
pub use crate::command_handler::CommandHandler;

// Re-export handler infrastructure
pub use context::CommandContext;
pub use handler::SlashCommandHandler;
pub use registry::CommandRegistry;

pub use slash::{
    create_slash_commands, get_string_option, get_subcommand, register_global_commands,
    register_guild_commands,
};
pub use triggers::{parse_trigger, MessageTrigger};
