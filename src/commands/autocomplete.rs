//! Autocomplete for `/persona use` and `/persona delete`
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Persona name suggestions

use anyhow::Result;
use log::debug;
use serenity::model::application::interaction::autocomplete::AutocompleteInteraction;
use serenity::prelude::Context;
use uuid::Uuid;

use super::context::CommandContext;
use super::slash::{get_focused_option, get_subcommand};
use crate::features::personas::{persona_choices, ChoiceScope, PersonaChoice};

/// Discord caps choice names at 100 characters
pub const MAX_LABEL_CHARS: usize = 100;

/// Map a `/persona` subcommand to the personas it may pick from
pub fn scope_for(subcommand: &str) -> Option<ChoiceScope> {
    match subcommand {
        "use" => Some(ChoiceScope::Use),
        "delete" => Some(ChoiceScope::Delete),
        _ => None,
    }
}

fn truncate_label(label: &str) -> String {
    label.chars().take(MAX_LABEL_CHARS).collect()
}

/// Suggestions for the given command and subcommand, given what the user typed
pub async fn suggestions(
    ctx: &CommandContext,
    command: &str,
    subcommand: &str,
    typed: &str,
) -> Vec<PersonaChoice> {
    let scope = match (command, scope_for(subcommand)) {
        ("persona", Some(scope)) => scope,
        _ => return Vec::new(),
    };

    let personas = ctx.registry.list().await;
    persona_choices(&personas, scope, typed)
        .into_iter()
        .map(|choice| PersonaChoice {
            label: truncate_label(&choice.label),
            id: choice.id,
        })
        .collect()
}

/// Answer an autocomplete interaction; unknown commands get an empty list
pub async fn handle_autocomplete(
    ctx: &CommandContext,
    serenity_ctx: &Context,
    interaction: &AutocompleteInteraction,
    request_id: Uuid,
) -> Result<()> {
    let subcommand = get_subcommand(&interaction.data.options);
    let subcommand_name = subcommand.map(|sub| sub.name.as_str()).unwrap_or_default();
    let typed = subcommand
        .and_then(|sub| get_focused_option(&sub.options))
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .unwrap_or_default();

    let choices = suggestions(ctx, &interaction.data.name, subcommand_name, typed).await;
    debug!(
        "[{request_id}] 🔎 Autocomplete /{} {subcommand_name} '{typed}': {} choices",
        interaction.data.name,
        choices.len()
    );

    interaction
        .create_autocomplete_response(&serenity_ctx.http, |response| {
            for choice in &choices {
                response.add_string_choice(&choice.label, &choice.id);
            }
            response
        })
        .await?;
    Ok(())
}
