//! Autocomplete choices for `/persona use` and `/persona delete`
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Label filtering with the Discord 25-choice cap

use super::registry::Persona;

/// Discord rejects autocomplete responses with more than 25 choices
pub const MAX_CHOICES: usize = 25;

/// Label prefix marking user-created personas in the delete picker
pub const CUSTOM_LABEL_PREFIX: &str = "(custom) ";

/// Which subcommand the user is filling in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceScope {
    /// Every persona can be selected
    Use,
    /// Only custom personas can be deleted
    Delete,
}

/// A single autocomplete entry: label shown to the user, persona id submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaChoice {
    pub label: String,
    pub id: String,
}

/// Build autocomplete choices whose label contains `typed` (case-insensitive)
pub fn persona_choices(
    personas: &[(String, Persona)],
    scope: ChoiceScope,
    typed: &str,
) -> Vec<PersonaChoice> {
    let needle = typed.to_lowercase();

    personas
        .iter()
        .filter(|(_, persona)| scope == ChoiceScope::Use || !persona.is_default)
        .map(|(id, persona)| PersonaChoice {
            label: match scope {
                ChoiceScope::Use => persona.name.clone(),
                ChoiceScope::Delete => format!("{CUSTOM_LABEL_PREFIX}{}", persona.name),
            },
            id: id.clone(),
        })
        .filter(|choice| choice.label.to_lowercase().contains(&needle))
        .take(MAX_CHOICES)
        .collect()
}
