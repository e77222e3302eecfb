//! # Personas Feature
//!
//! Channel-scoped personas backed by a JSON registry file, plus the
//! autocomplete choices used by the `/persona` command group.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release

pub mod choices;
pub mod error;
pub mod registry;

pub use choices::{persona_choices, ChoiceScope, PersonaChoice, CUSTOM_LABEL_PREFIX, MAX_CHOICES};
pub use error::PersonaError;
pub use registry::{Persona, PersonaRegistry, ResolvedPersona, FALLBACK_PROMPT};
