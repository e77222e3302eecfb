//! Persona registry failures

use thiserror::Error;

/// Why a persona operation was refused
#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("No persona with id '{0}'")]
    NotFound(String),

    /// Default personas are part of the registry seed and cannot be removed
    #[error("Persona '{0}' is a default persona and cannot be deleted")]
    Protected(String),

    #[error("Only the author of '{0}' or a server manager can delete it")]
    Forbidden(String),

    #[error("Failed to save personas: {0:#}")]
    Persist(anyhow::Error),
}
