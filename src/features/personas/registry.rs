//! # Feature: Persona Registry
//!
//! Named system prompts selectable per channel. Personas live in a JSON file
//! keyed by persona id; default personas come from that file (or the built-in
//! Nexus seed) and are protected from deletion, custom personas are created by
//! users through `/persona set`.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Channel assignments cleared when their persona is deleted
//! - 1.0.0: Initial release with JSON persistence and author/admin delete rules

use anyhow::Context as _;
use dashmap::DashMap;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::error::PersonaError;

/// Prompt used when even the default persona is missing from the registry
pub const FALLBACK_PROMPT: &str = "You are a helpful AI assistant.";

/// Display name used alongside [`FALLBACK_PROMPT`]
pub const FALLBACK_NAME: &str = "Nexus";

const NEXUS_PROMPT: &str = include_str!("../../../prompt/nexus.md");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub name: String,
    pub prompt: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
}

impl Persona {
    pub fn custom(name: impl Into<String>, prompt: impl Into<String>, author_id: impl Into<String>) -> Self {
        Persona {
            name: name.into(),
            prompt: prompt.into(),
            is_default: false,
            author_id: Some(author_id.into()),
        }
    }

    /// The persona compiled into the binary, used to seed an empty registry
    pub fn builtin_default() -> Self {
        Persona {
            name: FALLBACK_NAME.to_string(),
            prompt: NEXUS_PROMPT.trim().to_string(),
            is_default: true,
            author_id: None,
        }
    }

    pub fn is_authored_by(&self, user_id: &str) -> bool {
        self.author_id.as_deref() == Some(user_id)
    }
}

/// The persona a channel should talk with right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPersona {
    pub id: String,
    pub name: String,
    pub prompt: String,
    /// True when neither the assignment nor the default id exist in the registry
    pub is_fallback: bool,
}

pub struct PersonaRegistry {
    path: PathBuf,
    default_id: String,
    personas: RwLock<BTreeMap<String, Persona>>,
    /// channel id -> persona id; absence means the default persona
    assignments: DashMap<String, String>,
}

impl PersonaRegistry {
    /// Load personas from `path`.
    ///
    /// A missing or unreadable file is not fatal: the bot starts with only the
    /// built-in default persona.
    pub async fn load(path: impl Into<PathBuf>, default_id: impl Into<String>) -> Self {
        let path = path.into();
        let personas = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, Persona>>(&raw) {
                Ok(personas) => {
                    info!("🎭 Loaded {} personas from {}", personas.len(), path.display());
                    personas
                }
                Err(e) => {
                    error!("❌ Failed to parse {}: {e}. Starting with no stored personas", path.display());
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("📄 No persona file at {} - it will be created on first change", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                error!("❌ Failed to read {}: {e}. Starting with no stored personas", path.display());
                BTreeMap::new()
            }
        };

        Self::with_personas(path, default_id, personas)
    }

    /// Build a registry from an in-memory map, seeding the default persona if absent
    pub fn with_personas(
        path: impl Into<PathBuf>,
        default_id: impl Into<String>,
        mut personas: BTreeMap<String, Persona>,
    ) -> Self {
        let default_id = default_id.into();
        if !personas.contains_key(&default_id) {
            debug!("Seeding built-in default persona as '{default_id}'");
            personas.insert(default_id.clone(), Persona::builtin_default());
        }

        PersonaRegistry {
            path: path.into(),
            default_id,
            personas: RwLock::new(personas),
            assignments: DashMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    pub async fn get(&self, id: &str) -> Option<Persona> {
        self.personas.read().await.get(id).cloned()
    }

    /// All personas ordered by id
    pub async fn list(&self) -> Vec<(String, Persona)> {
        self.personas
            .read()
            .await
            .iter()
            .map(|(id, persona)| (id.clone(), persona.clone()))
            .collect()
    }

    /// Register a new custom persona and persist the registry. Returns the new id.
    pub async fn create(
        &self,
        name: &str,
        prompt: &str,
        author_id: &str,
    ) -> Result<String, PersonaError> {
        let mut personas = self.personas.write().await;

        let mut stamp = chrono::Utc::now().timestamp_millis();
        let mut id = format!("custom_{author_id}_{stamp}");
        while personas.contains_key(&id) {
            stamp += 1;
            id = format!("custom_{author_id}_{stamp}");
        }

        personas.insert(id.clone(), Persona::custom(name, prompt, author_id));
        if let Err(e) = self.persist(&personas).await {
            personas.remove(&id);
            return Err(PersonaError::Persist(e));
        }

        info!("🎭 Created persona '{name}' ({id}) for author {author_id}");
        Ok(id)
    }

    /// Delete a custom persona.
    ///
    /// Unknown ids, default personas and requesters who are neither the author
    /// nor an admin are refused without touching the registry. On success every
    /// channel using the persona falls back to the default.
    pub async fn delete(
        &self,
        id: &str,
        requester_id: &str,
        requester_is_admin: bool,
    ) -> Result<Persona, PersonaError> {
        let mut personas = self.personas.write().await;

        let persona = personas
            .get(id)
            .ok_or_else(|| PersonaError::NotFound(id.to_string()))?;
        if persona.is_default {
            return Err(PersonaError::Protected(id.to_string()));
        }
        if !requester_is_admin && !persona.is_authored_by(requester_id) {
            warn!("🚫 User {requester_id} tried to delete persona {id} without permission");
            return Err(PersonaError::Forbidden(id.to_string()));
        }

        let removed = personas
            .remove(id)
            .ok_or_else(|| PersonaError::NotFound(id.to_string()))?;
        if let Err(e) = self.persist(&personas).await {
            personas.insert(id.to_string(), removed);
            return Err(PersonaError::Persist(e));
        }
        drop(personas);

        let before = self.assignments.len();
        self.assignments.retain(|_, assigned| assigned != id);
        let cleared = before - self.assignments.len();

        info!(
            "🗑️ Deleted persona '{}' ({id}) by {requester_id}, cleared {cleared} channel assignment(s)",
            removed.name
        );
        Ok(removed)
    }

    pub fn assign(&self, channel_id: &str, persona_id: &str) {
        self.assignments
            .insert(channel_id.to_string(), persona_id.to_string());
    }

    pub fn unassign(&self, channel_id: &str) -> Option<String> {
        self.assignments.remove(channel_id).map(|(_, id)| id)
    }

    pub fn assignment(&self, channel_id: &str) -> Option<String> {
        self.assignments.get(channel_id).map(|id| id.value().clone())
    }

    /// Resolve the channel's persona: its assignment, else the default, else the fallback prompt
    pub async fn active_persona(&self, channel_id: &str) -> ResolvedPersona {
        let personas = self.personas.read().await;

        let assigned = self
            .assignment(channel_id)
            .and_then(|id| personas.get(&id).map(|p| (id, p)));
        let resolved = assigned.or_else(|| {
            personas
                .get(&self.default_id)
                .map(|p| (self.default_id.clone(), p))
        });

        match resolved {
            Some((id, persona)) => ResolvedPersona {
                id,
                name: persona.name.clone(),
                prompt: persona.prompt.clone(),
                is_fallback: false,
            },
            None => ResolvedPersona {
                id: self.default_id.clone(),
                name: FALLBACK_NAME.to_string(),
                prompt: FALLBACK_PROMPT.to_string(),
                is_fallback: true,
            },
        }
    }

    async fn persist(&self, personas: &BTreeMap<String, Persona>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(personas).context("Failed to serialize personas")?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        debug!("💾 Saved {} personas to {}", personas.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn registry_in(dir: &TempDir) -> PersonaRegistry {
        PersonaRegistry::with_personas(dir.path().join("personas.json"), "nexus", BTreeMap::new())
    }

    async fn read_file(registry: &PersonaRegistry) -> BTreeMap<String, Persona> {
        let raw = tokio::fs::read_to_string(registry.path()).await.unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_seeds_builtin_default() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);

        let nexus = registry.get("nexus").await.unwrap();
        assert!(nexus.is_default);
        assert_eq!(nexus.name, "Nexus");
        assert!(!nexus.prompt.is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_file_starts_with_default_only() {
        let dir = TempDir::new().unwrap();
        let registry = PersonaRegistry::load(dir.path().join("absent.json"), "nexus").await;

        let ids: Vec<String> = registry.list().await.into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["nexus"]);
    }

    #[tokio::test]
    async fn test_load_malformed_file_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("personas.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let registry = PersonaRegistry::load(&path, "nexus").await;
        assert_eq!(registry.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_load_reads_file_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("personas.json");
        let raw = r#"{
            "nexus": { "name": "Nexus", "prompt": "be nexus", "isDefault": true },
            "custom_7_1": { "name": "Pirate", "prompt": "arr", "isDefault": false, "authorId": "7" }
        }"#;
        tokio::fs::write(&path, raw).await.unwrap();

        let registry = PersonaRegistry::load(&path, "nexus").await;
        assert_eq!(registry.get("nexus").await.unwrap().prompt, "be nexus");

        let pirate = registry.get("custom_7_1").await.unwrap();
        assert!(!pirate.is_default);
        assert!(pirate.is_authored_by("7"));
    }

    #[tokio::test]
    async fn test_create_persists_and_uses_author_in_id() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);

        let id = registry.create("Pirate", "talk like a pirate", "42").await.unwrap();
        assert!(id.starts_with("custom_42_"));

        let persona = registry.get(&id).await.unwrap();
        assert_eq!(persona.name, "Pirate");
        assert!(!persona.is_default);

        let stored = read_file(&registry).await;
        assert_eq!(stored.get(&id), Some(&persona));
        assert!(stored.contains_key("nexus"));
    }

    #[tokio::test]
    async fn test_create_ids_are_unique() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);

        let first = registry.create("A", "a", "1").await.unwrap();
        let second = registry.create("B", "b", "1").await.unwrap();
        assert_ne!(first, second);
        assert_eq!(registry.list().await.len(), 3);
    }

    #[tokio::test]
    async fn test_persisted_json_uses_camel_case_keys() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        registry.create("A", "a", "1").await.unwrap();

        let raw = tokio::fs::read_to_string(registry.path()).await.unwrap();
        assert!(raw.contains("\"isDefault\""));
        assert!(raw.contains("\"authorId\": \"1\""));
    }

    #[tokio::test]
    async fn test_author_can_delete() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        let id = registry.create("Pirate", "arr", "42").await.unwrap();

        let removed = registry.delete(&id, "42", false).await.unwrap();
        assert_eq!(removed.name, "Pirate");
        assert!(!registry.get(&id).await.is_some());
        assert!(!read_file(&registry).await.contains_key(&id));
    }

    #[tokio::test]
    async fn test_admin_can_delete_others_persona() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        let id = registry.create("Pirate", "arr", "42").await.unwrap();

        assert!(registry.delete(&id, "99", true).await.is_ok());
        assert!(!registry.get(&id).await.is_some());
    }

    #[tokio::test]
    async fn test_stranger_cannot_delete() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        let id = registry.create("Pirate", "arr", "42").await.unwrap();
        let before = registry.list().await;

        let err = registry.delete(&id, "99", false).await.unwrap_err();
        assert!(matches!(err, PersonaError::Forbidden(_)));
        assert_eq!(registry.list().await, before);
        assert!(read_file(&registry).await.contains_key(&id));
    }

    #[tokio::test]
    async fn test_default_persona_is_protected() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);

        let err = registry.delete("nexus", "99", true).await.unwrap_err();
        assert!(matches!(err, PersonaError::Protected(_)));
        assert!(registry.get("nexus").await.is_some());
    }

    #[tokio::test]
    async fn test_delete_unknown_persona() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);

        let err = registry.delete("ghost", "1", true).await.unwrap_err();
        assert!(matches!(err, PersonaError::NotFound(id) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_delete_clears_assignments() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        let id = registry.create("Pirate", "arr", "42").await.unwrap();
        let other = registry.create("Poet", "rhyme", "42").await.unwrap();

        registry.assign("chan-a", &id);
        registry.assign("chan-b", &id);
        registry.assign("chan-c", &other);

        registry.delete(&id, "42", false).await.unwrap();

        assert_eq!(registry.assignment("chan-a"), None);
        assert_eq!(registry.assignment("chan-b"), None);
        assert_eq!(registry.assignment("chan-c"), Some(other));
        assert_eq!(registry.active_persona("chan-a").await.id, "nexus");
    }

    #[tokio::test]
    async fn test_create_rolls_back_when_save_fails() {
        let dir = TempDir::new().unwrap();
        // Writing to a directory path fails
        let registry =
            PersonaRegistry::with_personas(dir.path().to_path_buf(), "nexus", BTreeMap::new());

        let err = registry.create("A", "a", "1").await.unwrap_err();
        assert!(matches!(err, PersonaError::Persist(_)));
        assert_eq!(registry.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_active_persona_resolution() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);
        let id = registry.create("Pirate", "arr", "42").await.unwrap();

        let default = registry.active_persona("chan").await;
        assert_eq!(default.id, "nexus");
        assert!(!default.is_fallback);

        registry.assign("chan", &id);
        let active = registry.active_persona("chan").await;
        assert_eq!(active.id, id);
        assert_eq!(active.prompt, "arr");

        assert_eq!(registry.unassign("chan"), Some(id));
        assert_eq!(registry.active_persona("chan").await.id, "nexus");
    }

    #[tokio::test]
    async fn test_fallback_when_default_missing() {
        let registry = PersonaRegistry {
            path: PathBuf::from("unused.json"),
            default_id: "nexus".to_string(),
            personas: RwLock::new(BTreeMap::new()),
            assignments: DashMap::new(),
        };

        let resolved = registry.active_persona("chan").await;
        assert!(resolved.is_fallback);
        assert_eq!(resolved.id, "nexus");
        assert_eq!(resolved.prompt, FALLBACK_PROMPT);
    }
}
