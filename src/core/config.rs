//! Environment-driven bot configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Initial release with provider selection and conversation bounds

use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Which generative-language service answers chat turns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    Gemini,
    OpenAi,
}

impl FromStr for AiProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(AiProvider::Gemini),
            "openai" => Ok(AiProvider::OpenAi),
            other => bail!("Unknown AI_PROVIDER '{other}' (expected 'gemini' or 'openai')"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    /// Registers commands to a single guild for instant updates during development
    pub discord_guild_id: Option<String>,
    pub ai_provider: AiProvider,
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub personas_path: PathBuf,
    pub default_persona: String,
    pub conversation_cache_size: usize,
    /// Number of user/model exchange pairs kept after the system pair
    pub max_history_turns: usize,
    pub ai_timeout: Duration,
    pub trigger_prefix: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let discord_token = get("DISCORD_TOKEN")
            .ok_or_else(|| anyhow!("DISCORD_TOKEN must be set"))?;

        let ai_provider = match get("AI_PROVIDER") {
            Some(value) => value.parse()?,
            None => AiProvider::Gemini,
        };

        let google_api_key = get("GOOGLE_API_KEY");
        let openai_api_key = get("OPENAI_API_KEY");

        match ai_provider {
            AiProvider::Gemini if google_api_key.is_none() => {
                bail!("GOOGLE_API_KEY must be set when AI_PROVIDER is gemini")
            }
            AiProvider::OpenAi if openai_api_key.is_none() => {
                bail!("OPENAI_API_KEY must be set when AI_PROVIDER is openai")
            }
            _ => {}
        }

        let conversation_cache_size: usize = parse_or(&get, "CONVERSATION_CACHE_SIZE", 100)?;
        if conversation_cache_size == 0 {
            bail!("CONVERSATION_CACHE_SIZE must be greater than zero");
        }

        let max_history_turns: usize = parse_or(&get, "MAX_HISTORY_TURNS", 10)?;
        if max_history_turns == 0 {
            bail!("MAX_HISTORY_TURNS must be greater than zero");
        }

        Ok(Config {
            discord_token,
            discord_guild_id: get("DISCORD_GUILD_ID"),
            ai_provider,
            google_api_key,
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: get("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            openai_api_key,
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            personas_path: get("PERSONAS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./personas.json")),
            default_persona: get("DEFAULT_PERSONA").unwrap_or_else(|| "nexus".to_string()),
            conversation_cache_size,
            max_history_turns,
            ai_timeout: Duration::from_secs(parse_or(&get, "AI_TIMEOUT_SECS", 45)?),
            // Prefix keeps its trailing space, so read it without the blank filter
            trigger_prefix: lookup("TRIGGER_PREFIX")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "!ai ".to_string()),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T, F>(get: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
