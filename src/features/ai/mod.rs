//! # Feature: AI Gateway
//!
//! Adapters over the external generative-language services. Every adapter
//! takes the channel's prior turns plus the new user text and returns the
//! generated reply.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add OpenAI chat completion adapter
//! - 1.0.0: Initial release with Gemini REST adapter

pub mod gemini;
pub mod openai;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::core::{AiProvider, Config};
use crate::features::conversation::Turn;

pub use gemini::GeminiGateway;
pub use openai::OpenAiGateway;

/// A generative-language service that can continue a conversation
#[async_trait]
pub trait AiGateway: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Generate the model's reply to `message` given the earlier `history`
    async fn generate(&self, history: &[Turn], message: &str) -> Result<String>;
}

/// Build the gateway selected by `AI_PROVIDER`
pub fn gateway_from_config(config: &Config) -> Result<Arc<dyn AiGateway>> {
    match config.ai_provider {
        AiProvider::Gemini => {
            let api_key = config
                .google_api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("GOOGLE_API_KEY is required for the Gemini provider"))?;
            Ok(Arc::new(
                GeminiGateway::new(api_key, config.gemini_model.clone())
                    .with_base_url(config.gemini_base_url.clone()),
            ))
        }
        AiProvider::OpenAi => Ok(Arc::new(OpenAiGateway::new(config.openai_model.clone()))),
    }
}
