//! # Feature: Channel Chat
//!
//! The conversational turn handler shared by `/ai`, the `!ai` prefix and
//! mentions. Resolves the channel's persona, maintains its bounded history and
//! relays the turn to the configured AI gateway.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Timeout around gateway calls
//! - 1.0.0: Initial release

use anyhow::{anyhow, Result};
use log::{debug, error, info};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use uuid::Uuid;

use crate::features::ai::AiGateway;
use crate::features::conversation::{turn_limit, Conversation, ConversationCache, SYSTEM_TURNS};
use crate::features::personas::PersonaRegistry;

/// Reply sent when the AI service fails or times out
pub const FALLBACK_REPLY: &str =
    "Sorry, I ran into a problem while processing your request. Please try again later.";

#[derive(Clone)]
pub struct ChatService {
    registry: Arc<PersonaRegistry>,
    cache: Arc<ConversationCache>,
    gateway: Arc<dyn AiGateway>,
    max_turns: usize,
    request_timeout: Duration,
}

impl ChatService {
    pub fn new(
        registry: Arc<PersonaRegistry>,
        cache: Arc<ConversationCache>,
        gateway: Arc<dyn AiGateway>,
        max_exchanges: usize,
        request_timeout: Duration,
    ) -> Self {
        ChatService {
            registry,
            cache,
            gateway,
            max_turns: turn_limit(max_exchanges),
            request_timeout,
        }
    }

    pub fn registry(&self) -> &Arc<PersonaRegistry> {
        &self.registry
    }

    pub fn cache(&self) -> &Arc<ConversationCache> {
        &self.cache
    }

    /// Run one chat turn and always produce something to show the user
    pub async fn reply(&self, channel_id: &str, message: &str, request_id: Uuid) -> String {
        match self.converse(channel_id, message, request_id).await {
            Ok(text) => text,
            Err(e) => {
                error!("[{request_id}] ❌ AI gateway error in channel {channel_id}: {e:#}");
                FALLBACK_REPLY.to_string()
            }
        }
    }

    /// Run one chat turn, surfacing gateway failures.
    ///
    /// The cache is only updated when the gateway answers, so a failed turn
    /// leaves the channel's history as it was.
    pub async fn converse(&self, channel_id: &str, message: &str, request_id: Uuid) -> Result<String> {
        let start = Instant::now();
        let persona = self.registry.active_persona(channel_id).await;
        debug!("[{request_id}] 🎭 Channel {channel_id} persona: {}", persona.id);

        let mut conversation = match self.cache.get(channel_id) {
            Some(existing) if existing.persona_id() == persona.id => existing,
            Some(existing) => {
                info!(
                    "[{request_id}] 🔄 Persona changed from {} to {} in channel {channel_id}, starting a new conversation",
                    existing.persona_id(),
                    persona.id
                );
                Conversation::new(&persona.id, &persona.prompt)
            }
            None => Conversation::new(&persona.id, &persona.prompt),
        };

        // Make room for the new exchange first so the pending user turn is never evicted
        let dropped = conversation.trim(self.max_turns.saturating_sub(SYSTEM_TURNS));
        conversation.push_user(message);
        if dropped > 0 {
            debug!("[{request_id}] ✂️ Trimmed {dropped} old turns");
        }

        // The new user turn travels as the message, everything before it as history
        let (pending, history) = conversation
            .turns()
            .split_last()
            .ok_or_else(|| anyhow!("conversation has no turns"))?;

        info!(
            "[{request_id}] 🚀 Calling {} with {} history turns",
            self.gateway.name(),
            history.len()
        );
        let text = timeout(self.request_timeout, self.gateway.generate(history, &pending.text))
            .await
            .map_err(|_| {
                anyhow!(
                    "{} request timed out after {} seconds",
                    self.gateway.name(),
                    self.request_timeout.as_secs()
                )
            })??;

        conversation.push_model(text.as_str());
        conversation.trim(self.max_turns);
        self.cache.set(channel_id, conversation);
        debug!(
            "[{request_id}] 💾 Stored conversation ({} of {} channels cached)",
            self.cache.channel_count(),
            self.cache.capacity()
        );

        info!(
            "[{request_id}] ✅ Reply ready | {} chars | {:?}",
            text.len(),
            start.elapsed()
        );
        Ok(text)
    }
}
