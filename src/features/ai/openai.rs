//! OpenAI chat completion adapter
//!
//! The `openai` crate reads its key from `OPENAI_KEY`, which `main` exports
//! from the configured `OPENAI_API_KEY`.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use openai::chat::{ChatCompletion, ChatCompletionMessage, ChatCompletionMessageRole};

use super::AiGateway;
use crate::features::conversation::{Role, Turn};

#[derive(Debug, Clone)]
pub struct OpenAiGateway {
    model: String,
}

impl OpenAiGateway {
    pub fn new(model: impl Into<String>) -> Self {
        OpenAiGateway {
            model: model.into(),
        }
    }
}

fn message(role: ChatCompletionMessageRole, content: &str) -> ChatCompletionMessage {
    ChatCompletionMessage {
        role,
        content: Some(content.to_string()),
        name: None,
        function_call: None,
        tool_call_id: None,
        tool_calls: None,
    }
}

/// The persona instruction stays a user turn, mirroring what Gemini receives
fn build_messages(history: &[Turn], user_message: &str) -> Vec<ChatCompletionMessage> {
    history
        .iter()
        .map(|turn| {
            let role = match turn.role {
                Role::User => ChatCompletionMessageRole::User,
                Role::Model => ChatCompletionMessageRole::Assistant,
            };
            message(role, &turn.text)
        })
        .chain(std::iter::once(message(
            ChatCompletionMessageRole::User,
            user_message,
        )))
        .collect()
}

#[async_trait]
impl AiGateway for OpenAiGateway {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, history: &[Turn], message: &str) -> Result<String> {
        let messages = build_messages(history, message);
        debug!("Sending {} messages to OpenAI model {}", messages.len(), self.model);

        let completion = ChatCompletion::builder(&self.model, messages)
            .create()
            .await
            .map_err(|e| anyhow!("OpenAI request failed: {e}"))?;

        let reply = completion
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default()
            .trim()
            .to_string();

        if reply.is_empty() {
            return Err(anyhow!("OpenAI returned an empty reply"));
        }

        Ok(reply)
    }
}
