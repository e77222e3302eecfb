//! # Features Layer
//!
//! Domain features of the bot, independent of Discord event plumbing.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: personas, conversation, ai, chat

pub mod ai;
pub mod chat;
pub mod conversation;
pub mod personas;

pub use ai::{gateway_from_config, AiGateway, GeminiGateway, OpenAiGateway};
pub use chat::{ChatService, FALLBACK_REPLY};
pub use conversation::{Conversation, ConversationCache, Role, Turn};
pub use personas::{Persona, PersonaError, PersonaRegistry, ResolvedPersona};
