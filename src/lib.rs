// Core layer - shared types and configuration
pub mod core;

// Features layer - chat, personas, conversation memory, AI gateways
pub mod features;

// Application layer
pub mod command_handler;
pub mod commands;

pub use core::Config;

pub use features::{
    // AI
    gateway_from_config, AiGateway,
    // Chat
    ChatService,
    // Conversation memory
    Conversation, ConversationCache,
    // Personas
    Persona, PersonaRegistry,
};
