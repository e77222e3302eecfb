//! # Feature: Conversation Memory
//!
//! Rolling per-channel chat history. Each channel keeps the active persona's
//! instruction pair followed by a bounded window of user/model exchanges, held
//! in a fixed-capacity LRU cache.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with LRU cache and pair-wise trimming

pub mod cache;
pub mod history;

pub use cache::ConversationCache;
pub use history::{turn_limit, Conversation, Role, Turn, SYSTEM_ACKNOWLEDGEMENT, SYSTEM_TURNS};
