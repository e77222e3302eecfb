//! # Core Module
//!
//! Configuration and Discord response utilities shared by every feature.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial creation with config and response modules

pub mod config;
pub mod response;

pub use config::{AiProvider, Config};
pub use response::{chunk_for_message, split_message, MESSAGE_LIMIT};
