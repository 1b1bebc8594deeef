//! Shared domain types for Parley.
//!
//! Chats, messages, identifiers, LLM request/response shapes, configuration,
//! and the error enums shared by the core and infra layers.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
