//! Business logic and port traits for Parley.
//!
//! This crate defines the conversation store and completion gateway traits
//! plus the chat orchestrator that drives them. It depends only on
//! `parley-types`, never on `parley-infra` or any network crate.

pub mod chat;
pub mod llm;
