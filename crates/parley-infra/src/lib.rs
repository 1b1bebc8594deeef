//! Infrastructure implementations for Parley.
//!
//! Concrete adapters for the ports defined in `parley-core`: the
//! OpenAI-compatible completion gateway, plus configuration and system
//! prompt loading from disk and environment.

pub mod config;
pub mod llm;
pub mod prompt;
