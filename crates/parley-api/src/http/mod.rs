//! HTTP layer for Parley.
//!
//! Axum router serving the chat page, the two JSON chat endpoints, a health
//! check, and static assets. Identity comes from a signed session cookie.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
